//! embedded-hal driver for the Sensirion SPS30 particulate matter sensor.
//!
//! The driver is stateless apart from the bus handle and its [`Config`]. Every
//! operation is one blocking request, followed by one response read for
//! commands that return data. Sequencing (start, wait for data, read, stop) is
//! up to the caller:
//!
//! ```ignore
//! let mut sensor = Sps30::new(&mut i2c, Config::default());
//! sensor.start_measurement()?;
//! delay.delay_ms(1000);
//! if sensor.read_data_ready()?.is_ready() {
//!     let reading = sensor.read_measurement()?;
//!     log::info!("PM2.5: {} µg/m³", reading.mass_pm2_5);
//! }
//! sensor.stop_measurement()?;
//! ```
#![cfg_attr(not(test), no_std)]

use embedded_hal::i2c::I2c;
use log::Level;

pub mod codec;
pub mod commands;

mod config;
pub use config::*;

mod crc;
pub use crc::crc;

mod error;
pub use error::*;

mod types;
pub use types::*;

use codec::Terminator;
use commands::{
    Command, Frame, CLEANING_INTERVAL_LEN, DATA_READY_LEN, FIRMWARE_VERSION_LEN, IDENTITY_LEN,
    MEASUREMENT_LEN, OUTPUT_FORMAT_FLOAT,
};

/// Emits a log record if `level` passes the driver's configured filter.
macro_rules! driver_log {
    ($config:expr, $level:expr, $($arg:tt)+) => {
        if $level <= $config.log_level {
            log::log!(target: "sps30", $level, $($arg)+);
        }
    };
}

/// SPS30 sensor on an I2C bus.
///
/// The bus is taken by value; pass `&mut bus` to keep ownership of it.
pub struct Sps30<I2C> {
    i2c: I2C,
    config: Config,
}

impl<I2C> Sps30<I2C>
where
    I2C: I2c,
{
    pub fn new(i2c: I2C, config: Config) -> Self {
        Self { i2c, config }
    }

    /// Gives back the bus handle.
    pub fn release(self) -> I2C {
        self.i2c
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Reads the nul-terminated article code.
    ///
    /// Any zero byte ends the code, including a checksum byte. A character
    /// pair whose CRC is `0x00` (for example `"0i"`) therefore cuts the code
    /// short after that pair.
    pub fn read_article_code(&mut self) -> Result<DeviceString, Error<I2C::Error>> {
        let raw: [u8; IDENTITY_LEN] = self.read_response(Command::ReadArticleCode)?;
        Ok(codec::decode_ascii(&raw, Terminator::Nul))
    }

    /// Reads the serial number. Every data byte of the response is kept.
    pub fn read_serial(&mut self) -> Result<DeviceString, Error<I2C::Error>> {
        let raw: [u8; IDENTITY_LEN] = self.read_response(Command::ReadSerialNumber)?;
        Ok(codec::decode_ascii(&raw, Terminator::End))
    }

    pub fn read_firmware_version(&mut self) -> Result<FirmwareVersion, Error<I2C::Error>> {
        let raw: [u8; FIRMWARE_VERSION_LEN] = self.read_response(Command::ReadFirmwareVersion)?;
        Ok(codec::decode_firmware_version(&raw)?)
    }

    /// Reads the fan auto cleaning interval in seconds.
    pub fn read_cleaning_interval(&mut self) -> Result<u32, Error<I2C::Error>> {
        let raw: [u8; CLEANING_INTERVAL_LEN] =
            self.read_response(Command::AutoCleaningInterval)?;
        Ok(codec::decode_u32(&raw)?)
    }

    /// Sets the fan auto cleaning interval in seconds. 0 disables auto cleaning.
    pub fn set_cleaning_interval(&mut self, seconds: u32) -> Result<(), Error<I2C::Error>> {
        let words = [(seconds >> 16) as u16, seconds as u16];
        self.write_frame(&Frame::new(Command::AutoCleaningInterval, &words)?)
    }

    /// Starts fan cleaning. Only accepted by the sensor in measurement mode.
    pub fn start_fan_cleaning(&mut self) -> Result<(), Error<I2C::Error>> {
        self.send(Command::StartFanCleaning)
    }

    /// Enters measurement mode with float output. The sensor needs about a
    /// second before the first measurement is ready.
    pub fn start_measurement(&mut self) -> Result<(), Error<I2C::Error>> {
        self.write_frame(&Frame::new(
            Command::StartMeasurement,
            &[OUTPUT_FORMAT_FLOAT],
        )?)
    }

    /// Returns to idle mode.
    pub fn stop_measurement(&mut self) -> Result<(), Error<I2C::Error>> {
        self.send(Command::StopMeasurement)
    }

    pub fn read_data_ready(&mut self) -> Result<DataReady, Error<I2C::Error>> {
        let raw: [u8; DATA_READY_LEN] = self.read_response(Command::ReadDataReady)?;
        Ok(codec::decode_data_ready(&raw)?)
    }

    /// Reads the latest measurement.
    ///
    /// Outside measurement mode the values are whatever the sensor returns.
    pub fn read_measurement(&mut self) -> Result<AirQualityReading, Error<I2C::Error>> {
        let raw: [u8; MEASUREMENT_LEN] = self.read_response(Command::ReadMeasurement)?;
        Ok(codec::decode_measurement(&raw)?)
    }

    /// Soft reset. The sensor returns to idle mode.
    pub fn reset(&mut self) -> Result<(), Error<I2C::Error>> {
        self.send(Command::Reset)
    }

    // Writes a bare 2-byte command.
    fn send(&mut self, command: Command) -> Result<(), Error<I2C::Error>> {
        driver_log!(
            self.config,
            Level::Debug,
            "Sending code: {:02X?}",
            command.address()
        );
        sensirion_i2c::i2c::write_command_u16(&mut self.i2c, self.config.address, command.code())
            .map_err(|e| {
                driver_log!(
                    self.config,
                    Level::Error,
                    "Error sending code: {:02X?}",
                    command.address()
                );
                Error::I2cWrite(e)
            })
    }

    fn write_frame(&mut self, frame: &Frame) -> Result<(), Error<I2C::Error>> {
        driver_log!(
            self.config,
            Level::Debug,
            "Sending code: {:02X?}",
            frame.as_bytes()
        );
        self.i2c
            .write(self.config.address, frame.as_bytes())
            .map_err(|e| {
                driver_log!(
                    self.config,
                    Level::Error,
                    "Error sending code: {:02X?}",
                    frame.as_bytes()
                );
                Error::I2cWrite(e)
            })
    }

    // Sends `command` and reads its fixed-size response.
    fn read_response<const N: usize>(
        &mut self,
        command: Command,
    ) -> Result<[u8; N], Error<I2C::Error>> {
        debug_assert_eq!(command.response_len(), Some(N));
        self.send(command)?;

        let mut buf = [0u8; N];
        self.i2c.read(self.config.address, &mut buf).map_err(|e| {
            driver_log!(
                self.config,
                Level::Error,
                "Reading response for: {:02X?}",
                command.address()
            );
            Error::I2cRead(e)
        })?;
        driver_log!(self.config, Level::Debug, "Read {:?}: {:02X?}", command, buf);

        if self.config.checksum_mode == ChecksumMode::Verify {
            codec::verify_checksums(&buf).map_err(|e| {
                driver_log!(
                    self.config,
                    Level::Warn,
                    "{:?} response failed checksum: {:?}",
                    command,
                    e
                );
                e
            })?;
        }
        Ok(buf)
    }
}
