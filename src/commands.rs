//! SPS30 I2C command set.
//!
//! Commands are 16-bit big endian addresses. Write payloads are 16-bit words,
//! each followed by a CRC-8 byte.

use heapless::Vec;

use crate::crc::crc;
use crate::error::ProtocolError;

/// Payload of `StartMeasurement` selecting big endian IEEE754 float output.
pub const OUTPUT_FORMAT_FLOAT: u16 = 0x0300;

/// Response length of `ReadArticleCode` and `ReadSerialNumber`.
pub const IDENTITY_LEN: usize = 47;
/// Response length of `ReadMeasurement`.
pub const MEASUREMENT_LEN: usize = 60;
pub const DATA_READY_LEN: usize = 3;
pub const CLEANING_INTERVAL_LEN: usize = 6;
pub const FIRMWARE_VERSION_LEN: usize = 3;

/// Largest write payload in words.
pub const MAX_PAYLOAD_WORDS: usize = 2;

/// Largest write frame: address plus `MAX_PAYLOAD_WORDS` words with checksums.
pub const MAX_FRAME_LEN: usize = 2 + 3 * MAX_PAYLOAD_WORDS;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Command {
    /// Enter measurement mode. One data word: output format.
    StartMeasurement = 0x0010,
    /// Return to idle mode.
    StopMeasurement = 0x0104,
    /// Data-ready flag, 3 byte response.
    ReadDataReady = 0x0202,
    /// Measured values, 60 byte response.
    ReadMeasurement = 0x0300,
    /// Read (6 byte response) or write (two data words) the cleaning interval.
    AutoCleaningInterval = 0x8004,
    /// Run the fan at maximum speed for 10 seconds.
    StartFanCleaning = 0x5607,
    /// Nul-terminated article code, 47 byte response.
    ReadArticleCode = 0xD025,
    /// Serial number, 47 byte response.
    ReadSerialNumber = 0xD033,
    /// Firmware version, 3 byte response.
    ReadFirmwareVersion = 0xD100,
    /// Soft reset.
    Reset = 0xD304,
}

impl Command {
    pub const fn code(self) -> u16 {
        self as u16
    }

    pub const fn address(self) -> [u8; 2] {
        self.code().to_be_bytes()
    }

    /// Response length in bytes for commands that are followed by a read.
    pub const fn response_len(self) -> Option<usize> {
        match self {
            Command::ReadDataReady => Some(DATA_READY_LEN),
            Command::ReadMeasurement => Some(MEASUREMENT_LEN),
            Command::AutoCleaningInterval => Some(CLEANING_INTERVAL_LEN),
            Command::ReadArticleCode | Command::ReadSerialNumber => Some(IDENTITY_LEN),
            Command::ReadFirmwareVersion => Some(FIRMWARE_VERSION_LEN),
            Command::StartMeasurement
            | Command::StopMeasurement
            | Command::StartFanCleaning
            | Command::Reset => None,
        }
    }
}

/// A framed write request: `[addr_hi, addr_lo, (word_hi, word_lo, crc)*]`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Frame(Vec<u8, MAX_FRAME_LEN>);

impl Frame {
    /// Frames `command` with the given payload words. At most
    /// `MAX_PAYLOAD_WORDS` words fit in a frame.
    pub fn new(command: Command, words: &[u16]) -> Result<Self, ProtocolError> {
        let too_long = |_| ProtocolError::PayloadTooLong {
            words: words.len(),
            max: MAX_PAYLOAD_WORDS,
        };
        let mut buf = Vec::new();
        buf.extend_from_slice(&command.address()).map_err(too_long)?;
        for word in words {
            let bytes = word.to_be_bytes();
            buf.extend_from_slice(&bytes).map_err(too_long)?;
            buf.push(crc(&bytes)).map_err(|_| too_long(()))?;
        }
        Ok(Frame(buf))
    }

    pub fn as_bytes(&self) -> &[u8] {
        &self.0
    }
}
