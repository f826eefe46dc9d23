use log::LevelFilter;

/// Default I2C address of the SPS30.
pub const DEFAULT_ADDRESS: u8 = 0x69;

/// How checksum bytes in sensor responses are treated.
#[derive(PartialEq, Eq, Copy, Clone, Debug)]
pub enum ChecksumMode {
    /// Checksum bytes are discarded without being checked.
    Ignore,
    /// Every complete `[data, data, checksum]` group is verified.
    Verify,
}

/// Configuration settings for the SPS30 driver.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct Config {
    /// I2C address of the sensor.
    pub address: u8,
    /// Read-path checksum handling.
    pub checksum_mode: ChecksumMode,
    /// Most verbose level the driver logs at.
    pub log_level: LevelFilter,
}

impl Config {
    /// Creates a new `Config` with the given address, ignoring checksums and
    /// logging at `Info`.
    pub fn new(address: u8) -> Config {
        Config {
            address,
            ..Config::default()
        }
    }

    /// Sets the I2C address.
    pub fn address(mut self, address: u8) -> Self {
        self.address = address;
        self
    }

    /// Sets the checksum handling.
    pub fn checksum_mode(mut self, checksum_mode: ChecksumMode) -> Self {
        self.checksum_mode = checksum_mode;
        self
    }

    /// Sets the log level. `LevelFilter::Off` silences the driver.
    pub fn log_level(mut self, log_level: LevelFilter) -> Self {
        self.log_level = log_level;
        self
    }
}

impl Default for Config {
    /// Address `0x69`, checksums ignored, log level `Info`.
    fn default() -> Config {
        Config {
            address: DEFAULT_ADDRESS,
            checksum_mode: ChecksumMode::Ignore,
            log_level: LevelFilter::Info,
        }
    }
}
