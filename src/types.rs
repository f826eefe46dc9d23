use core::fmt;

use heapless::Vec;

/// SPS30 measurement values.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct AirQualityReading {
    /// Mass Concentration PM1.0 [μg/m³]
    pub mass_pm1_0: f32,
    /// Mass Concentration PM2.5 [μg/m³]
    pub mass_pm2_5: f32,
    /// Mass Concentration PM4.0 [μg/m³]
    pub mass_pm4_0: f32,
    /// Mass Concentration PM10 [μg/m³]
    pub mass_pm10_0: f32,
    /// Number Concentration PM0.5 [#/cm³]
    pub number_pm0_5: f32,
    /// Number Concentration PM1.0 [#/cm³]
    pub number_pm1_0: f32,
    /// Number Concentration PM2.5 [#/cm³]
    pub number_pm2_5: f32,
    /// Number Concentration PM4.0 [#/cm³]
    pub number_pm4_0: f32,
    /// Number Concentration PM10 [#/cm³]
    pub number_pm10_0: f32,
    /// Typical Particle Size [μm]
    pub typical_particle_size: f32,
}

/// Data-ready flag reported by the sensor.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DataReady {
    /// A new measurement can be read.
    Ready,
    /// No new measurement since the last read.
    NotReady,
}

impl DataReady {
    /// `true` for [`DataReady::Ready`].
    pub fn is_ready(self) -> bool {
        self == DataReady::Ready
    }
}

/// Firmware version as reported by the sensor.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FirmwareVersion {
    /// Major version number.
    pub major: u8,
    /// Minor version number.
    pub minor: u8,
}

impl fmt::Display for FirmwareVersion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{}", self.major, self.minor)
    }
}

/// Maximum number of characters in an identity string (article code or serial).
pub const DEVICE_STRING_CAPACITY: usize = 32;

/// ASCII identity string read from the sensor, stored inline.
#[derive(Clone, PartialEq, Eq)]
pub struct DeviceString(Vec<u8, DEVICE_STRING_CAPACITY>);

impl DeviceString {
    pub(crate) const fn new() -> Self {
        Self(Vec::new())
    }

    /// Appends a byte, handing it back once the buffer is full.
    pub(crate) fn push(&mut self, byte: u8) -> Result<(), u8> {
        self.0.push(byte)
    }

    /// Raw bytes as read, checksum bytes removed.
    pub fn as_bytes(&self) -> &[u8] {
        &self.0
    }

    /// The bytes as a `str`, failing on invalid UTF-8.
    pub fn as_str(&self) -> Result<&str, core::str::Utf8Error> {
        core::str::from_utf8(self.as_bytes())
    }

    /// Number of bytes.
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// `true` if no bytes were read.
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl Default for DeviceString {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for DeviceString {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for chunk in self.as_bytes().utf8_chunks() {
            f.write_str(chunk.valid())?;
            if !chunk.invalid().is_empty() {
                f.write_str("\u{FFFD}")?;
            }
        }
        Ok(())
    }
}

impl fmt::Debug for DeviceString {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "DeviceString({:?})", self.as_bytes())
    }
}
