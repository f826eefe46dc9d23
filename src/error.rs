/// Faults found while framing a request or decoding a response buffer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "thiserror", derive(thiserror::Error))]
pub enum ProtocolError {
    /// The response held fewer bytes than the command's layout requires.
    #[cfg_attr(
        feature = "thiserror",
        error("short response: expected {expected} bytes, got {actual}")
    )]
    ShortResponse { expected: usize, actual: usize },
    /// The checksum byte at `offset` does not match the two data bytes before it.
    #[cfg_attr(feature = "thiserror", error("checksum mismatch at byte {offset}"))]
    ChecksumMismatch { offset: usize },
    /// A write request carried more payload words than a frame holds.
    #[cfg_attr(
        feature = "thiserror",
        error("payload of {words} words exceeds the {max} word limit")
    )]
    PayloadTooLong { words: usize, max: usize },
}

/// Errors returned by the SPS30 driver.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "thiserror", derive(thiserror::Error))]
pub enum Error<E> {
    /// Sending a command to the sensor failed.
    #[cfg_attr(feature = "thiserror", error("I2C write failed: {0:?}"))]
    I2cWrite(E),
    /// Reading a response from the sensor failed.
    #[cfg_attr(feature = "thiserror", error("I2C read failed: {0:?}"))]
    I2cRead(E),
    #[cfg_attr(feature = "thiserror", error(transparent))]
    Protocol(ProtocolError),
}

impl<E> From<ProtocolError> for Error<E> {
    fn from(err: ProtocolError) -> Self {
        Error::Protocol(err)
    }
}
