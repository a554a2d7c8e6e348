use thiserror::Error;

#[derive(Debug, PartialEq, Error)]
pub enum Error<TIoError> {
    /// Wrapped error from the HAL.
    #[error("pin I/O failed: {0:?}")]
    Wrapped(TIoError),
    /// Invalid argument was provided.
    #[error("invalid argument")]
    InvalidArgument,
    /// The line did not change level within the maximum half-cycle wait.
    ///
    /// Transitions 0-3 are the sensor's acknowledgment, so a timeout there
    /// usually means nothing is connected.
    #[error("no level change after transition {transition}")]
    Timeout { transition: u8 },
    /// The transition loop ended before all 40 bits were captured.
    #[error("only {bits} of 40 bits were captured")]
    IncompleteFrame { bits: u8 },
    /// A full frame was captured but its checksum byte does not match.
    #[error("checksum mismatch: expected {expected:#04x}, got {actual:#04x}")]
    ChecksumMismatch { expected: u8, actual: u8 },
    /// The model number does not name a supported sensor family.
    #[error("unsupported sensor family {0}")]
    UnsupportedFamily(u8),
    /// The pin was lost after a failed direction switch.
    #[error("pin unavailable")]
    PinUnavailable,
}

impl<TIoError> From<TIoError> for Error<TIoError> {
    fn from(error: TIoError) -> Error<TIoError> {
        Error::Wrapped(error)
    }
}
