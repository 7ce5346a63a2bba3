/// Errors that can occur while encoding frames.
///
/// Decoding never errors: a buffer that does not match the full pattern is
/// simply "no frame" (see [`crate::Frame::decode`]).
#[derive(Debug, thiserror::Error)]
pub enum FrameError {
    /// The remaining-chunk counter exceeds the three-digit field.
    #[error("remaining chunk count {0} exceeds field width (max 999)")]
    RemainingOutOfRange(u16),

    /// The sequence number exceeds the single-digit field.
    #[error("sequence number {0} exceeds field width (max 9)")]
    SequenceOutOfRange(u8),
}

pub type Result<T> = std::result::Result<T, FrameError>;
