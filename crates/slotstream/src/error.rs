/// Errors that can occur in stream operations.
#[derive(Debug, thiserror::Error)]
pub enum StreamError {
    /// The serialized message needs more chunks than the wire format can
    /// count. The message is not enqueued.
    #[error("Too large data")]
    TooLargeData,

    /// Frame encoding error.
    #[error("frame error: {0}")]
    Frame(#[from] slotstream_frame::FrameError),

    /// Serialization or deserialization failure. On the receive path this
    /// is raised only after the message has passed its integrity check.
    #[error("json error: {0}")]
    Json(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, StreamError>;
