use crate::assert_types::*;
use crate::protocol::error_code::QuicErrorCode;
use crate::protocol::error_code::QuicRstStreamErrorCode;
use crate::protocol::header::HeaderError;
use crate::protocol::StreamOffset;

/// Errors surfaced by streams to their delegates and handlers.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[allow(missing_docs)]
pub enum Error {
    #[error("Connection error: {0}")]
    ConnectionError(QuicErrorCode),
    #[error("Stream reset: {0}")]
    StreamReset(QuicRstStreamErrorCode),
    #[error("No delegate attached, data discarded")]
    Aborted,
    #[error("Write side of the stream is closed")]
    WriteSideClosed,
    #[error("Header error: {0}")]
    HeaderError(#[from] HeaderError),
    #[error("Stream terminated at offset {0}, then at offset {1}")]
    MultipleTerminationOffsets(StreamOffset, StreamOffset),
    #[error("Cannot consume {1} bytes at offset {0}, data is not buffered")]
    InvalidConsume(StreamOffset, usize),
    #[error("Content-length is {0}, but received {1} bytes")]
    ContentLengthMismatch(u64, u64),
    #[error("Stream finished before response headers were received")]
    ResponseHeadersNotReceived,
    #[error("Internal error: {0}")]
    InternalError(String),
    #[error("User error: {0}")]
    User(String),
}

fn _assert_error_sync_send() {
    assert_send::<Error>();
    assert_sync::<Error>();
}

impl From<QuicErrorCode> for Error {
    fn from(code: QuicErrorCode) -> Error {
        Error::ConnectionError(code)
    }
}

impl From<QuicRstStreamErrorCode> for Error {
    fn from(code: QuicRstStreamErrorCode) -> Error {
        Error::StreamReset(code)
    }
}

impl Error {
    /// Code to reset the stream with when this error aborts it.
    pub fn rst_stream_error_code(&self) -> QuicRstStreamErrorCode {
        match self {
            Error::StreamReset(code) => *code,
            Error::MultipleTerminationOffsets(..) => {
                QuicRstStreamErrorCode::MultipleTerminationOffsets
            }
            Error::HeaderError(_)
            | Error::ContentLengthMismatch(..)
            | Error::ResponseHeadersNotReceived => QuicRstStreamErrorCode::BadApplicationPayload,
            Error::ConnectionError(_) => QuicRstStreamErrorCode::StreamConnectionError,
            _ => QuicRstStreamErrorCode::ServerErrorProcessingStream,
        }
    }
}
