use std::fmt;

/// Error codes carried by connection close. Any of these except `NoError`
/// tears down every stream of the connection.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum QuicErrorCode {
    /// Clean close.
    NoError = 0,
    /// Connection has reached an invalid state.
    InternalError = 1,
    /// There were data frames after a fin or reset.
    StreamDataAfterTermination = 2,
    /// Stream frame data is malformed.
    InvalidFrameData = 4,
    /// The peer is going away. May be a client or server.
    PeerGoingAway = 16,
    /// A stream id was invalid.
    InvalidStreamId = 17,
    /// Too many streams already open.
    TooManyOpenStreams = 18,
    /// Headers id is out of the acceptable window.
    InvalidHeaderId = 22,
    /// There was an error decompressing data.
    DecompressionFailure = 24,
    /// The connection timed out.
    ConnectionTimedOut = 25,
    /// Stream priority is lower than the lowest allowed priority.
    InvalidPriority = 49,
    /// A stream was closed while its header block still had to be decompressed.
    StreamRstBeforeHeadersDecompressed = 51,
}

impl From<u32> for QuicErrorCode {
    /// Converts the given `u32` number to the appropriate `QuicErrorCode` variant.
    fn from(code: u32) -> QuicErrorCode {
        match code {
            0 => QuicErrorCode::NoError,
            1 => QuicErrorCode::InternalError,
            2 => QuicErrorCode::StreamDataAfterTermination,
            4 => QuicErrorCode::InvalidFrameData,
            16 => QuicErrorCode::PeerGoingAway,
            17 => QuicErrorCode::InvalidStreamId,
            18 => QuicErrorCode::TooManyOpenStreams,
            22 => QuicErrorCode::InvalidHeaderId,
            24 => QuicErrorCode::DecompressionFailure,
            25 => QuicErrorCode::ConnectionTimedOut,
            49 => QuicErrorCode::InvalidPriority,
            51 => QuicErrorCode::StreamRstBeforeHeadersDecompressed,
            // Codes we don't know about are treated as internal errors.
            _ => QuicErrorCode::InternalError,
        }
    }
}

impl AsRef<str> for QuicErrorCode {
    fn as_ref(&self) -> &str {
        match *self {
            QuicErrorCode::NoError => "NoError",
            QuicErrorCode::InternalError => "InternalError",
            QuicErrorCode::StreamDataAfterTermination => "StreamDataAfterTermination",
            QuicErrorCode::InvalidFrameData => "InvalidFrameData",
            QuicErrorCode::PeerGoingAway => "PeerGoingAway",
            QuicErrorCode::InvalidStreamId => "InvalidStreamId",
            QuicErrorCode::TooManyOpenStreams => "TooManyOpenStreams",
            QuicErrorCode::InvalidHeaderId => "InvalidHeaderId",
            QuicErrorCode::DecompressionFailure => "DecompressionFailure",
            QuicErrorCode::ConnectionTimedOut => "ConnectionTimedOut",
            QuicErrorCode::InvalidPriority => "InvalidPriority",
            QuicErrorCode::StreamRstBeforeHeadersDecompressed => {
                "StreamRstBeforeHeadersDecompressed"
            }
        }
    }
}

impl Into<u32> for QuicErrorCode {
    #[inline]
    fn into(self) -> u32 {
        self as u32
    }
}

impl fmt::Display for QuicErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_ref())
    }
}

/// Error codes sent in a stream reset. These only affect one stream.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum QuicRstStreamErrorCode {
    /// Clean close.
    NoError = 0,
    /// There was some server error which halted stream processing.
    ServerErrorProcessingStream = 1,
    /// We got two fin or reset offsets which did not match.
    MultipleTerminationOffsets = 2,
    /// We got bad payload and can not respond to it at the protocol level.
    BadApplicationPayload = 3,
    /// Stream closed due to connection error. No reset frame is sent.
    StreamConnectionError = 4,
    /// Go away sent, stream is not processed.
    StreamPeerGoingAway = 5,
    /// The stream has been cancelled.
    StreamCancelled = 6,
}

impl From<u32> for QuicRstStreamErrorCode {
    fn from(code: u32) -> QuicRstStreamErrorCode {
        match code {
            0 => QuicRstStreamErrorCode::NoError,
            1 => QuicRstStreamErrorCode::ServerErrorProcessingStream,
            2 => QuicRstStreamErrorCode::MultipleTerminationOffsets,
            3 => QuicRstStreamErrorCode::BadApplicationPayload,
            4 => QuicRstStreamErrorCode::StreamConnectionError,
            5 => QuicRstStreamErrorCode::StreamPeerGoingAway,
            6 => QuicRstStreamErrorCode::StreamCancelled,
            _ => QuicRstStreamErrorCode::ServerErrorProcessingStream,
        }
    }
}

impl AsRef<str> for QuicRstStreamErrorCode {
    fn as_ref(&self) -> &str {
        match *self {
            QuicRstStreamErrorCode::NoError => "NoError",
            QuicRstStreamErrorCode::ServerErrorProcessingStream => "ServerErrorProcessingStream",
            QuicRstStreamErrorCode::MultipleTerminationOffsets => "MultipleTerminationOffsets",
            QuicRstStreamErrorCode::BadApplicationPayload => "BadApplicationPayload",
            QuicRstStreamErrorCode::StreamConnectionError => "StreamConnectionError",
            QuicRstStreamErrorCode::StreamPeerGoingAway => "StreamPeerGoingAway",
            QuicRstStreamErrorCode::StreamCancelled => "StreamCancelled",
        }
    }
}

impl Into<u32> for QuicRstStreamErrorCode {
    #[inline]
    fn into(self) -> u32 {
        self as u32
    }
}

impl fmt::Display for QuicRstStreamErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_ref())
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn unknown_codes() {
        assert_eq!(QuicErrorCode::InternalError, QuicErrorCode::from(1000));
        assert_eq!(
            QuicRstStreamErrorCode::ServerErrorProcessingStream,
            QuicRstStreamErrorCode::from(1000)
        );
    }

    #[test]
    fn from_into() {
        for &code in &[
            QuicErrorCode::NoError,
            QuicErrorCode::InvalidHeaderId,
            QuicErrorCode::DecompressionFailure,
            QuicErrorCode::InvalidPriority,
        ] {
            let raw: u32 = code.into();
            assert_eq!(code, QuicErrorCode::from(raw));
        }
        let raw: u32 = QuicRstStreamErrorCode::BadApplicationPayload.into();
        assert_eq!(3, raw);
    }

    #[test]
    fn display() {
        assert_eq!("DecompressionFailure", format!("{}", QuicErrorCode::DecompressionFailure));
        assert_eq!(
            "BadApplicationPayload",
            format!("{}", QuicRstStreamErrorCode::BadApplicationPayload)
        );
    }
}
