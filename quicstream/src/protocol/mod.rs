//! Identifiers, constants and wire-level vocabulary shared by the stream layer.

pub(crate) mod error_code;
pub(crate) mod frame;
pub mod header;
pub mod header_block;
pub(crate) mod state;

/// Stream identifier, unique within a session.
pub type StreamId = u32;

/// Identifier of a compressed header block.
///
/// Header ids are assigned by the peer's compressor in strictly increasing
/// order; blocks must be decompressed in that order across all streams.
pub type HeaderId = u32;

/// Byte offset within a stream.
pub type StreamOffset = u64;

/// Stream priority, `0` is the most urgent.
pub type QuicPriority = u32;

/// The most urgent priority.
pub const HIGHEST_PRIORITY: QuicPriority = 0;

/// The least urgent priority.
pub const LOWEST_PRIORITY: QuicPriority = 7;

/// Default priority assigned to new streams.
pub const DEFAULT_PRIORITY: QuicPriority = 3;

/// Stream used by the handshake. Its data is never header-compressed.
pub const CRYPTO_STREAM_ID: StreamId = 1;

/// QUIC wire version negotiated by the connection.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct QuicVersion(pub u32);

/// Last version without priority in the header prefix.
pub const QUIC_VERSION_8: QuicVersion = QuicVersion(8);
/// First version where the client prefixes each stream with its priority.
pub const QUIC_VERSION_9: QuicVersion = QuicVersion(9);

impl QuicVersion {
    /// Whether client-initiated streams start with a priority byte.
    pub fn has_priority_prefix(&self) -> bool {
        *self >= QUIC_VERSION_9
    }
}

impl Default for QuicVersion {
    fn default() -> Self {
        QUIC_VERSION_9
    }
}

/// How much of a write the transport took.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ConsumedData {
    /// Number of payload bytes accepted.
    pub bytes_consumed: usize,
    /// Whether the fin flag was accepted together with the bytes.
    pub fin_consumed: bool,
}

impl ConsumedData {
    pub fn new(bytes_consumed: usize, fin_consumed: bool) -> ConsumedData {
        ConsumedData {
            bytes_consumed,
            fin_consumed,
        }
    }
}
