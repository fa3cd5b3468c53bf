//! Header compression seen from the stream layer.
//!
//! Both codec halves are owned by the session and shared by all of its
//! streams. Header blocks are decompressed strictly in header id order.

use bytes::Bytes;

use crate::protocol::header::Headers;
use crate::protocol::HeaderId;
use crate::protocol::QuicPriority;

pub(crate) mod framed;
pub(crate) mod partial_u32;

/// Receives output of [`HeaderDecompressor::decompress_data`].
pub trait DecompressorVisitor {
    /// Decompressed header block bytes. Return `false` to abort.
    fn on_decompressed_data(&mut self, data: &[u8]) -> bool;

    /// Decompressor found input it cannot decode.
    fn on_decompression_error(&mut self);
}

pub trait HeaderDecompressor {
    /// Header id of the block the decompressor expects next.
    fn current_header_id(&self) -> HeaderId;

    /// Feed compressed bytes of the current header block.
    ///
    /// Returns number of bytes consumed. Consumption stops at the end of the
    /// current block, after which `current_header_id` is advanced.
    fn decompress_data(&mut self, data: &[u8], visitor: &mut dyn DecompressorVisitor) -> usize;
}

pub trait HeaderCompressor {
    /// Compressed headers prefixed with the header id.
    fn compress_headers(&mut self, headers: &Headers) -> Bytes;

    /// Same as `compress_headers`, additionally prefixed with priority byte.
    fn compress_headers_with_priority(&mut self, priority: QuicPriority, headers: &Headers)
        -> Bytes;
}
