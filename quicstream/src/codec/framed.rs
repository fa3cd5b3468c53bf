//! Identity header codec.
//!
//! Compressed form of a header block is the serialized block prefixed with
//! its length:
//!
//! ```ignore
//! [priority: u8, optional][header id: u32 le][block len: u32 le][header block]
//! ```
//!
//! The priority and header id are stripped by the receiving stream, the
//! decompressor sees the rest.

use bytes::BufMut;
use bytes::Bytes;
use bytes::BytesMut;

use crate::codec::partial_u32::PartialU32;
use crate::codec::DecompressorVisitor;
use crate::codec::HeaderCompressor;
use crate::codec::HeaderDecompressor;
use crate::protocol::header::Headers;
use crate::protocol::header_block::serialize_header_block;
use crate::protocol::HeaderId;
use crate::protocol::QuicPriority;

/// Larger blocks are treated as corrupted input.
pub const MAX_HEADER_BLOCK_LEN: usize = 1 << 24;

pub struct FramedCompressor {
    next_header_id: HeaderId,
}

impl Default for FramedCompressor {
    fn default() -> Self {
        FramedCompressor::with_first_header_id(1)
    }
}

impl FramedCompressor {
    pub fn new() -> FramedCompressor {
        Default::default()
    }

    pub fn with_first_header_id(header_id: HeaderId) -> FramedCompressor {
        FramedCompressor {
            next_header_id: header_id,
        }
    }

    fn compress(&mut self, priority: Option<QuicPriority>, headers: &Headers) -> Bytes {
        let block = serialize_header_block(headers);
        let mut buf = BytesMut::with_capacity(block.len() + 9);
        if let Some(priority) = priority {
            buf.put_u8(priority as u8);
        }
        buf.put_u32_le(self.next_header_id);
        buf.put_u32_le(block.len() as u32);
        buf.put_slice(&block);
        self.next_header_id += 1;
        buf.freeze()
    }
}

impl HeaderCompressor for FramedCompressor {
    fn compress_headers(&mut self, headers: &Headers) -> Bytes {
        self.compress(None, headers)
    }

    fn compress_headers_with_priority(
        &mut self,
        priority: QuicPriority,
        headers: &Headers,
    ) -> Bytes {
        self.compress(Some(priority), headers)
    }
}

pub struct FramedDecompressor {
    current_header_id: HeaderId,
    block_len: PartialU32,
    /// Remaining bytes of the current block once its length is known.
    remaining: Option<usize>,
    failed: bool,
}

impl Default for FramedDecompressor {
    fn default() -> Self {
        FramedDecompressor::with_first_header_id(1)
    }
}

impl FramedDecompressor {
    pub fn new() -> FramedDecompressor {
        Default::default()
    }

    pub fn with_first_header_id(header_id: HeaderId) -> FramedDecompressor {
        FramedDecompressor {
            current_header_id: header_id,
            block_len: PartialU32::new(),
            remaining: None,
            failed: false,
        }
    }

    fn fail(&mut self, visitor: &mut dyn DecompressorVisitor) -> usize {
        self.failed = true;
        visitor.on_decompression_error();
        0
    }

    fn finish_block(&mut self) {
        trace!("header block {} decompressed", self.current_header_id);
        self.remaining = None;
        self.current_header_id += 1;
    }
}

impl HeaderDecompressor for FramedDecompressor {
    fn current_header_id(&self) -> HeaderId {
        self.current_header_id
    }

    fn decompress_data(&mut self, data: &[u8], visitor: &mut dyn DecompressorVisitor) -> usize {
        if self.failed {
            return self.fail(visitor);
        }

        let mut consumed = 0;
        let remaining = match self.remaining {
            Some(remaining) => remaining,
            None => {
                let (n, len) = self.block_len.feed(data);
                consumed += n;
                match len {
                    None => return consumed,
                    Some(len) if len as usize > MAX_HEADER_BLOCK_LEN => {
                        warn!("header block length too large: {}", len);
                        return self.fail(visitor);
                    }
                    Some(len) => len as usize,
                }
            }
        };

        let take = std::cmp::min(remaining, data.len() - consumed);
        if take != 0 && !visitor.on_decompressed_data(&data[consumed..consumed + take]) {
            return self.fail(visitor);
        }
        consumed += take;

        if take == remaining {
            self.finish_block();
        } else {
            self.remaining = Some(remaining - take);
        }
        consumed
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::protocol::header_block::parse_header_block;

    #[derive(Default)]
    struct Collect {
        data: Vec<u8>,
        errors: u32,
        refuse: bool,
    }

    impl DecompressorVisitor for Collect {
        fn on_decompressed_data(&mut self, data: &[u8]) -> bool {
            self.data.extend_from_slice(data);
            !self.refuse
        }

        fn on_decompression_error(&mut self) {
            self.errors += 1;
        }
    }

    #[test]
    fn header_ids_increase() {
        let mut compressor = FramedCompressor::new();
        let a = compressor.compress_headers(&Headers::new_get("/a"));
        let b = compressor.compress_headers_with_priority(3, &Headers::new_get("/b"));
        assert_eq!(&[1, 0, 0, 0], &a[..4]);
        assert_eq!(&[3, 2, 0, 0, 0], &b[..5]);
    }

    #[test]
    fn decompress_byte_by_byte() {
        let headers = Headers::new_post("/x");
        let compressed = FramedCompressor::new().compress_headers(&headers);
        let mut decompressor = FramedDecompressor::new();
        let mut visitor = Collect::default();

        // skip header id
        for b in compressed[4..].chunks(1) {
            assert_eq!(1, decompressor.current_header_id());
            assert_eq!(1, decompressor.decompress_data(b, &mut visitor));
        }
        assert_eq!(2, decompressor.current_header_id());
        assert_eq!(0, visitor.errors);
        let (parsed, _) = parse_header_block(&visitor.data).unwrap().unwrap();
        assert_eq!(headers, parsed);
    }

    #[test]
    fn stops_at_block_end() {
        let compressed = FramedCompressor::new().compress_headers(&Headers::ok_200());
        let mut input = compressed[4..].to_vec();
        let block_end = input.len();
        input.extend_from_slice(b"body");

        let mut decompressor = FramedDecompressor::new();
        let mut visitor = Collect::default();
        assert_eq!(block_end, decompressor.decompress_data(&input, &mut visitor));
        assert_eq!(2, decompressor.current_header_id());
    }

    #[test]
    fn too_large_block() {
        let mut decompressor = FramedDecompressor::new();
        let mut visitor = Collect::default();
        assert_eq!(0, decompressor.decompress_data(&[0xff; 8], &mut visitor));
        assert_eq!(1, visitor.errors);
        assert_eq!(1, decompressor.current_header_id());
    }

    #[test]
    fn visitor_refuses() {
        let compressed = FramedCompressor::new().compress_headers(&Headers::ok_200());
        let mut decompressor = FramedDecompressor::new();
        let mut visitor = Collect {
            refuse: true,
            ..Default::default()
        };
        assert_eq!(0, decompressor.decompress_data(&compressed[4..], &mut visitor));
        assert_eq!(1, visitor.errors);
    }
}
