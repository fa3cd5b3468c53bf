//! Uncompressed SPDY/3 header block.
//!
//! ```ignore
//! +------------------------------------+
//! | Number of Name/Value pairs (int32) |
//! +------------------------------------+
//! |     Length of name (int32)         |
//! +------------------------------------+
//! |           Name (string)            |
//! +------------------------------------+
//! |     Length of value  (int32)       |
//! +------------------------------------+
//! |          Value   (string)          |  <+
//! +------------------------------------+   |
//! |           (repeats)                |   |
//! ```
//!
//! Integers are big-endian.

use bytes::BufMut;
use bytes::Bytes;
use bytes::BytesMut;

use crate::protocol::header::Header;
use crate::protocol::header::Headers;

/// Serialize headers into a header block.
pub fn serialize_header_block(headers: &Headers) -> Bytes {
    let mut len = 4;
    for h in headers.iter() {
        len += 8 + h.name().len() + h.value().len();
    }
    let mut buf = BytesMut::with_capacity(len);
    buf.put_u32(headers.len() as u32);
    for h in headers.iter() {
        buf.put_u32(h.name().len() as u32);
        buf.put_slice(h.name().as_bytes());
        buf.put_u32(h.value().len() as u32);
        buf.put_slice(h.value());
    }
    buf.freeze()
}

struct Reader<'a> {
    buf: &'a [u8],
    pos: usize,
}

impl<'a> Reader<'a> {
    fn read_u32(&mut self) -> Option<u32> {
        if self.buf.len() - self.pos < 4 {
            return None;
        }
        let mut b = [0; 4];
        b.copy_from_slice(&self.buf[self.pos..self.pos + 4]);
        self.pos += 4;
        Some(u32::from_be_bytes(b))
    }

    fn read_string(&mut self) -> Option<&'a [u8]> {
        let len = self.read_u32()? as usize;
        if self.buf.len() - self.pos < len {
            return None;
        }
        let r = &self.buf[self.pos..self.pos + len];
        self.pos += len;
        Some(r)
    }
}

/// Parse a header block from the start of `buf`.
///
/// Returns `Ok(None)` when `buf` does not contain the whole block yet,
/// otherwise the headers and the number of bytes the block occupies.
pub fn parse_header_block(buf: &[u8]) -> crate::Result<Option<(Headers, usize)>> {
    let mut reader = Reader { buf, pos: 0 };
    let count = match reader.read_u32() {
        Some(count) => count,
        None => return Ok(None),
    };

    let mut headers = Vec::new();
    for _ in 0..count {
        let name = match reader.read_string() {
            Some(name) => name,
            None => return Ok(None),
        };
        let value = match reader.read_string() {
            Some(value) => value,
            None => return Ok(None),
        };
        headers.push(Header::new_validate(
            Bytes::copy_from_slice(name),
            Bytes::copy_from_slice(value),
        )?);
    }

    let headers = Headers::from_vec_pseudo_first(headers)?;
    Ok(Some((headers, reader.pos)))
}
