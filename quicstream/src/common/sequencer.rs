//! Reassembly of stream frames into an ordered byte stream.

use std::collections::BTreeMap;

use bytes::Bytes;

use crate::protocol::error_code::QuicErrorCode;
use crate::protocol::frame::StreamFrame;
use crate::protocol::StreamOffset;
use crate::Error;

/// Buffers out of order frames of one stream, keyed by offset.
///
/// Every buffered frame starts at or after `num_bytes_consumed`.
#[derive(Debug)]
pub struct StreamSequencer {
    frames: BTreeMap<StreamOffset, Bytes>,
    num_bytes_consumed: StreamOffset,
    /// Offset of the fin, once known.
    close_offset: Option<StreamOffset>,
    max_frame_memory: usize,
}

impl StreamSequencer {
    pub fn new(max_frame_memory: usize) -> StreamSequencer {
        StreamSequencer {
            frames: BTreeMap::new(),
            num_bytes_consumed: 0,
            close_offset: None,
            max_frame_memory,
        }
    }

    pub fn num_bytes_consumed(&self) -> StreamOffset {
        self.num_bytes_consumed
    }

    pub fn num_bytes_buffered(&self) -> usize {
        self.frames.values().map(|f| f.len()).sum()
    }

    pub fn close_offset(&self) -> Option<StreamOffset> {
        self.close_offset
    }

    fn is_duplicate(&self, frame: &StreamFrame) -> bool {
        frame.offset < self.num_bytes_consumed || self.frames.contains_key(&frame.offset)
    }

    /// Whether the frame fits into the buffer. Duplicates are always accepted.
    pub fn will_accept_stream_frame(&self, frame: &StreamFrame) -> bool {
        if self.is_duplicate(frame) {
            return true;
        }
        let data_len = frame.data.len();
        if data_len > self.max_frame_memory {
            return false;
        }
        match frame.end_offset() {
            Some(end_offset) => {
                end_offset - self.num_bytes_consumed <= self.max_frame_memory as StreamOffset
            }
            None => false,
        }
    }

    fn close_stream_at_offset(&mut self, offset: StreamOffset) -> crate::Result<()> {
        match self.close_offset {
            Some(existing) if existing != offset => {
                Err(Error::MultipleTerminationOffsets(existing, offset))
            }
            _ => {
                self.close_offset = Some(offset);
                Ok(())
            }
        }
    }

    /// Buffer a frame.
    ///
    /// Returns `false` if the frame does not fit, errors on conflicting
    /// termination.
    pub fn on_stream_frame(&mut self, frame: &StreamFrame) -> crate::Result<bool> {
        let end_offset = match frame.end_offset() {
            Some(end_offset) => end_offset,
            None => {
                warn!(
                    "frame of {} bytes at offset {} overflows",
                    frame.data.len(),
                    frame.offset
                );
                return Err(Error::ConnectionError(QuicErrorCode::InvalidFrameData));
            }
        };
        if !self.will_accept_stream_frame(frame) {
            return Ok(false);
        }

        if let Some(close_offset) = self.close_offset {
            if end_offset > close_offset {
                warn!(
                    "frame {}..{} past fin offset {}",
                    frame.offset, end_offset, close_offset
                );
                return Err(Error::ConnectionError(
                    QuicErrorCode::StreamDataAfterTermination,
                ));
            }
        }

        if frame.fin {
            self.close_stream_at_offset(end_offset)?;
        }

        if self.is_duplicate(frame) {
            trace!("duplicate frame at offset {}", frame.offset);
            return Ok(true);
        }

        if frame.data.is_empty() {
            return Ok(true);
        }

        self.frames.insert(frame.offset, frame.data.clone());
        Ok(true)
    }

    /// Next contiguous chunk at the read position.
    pub fn next_readable(&self) -> Option<Bytes> {
        self.frames.get(&self.num_bytes_consumed).cloned()
    }

    /// Contiguous readable chunks starting at the read position.
    pub fn readable_regions(&self, max: usize) -> Vec<&[u8]> {
        let mut regions = Vec::new();
        let mut offset = self.num_bytes_consumed;
        for (&frame_offset, data) in self.frames.range(self.num_bytes_consumed..) {
            if regions.len() == max || frame_offset != offset {
                break;
            }
            regions.push(&data[..]);
            offset += data.len() as StreamOffset;
        }
        regions
    }

    pub fn has_bytes_to_read(&self) -> bool {
        self.frames.contains_key(&self.num_bytes_consumed)
    }

    /// Copy readable bytes into `bufs` and consume them.
    pub fn readv(&mut self, bufs: &mut [&mut [u8]]) -> usize {
        let mut total = 0;
        for buf in bufs.iter_mut() {
            let mut filled = 0;
            while filled < buf.len() {
                let data = match self.frames.get(&self.num_bytes_consumed) {
                    Some(data) => data,
                    None => break,
                };
                let n = std::cmp::min(data.len(), buf.len() - filled);
                buf[filled..filled + n].copy_from_slice(&data[..n]);
                filled += n;
                self.advance(n);
            }
            total += filled;
            if filled < buf.len() {
                break;
            }
        }
        total
    }

    /// Consume `n` buffered bytes at the read position.
    pub fn mark_consumed(&mut self, n: usize) -> crate::Result<()> {
        let mut left = n;
        while left > 0 {
            let len = match self.frames.get(&self.num_bytes_consumed) {
                Some(data) => data.len(),
                None => {
                    error!(
                        "cannot consume {} bytes at {}, not buffered",
                        n, self.num_bytes_consumed
                    );
                    return Err(Error::InvalidConsume(self.num_bytes_consumed, n));
                }
            };
            let step = std::cmp::min(len, left);
            self.advance(step);
            left -= step;
        }
        Ok(())
    }

    /// Move read position by `n` bytes of the frame at the read position.
    fn advance(&mut self, n: usize) {
        if n == 0 {
            return;
        }
        let mut data = match self.frames.remove(&self.num_bytes_consumed) {
            Some(data) => data,
            None => return,
        };
        self.num_bytes_consumed += n as StreamOffset;
        if n < data.len() {
            let rest = data.split_off(n);
            self.frames.entry(self.num_bytes_consumed).or_insert(rest);
        }
        self.drop_stale_frames();
    }

    /// Trim frames overlapping already consumed bytes.
    fn drop_stale_frames(&mut self) {
        while let Some((&offset, _)) = self.frames.range(..self.num_bytes_consumed).next() {
            let mut data = match self.frames.remove(&offset) {
                Some(data) => data,
                None => break,
            };
            let end = offset + data.len() as StreamOffset;
            if end > self.num_bytes_consumed {
                let rest = data.split_off((self.num_bytes_consumed - offset) as usize);
                self.frames.entry(self.num_bytes_consumed).or_insert(rest);
            }
        }
    }

    /// All bytes up to the fin have been consumed.
    pub fn is_half_closed(&self) -> bool {
        match self.close_offset {
            Some(close_offset) => self.num_bytes_consumed >= close_offset,
            None => false,
        }
    }
}
