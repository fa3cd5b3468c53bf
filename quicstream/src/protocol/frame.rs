use bytes::Bytes;

use crate::protocol::StreamId;
use crate::protocol::StreamOffset;

/// A range of stream bytes as delivered by the transport.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StreamFrame {
    pub stream_id: StreamId,
    /// The last byte of this frame is the last byte of the stream.
    pub fin: bool,
    pub offset: StreamOffset,
    pub data: Bytes,
}

impl StreamFrame {
    pub fn new(
        stream_id: StreamId,
        fin: bool,
        offset: StreamOffset,
        data: impl Into<Bytes>,
    ) -> StreamFrame {
        StreamFrame {
            stream_id,
            fin,
            offset,
            data: data.into(),
        }
    }

    /// Offset right after the last byte of the frame, `None` if it does
    /// not fit into a stream offset.
    pub fn end_offset(&self) -> Option<StreamOffset> {
        self.offset.checked_add(self.data.len() as StreamOffset)
    }
}
