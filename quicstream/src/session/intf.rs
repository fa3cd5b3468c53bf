use std::any::Any;

use crate::codec::HeaderCompressor;
use crate::codec::HeaderDecompressor;
use crate::protocol::error_code::QuicErrorCode;
use crate::protocol::error_code::QuicRstStreamErrorCode;
use crate::protocol::frame::StreamFrame;
use crate::protocol::ConsumedData;
use crate::protocol::HeaderId;
use crate::protocol::QuicPriority;
use crate::protocol::QuicVersion;
use crate::protocol::StreamId;
use crate::protocol::StreamOffset;

/// Packet level transport a session writes to.
pub trait QuicConnection {
    fn version(&self) -> QuicVersion;

    fn is_server(&self) -> bool;

    fn connected(&self) -> bool;

    /// Whether the connection would accept a write right now.
    fn can_write(&self) -> bool;

    /// Connection has data it could not send yet.
    fn has_queued_data(&self) -> bool;

    /// Send stream data, possibly only a prefix of it.
    fn send_stream_data(
        &mut self,
        stream_id: StreamId,
        data: &[&[u8]],
        offset: StreamOffset,
        fin: bool,
    ) -> ConsumedData;

    fn send_rst_stream(&mut self, stream_id: StreamId, error: QuicRstStreamErrorCode);

    fn send_connection_close(&mut self, error: QuicErrorCode);
}

/// What a stream needs from the session owning it.
///
/// The session is passed to every stream call, streams hold no reference
/// to it. Stream removal requested through `close_stream` happens after
/// the stream call returns.
pub trait StreamSession {
    fn writev_data(
        &mut self,
        stream_id: StreamId,
        data: &[&[u8]],
        offset: StreamOffset,
        fin: bool,
    ) -> ConsumedData;

    /// Reset the stream and close it.
    fn send_rst_stream(&mut self, stream_id: StreamId, error: QuicRstStreamErrorCode);

    /// Stream is done, remove it.
    fn close_stream(&mut self, stream_id: StreamId);

    /// Give the stream a chance to write when the transport unblocks.
    fn mark_write_blocked(&mut self, stream_id: StreamId, priority: QuicPriority);

    /// Resume the stream when the decompressor gets to `header_id`.
    fn mark_decompression_blocked(&mut self, header_id: HeaderId, stream_id: StreamId);

    fn decompressor(&mut self) -> &mut dyn HeaderDecompressor;

    fn compressor(&mut self) -> &mut dyn HeaderCompressor;

    fn connection(&self) -> &dyn QuicConnection;

    /// Close the whole connection.
    fn send_connection_close(&mut self, error: QuicErrorCode);
}

/// Stream as seen by the session.
pub trait SessionStream: Any {
    fn id(&self) -> StreamId;

    fn will_accept_stream_frame(&self, frame: &StreamFrame) -> bool;

    fn on_stream_frame(&mut self, session: &mut dyn StreamSession, frame: &StreamFrame) -> bool;

    fn on_stream_reset(&mut self, session: &mut dyn StreamSession, error: QuicRstStreamErrorCode);

    fn connection_close(
        &mut self,
        session: &mut dyn StreamSession,
        error: QuicErrorCode,
        from_peer: bool,
    );

    fn on_can_write(&mut self, session: &mut dyn StreamSession);

    fn on_decompressor_available(&mut self, session: &mut dyn StreamSession);

    fn effective_priority(&self) -> QuicPriority;

    fn is_fully_closed(&self) -> bool;

    /// Session removes the stream.
    fn on_close(&mut self);

    fn as_any(&self) -> &dyn Any;

    fn as_any_mut(&mut self) -> &mut dyn Any;
}
