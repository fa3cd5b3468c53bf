use crate::message::SimpleHttpMessage;
use crate::protocol::error_code::QuicErrorCode;
use crate::Error;

/// Application side of a client stream.
///
/// A delegate gets exactly one terminal callback: `on_close` or `on_error`.
/// The stream drops the delegate right after it.
pub trait ClientStreamDelegate {
    /// Stream is ready for more request data.
    fn on_send_data(&mut self) -> crate::Result<()>;

    /// Pending write finished. Set `eof` when nothing more will be sent.
    fn on_send_data_complete(&mut self, status: crate::Result<()>, eof: &mut bool)
        -> crate::Result<()>;

    /// Data from the peer, decompressed headers first, then body.
    ///
    /// An error resets the stream.
    fn on_data_received(&mut self, data: &[u8]) -> crate::Result<()>;

    fn on_close(&mut self, error: QuicErrorCode);

    fn on_error(&mut self, error: Error);

    /// Until this returns `true` the stream is scheduled at the highest
    /// priority.
    fn has_send_headers_complete(&self) -> bool;

    /// Complete response of a SPDY stream, delivered right before `on_close`.
    fn on_response(&mut self, _response: SimpleHttpMessage) {}
}
