//! Client streams

pub(crate) mod delegate;
pub(crate) mod spdy;
pub(crate) mod stream;

use crate::session::intf::QuicConnection;
use crate::session::Session;
use crate::protocol::StreamId;

use self::spdy::SpdyClientStream;
use self::stream::ClientStream;

impl<C: QuicConnection> Session<C> {
    /// Open a stream with no delegate attached.
    pub fn open_client_stream(&mut self) -> StreamId {
        self.open_stream(ClientStream::new)
    }

    /// Open a stream for one SPDY request.
    pub fn open_spdy_client_stream(&mut self) -> StreamId {
        self.open_stream(SpdyClientStream::new)
    }
}
