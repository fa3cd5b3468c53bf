//! Server streams

pub(crate) mod handler;
pub(crate) mod spdy;

use std::rc::Rc;

use crate::common::conf::StreamConf;
use crate::protocol::StreamId;
use crate::session::intf::QuicConnection;
use crate::session::intf::SessionStream;
use crate::session::Session;

use self::handler::SpdyRequestHandler;
use self::spdy::SpdyServerStream;

impl<C: QuicConnection> Session<C> {
    /// Answer every stream opened by the peer with `handler`.
    pub fn serve_spdy<H: SpdyRequestHandler>(&mut self, handler: H) {
        let handler: Rc<dyn SpdyRequestHandler> = Rc::new(handler);
        self.set_incoming_stream_factory(Box::new(
            move |id: StreamId, conf: &StreamConf| -> Box<dyn SessionStream> {
                Box::new(SpdyServerStream::new(id, conf, handler.clone()))
            },
        ));
    }
}
