use std::rc::Rc;

use bytes::Bytes;
use bytes::BytesMut;

use crate::common::conf::StreamConf;
use crate::common::stream::ReliableStream;
use crate::common::stream::StreamCore;
use crate::common::stream::StreamHooks;
use crate::message::SimpleHttpMessage;
use crate::protocol::header::Headers;
use crate::protocol::header_block::parse_header_block;
use crate::protocol::StreamId;
use crate::req_resp::RequestOrResponse;
use crate::server::handler::SpdyRequestHandler;
use crate::session::intf::StreamSession;

/// Server side of one request: collect the request, answer on fin.
pub struct SpdyServerHooks {
    handler: Rc<dyn SpdyRequestHandler>,
    read_buf: BytesMut,
    request_headers_received: bool,
    headers: Headers,
    body: BytesMut,
}

impl SpdyServerHooks {
    pub fn new(handler: Rc<dyn SpdyRequestHandler>) -> SpdyServerHooks {
        SpdyServerHooks {
            handler,
            read_buf: BytesMut::new(),
            request_headers_received: false,
            headers: Headers::new(),
            body: BytesMut::new(),
        }
    }

    pub fn request_headers_received(&self) -> bool {
        self.request_headers_received
    }

    pub fn request_headers(&self) -> &Headers {
        &self.headers
    }

    pub fn request_body(&self) -> &[u8] {
        &self.body
    }

    fn parse_request_headers(&mut self, core: &mut StreamCore, session: &mut dyn StreamSession) {
        let (headers, len) = match parse_header_block(&self.read_buf) {
            Ok(Some(parsed)) => parsed,
            Ok(None) => return,
            Err(e) => {
                warn!("stream {} malformed request headers: {}", core.id(), e);
                return send_error_response(core, session);
            }
        };
        if let Err(e) = headers.validate(RequestOrResponse::Request) {
            warn!("stream {} invalid request headers: {}", core.id(), e);
            return send_error_response(core, session);
        }

        debug!("stream {} request headers: {:?}", core.id(), headers);
        self.headers = headers;
        self.request_headers_received = true;
        let rest = self.read_buf.split_off(len);
        self.body.extend_from_slice(&rest);
        self.read_buf = BytesMut::new();
    }

    fn send_response(&mut self, core: &mut StreamCore, session: &mut dyn StreamSession) {
        let request = SimpleHttpMessage {
            headers: self.headers.clone(),
            body: Bytes::copy_from_slice(&self.body),
        };
        let response = match self.handler.handle_request(&request) {
            Ok(response) => response,
            Err(e) => {
                warn!("stream {} handler failed: {}", core.id(), e);
                return send_error_response(core, session);
            }
        };
        if let Err(e) = response.headers.validate(RequestOrResponse::Response) {
            warn!("stream {} handler returned invalid headers: {}", core.id(), e);
            return send_error_response(core, session);
        }
        send_headers_and_body(core, session, &response.headers, response.body);
    }
}

fn send_error_response(core: &mut StreamCore, session: &mut dyn StreamSession) {
    let mut headers = Headers::internal_error_500();
    headers.add("content-length", "3");
    send_headers_and_body(core, session, &headers, Bytes::from_static(b"bad"));
}

/// Responses are not streamed: reading stops before the response is sent.
fn send_headers_and_body(
    core: &mut StreamCore,
    session: &mut dyn StreamSession,
    headers: &Headers,
    body: Bytes,
) {
    core.close_read_side(session);

    let headers_block = session.compressor().compress_headers(headers);
    let priority = core.priority();
    core.write_or_buffer(session, headers_block, body.is_empty(), priority);
    if !body.is_empty() {
        core.write_or_buffer(session, body, true, priority);
    }
}

impl StreamHooks for SpdyServerHooks {
    fn process_data(
        &mut self,
        core: &mut StreamCore,
        session: &mut dyn StreamSession,
        data: &[u8],
    ) -> crate::Result<usize> {
        if !self.request_headers_received {
            self.read_buf.extend_from_slice(data);
            self.parse_request_headers(core, session);
        } else {
            self.body.extend_from_slice(data);
        }
        Ok(data.len())
    }

    fn terminate_from_peer(
        &mut self,
        core: &mut StreamCore,
        session: &mut dyn StreamSession,
        half_close: bool,
    ) {
        core.terminate_from_peer(session, half_close);
        // Full close, nobody to respond to
        if !half_close {
            return;
        }
        if core.write_side_closed() || core.fin_buffered() {
            return;
        }

        if !self.request_headers_received {
            warn!("stream {} finished before request headers", core.id());
            return send_error_response(core, session);
        }
        if let Some(content_length) = self.headers.content_length() {
            if content_length != self.body.len() as u64 {
                warn!(
                    "stream {} content-length is {}, but received {} bytes",
                    core.id(),
                    content_length,
                    self.body.len()
                );
                return send_error_response(core, session);
            }
        }
        self.send_response(core, session);
    }
}

/// Server stream answering one request with a handler.
pub type SpdyServerStream = ReliableStream<SpdyServerHooks>;

impl ReliableStream<SpdyServerHooks> {
    pub fn new(
        id: StreamId,
        conf: &StreamConf,
        handler: Rc<dyn SpdyRequestHandler>,
    ) -> SpdyServerStream {
        ReliableStream::with_hooks(id, conf, SpdyServerHooks::new(handler))
    }
}
