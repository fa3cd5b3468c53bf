use bytes::Bytes;
use bytes::BytesMut;

use crate::client::delegate::ClientStreamDelegate;
use crate::client::stream::ClientHooks;
use crate::common::conf::StreamConf;
use crate::common::stream::ReliableStream;
use crate::common::stream::StreamCore;
use crate::common::stream::StreamHooks;
use crate::message::SimpleHttpMessage;
use crate::protocol::error_code::QuicRstStreamErrorCode;
use crate::protocol::header::Headers;
use crate::protocol::header_block::parse_header_block;
use crate::protocol::QuicPriority;
use crate::protocol::StreamId;
use crate::protocol::HIGHEST_PRIORITY;
use crate::req_resp::RequestOrResponse;
use crate::session::intf::StreamSession;
use crate::Error;

/// One request and its response over a client stream.
#[derive(Default)]
pub struct SpdyClientHooks {
    client: ClientHooks,
    /// Response bytes until the header block is complete.
    read_buf: BytesMut,
    response_headers_received: bool,
    headers: Headers,
    body: BytesMut,
    /// Length of the compressed request headers, once sent.
    request_headers_len: Option<u64>,
}

impl SpdyClientHooks {
    pub fn new() -> SpdyClientHooks {
        Default::default()
    }

    pub fn client(&self) -> &ClientHooks {
        &self.client
    }

    pub fn client_mut(&mut self) -> &mut ClientHooks {
        &mut self.client
    }

    /// Parse accumulated response header block.
    ///
    /// Returns the block length or `-1` if more data is needed or the
    /// block is malformed, in which case the stream is reset.
    fn parse_response_headers(
        &mut self,
        core: &mut StreamCore,
        session: &mut dyn StreamSession,
    ) -> isize {
        let parsed = parse_header_block(&self.read_buf).and_then(|parsed| match parsed {
            Some((headers, len)) => {
                headers.validate(RequestOrResponse::Response)?;
                Ok(Some((headers, len)))
            }
            None => Ok(None),
        });
        let (headers, len) = match parsed {
            Ok(Some(parsed)) => parsed,
            Ok(None) => return -1,
            Err(e) => {
                warn!("stream {} malformed response headers: {}", core.id(), e);
                core.close(session, QuicRstStreamErrorCode::BadApplicationPayload);
                self.client.notify_error(e);
                return -1;
            }
        };

        debug!("stream {} response headers: {:?}", core.id(), headers);
        self.headers = headers;
        self.response_headers_received = true;
        let rest = self.read_buf.split_off(len);
        self.body.extend_from_slice(&rest);
        self.read_buf = BytesMut::new();
        len as isize
    }

    /// Response is complete and consistent with its content-length.
    fn validate_response(&self) -> crate::Result<()> {
        if !self.response_headers_received {
            return Err(Error::ResponseHeadersNotReceived);
        }
        match self.headers.content_length() {
            Some(content_length) if content_length != self.body.len() as u64 => Err(
                Error::ContentLengthMismatch(content_length, self.body.len() as u64),
            ),
            _ => Ok(()),
        }
    }
}

impl StreamHooks for SpdyClientHooks {
    fn process_data(
        &mut self,
        core: &mut StreamCore,
        session: &mut dyn StreamSession,
        data: &[u8],
    ) -> crate::Result<usize> {
        if !self.response_headers_received {
            self.read_buf.extend_from_slice(data);
            self.parse_response_headers(core, session);
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
        let delegate = self.client.take_delegate();
        core.terminate_from_peer(session, half_close);

        if core.stream_error() != QuicRstStreamErrorCode::NoError {
            // Reset or connection error
            if let Some(mut delegate) = delegate {
                delegate.on_close(core.connection_error());
            }
            return;
        }

        match self.validate_response() {
            Ok(()) => {
                if let Some(mut delegate) = delegate {
                    delegate.on_response(SimpleHttpMessage {
                        headers: self.headers.clone(),
                        body: Bytes::copy_from_slice(&self.body),
                    });
                    delegate.on_close(core.connection_error());
                }
            }
            Err(e) => {
                warn!("stream {} bad response: {}", core.id(), e);
                core.close(session, QuicRstStreamErrorCode::BadApplicationPayload);
                if let Some(mut delegate) = delegate {
                    delegate.on_error(e);
                }
            }
        }
    }

    fn effective_priority(&self, core: &StreamCore) -> QuicPriority {
        match self.request_headers_len {
            Some(len) if core.bytes_written() >= len => core.priority(),
            _ => HIGHEST_PRIORITY,
        }
    }

    fn on_can_write(&mut self, core: &mut StreamCore, session: &mut dyn StreamSession) {
        let priority = self.effective_priority(core);
        self.client.drain(core, session, priority);
    }

    fn on_drop(&mut self, core: &StreamCore) {
        self.client.on_drop(core);
    }
}

/// Client stream sending one request and collecting the response.
pub type SpdyClientStream = ReliableStream<SpdyClientHooks>;

impl ReliableStream<SpdyClientHooks> {
    pub fn new(id: StreamId, conf: &StreamConf) -> SpdyClientStream {
        ReliableStream::with_hooks(id, conf, SpdyClientHooks::new())
    }

    /// Panics if a delegate is already attached.
    pub fn set_delegate(&mut self, delegate: Box<dyn ClientStreamDelegate>) {
        self.hooks_mut().client.set_delegate(delegate);
    }

    pub fn take_delegate(&mut self) -> Option<Box<dyn ClientStreamDelegate>> {
        self.hooks_mut().client.take_delegate()
    }

    /// Write compressed headers, then the body. Fin goes with the last
    /// written part.
    ///
    /// Returns number of bytes written or buffered.
    pub fn send_request(
        &mut self,
        session: &mut dyn StreamSession,
        headers: &Headers,
        body: impl Into<Bytes>,
        fin: bool,
    ) -> usize {
        let body = body.into();
        let headers_block = if session.connection().version().has_priority_prefix() {
            let priority = self.core().priority();
            session
                .compressor()
                .compress_headers_with_priority(priority, headers)
        } else {
            session.compressor().compress_headers(headers)
        };
        debug!(
            "stream {} request headers {} bytes, body {} bytes",
            self.id(),
            headers_block.len(),
            body.len()
        );

        let headers_len = headers_block.len();
        self.hooks_mut().request_headers_len =
            Some(self.core().bytes_written() + headers_len as u64);

        let fin_with_headers = fin && body.is_empty();
        self.write_or_buffer(session, headers_block, fin_with_headers);
        let body_len = body.len();
        if !body.is_empty() {
            self.write_or_buffer(session, body, fin);
        }
        headers_len + body_len
    }

    pub fn response_headers_received(&self) -> bool {
        self.hooks().response_headers_received
    }

    pub fn response_headers(&self) -> &Headers {
        &self.hooks().headers
    }

    pub fn response_body(&self) -> &[u8] {
        &self.hooks().body
    }

    /// Response received so far, `None` before the headers are parsed.
    pub fn response(&self) -> Option<SimpleHttpMessage> {
        if !self.hooks().response_headers_received {
            return None;
        }
        Some(SimpleHttpMessage {
            headers: self.hooks().headers.clone(),
            body: Bytes::copy_from_slice(&self.hooks().body),
        })
    }
}
