//! Test doubles for the session, the connection and client delegates.

use std::cell::RefCell;
use std::cmp;
use std::mem;
use std::rc::Rc;

use bytes::BytesMut;

use crate::client::delegate::ClientStreamDelegate;
use crate::codec::framed::FramedCompressor;
use crate::codec::framed::FramedDecompressor;
use crate::codec::HeaderCompressor;
use crate::codec::HeaderDecompressor;
use crate::message::SimpleHttpMessage;
use crate::protocol::error_code::QuicErrorCode;
use crate::protocol::error_code::QuicRstStreamErrorCode;
use crate::protocol::frame::StreamFrame;
use crate::protocol::ConsumedData;
use crate::protocol::HeaderId;
use crate::protocol::QuicPriority;
use crate::protocol::QuicVersion;
use crate::protocol::StreamId;
use crate::protocol::StreamOffset;
use crate::session::intf::QuicConnection;
use crate::session::intf::StreamSession;
use crate::Error;

/// Connection which records everything sent.
#[derive(Debug)]
pub struct ScriptedConnection {
    pub version: QuicVersion,
    pub is_server: bool,
    pub connected: bool,
    pub can_write: bool,
    pub queued_data: bool,
    /// Bytes the connection takes before blocking, unlimited if `None`.
    pub write_budget: Option<usize>,
    pub accept_fin: bool,
    pub written: Vec<StreamFrame>,
    pub rst_streams: Vec<(StreamId, QuicRstStreamErrorCode)>,
    pub connection_close: Option<QuicErrorCode>,
}

impl Default for ScriptedConnection {
    fn default() -> Self {
        ScriptedConnection {
            version: QuicVersion::default(),
            is_server: false,
            connected: true,
            can_write: true,
            queued_data: false,
            write_budget: None,
            accept_fin: true,
            written: Vec::new(),
            rst_streams: Vec::new(),
            connection_close: None,
        }
    }
}

impl ScriptedConnection {
    pub fn new() -> ScriptedConnection {
        Default::default()
    }

    pub fn new_server() -> ScriptedConnection {
        ScriptedConnection {
            is_server: true,
            ..Default::default()
        }
    }

    /// Frames written since the last call.
    pub fn take_frames(&mut self) -> Vec<StreamFrame> {
        mem::take(&mut self.written)
    }
}

impl QuicConnection for ScriptedConnection {
    fn version(&self) -> QuicVersion {
        self.version
    }

    fn is_server(&self) -> bool {
        self.is_server
    }

    fn connected(&self) -> bool {
        self.connected
    }

    fn can_write(&self) -> bool {
        self.can_write
    }

    fn has_queued_data(&self) -> bool {
        self.queued_data
    }

    fn send_stream_data(
        &mut self,
        stream_id: StreamId,
        data: &[&[u8]],
        offset: StreamOffset,
        fin: bool,
    ) -> ConsumedData {
        if !self.connected {
            return ConsumedData::new(0, false);
        }
        let total: usize = data.iter().map(|d| d.len()).sum();
        let accepted = match self.write_budget {
            Some(budget) => cmp::min(budget, total),
            None => total,
        };
        if let Some(budget) = self.write_budget.as_mut() {
            *budget -= accepted;
        }
        let fin_consumed = fin && accepted == total && self.accept_fin;

        if accepted > 0 || fin_consumed {
            let mut buf = BytesMut::with_capacity(accepted);
            for d in data {
                let n = cmp::min(d.len(), accepted - buf.len());
                buf.extend_from_slice(&d[..n]);
            }
            self.written
                .push(StreamFrame::new(stream_id, fin_consumed, offset, buf.freeze()));
        }
        ConsumedData::new(accepted, fin_consumed)
    }

    fn send_rst_stream(&mut self, stream_id: StreamId, error: QuicRstStreamErrorCode) {
        self.rst_streams.push((stream_id, error));
    }

    fn send_connection_close(&mut self, error: QuicErrorCode) {
        if self.connection_close.is_none() {
            self.connection_close = Some(error);
        }
        self.connected = false;
    }
}

/// Session which records stream requests instead of acting on them.
pub struct RecordingSession {
    pub connection: ScriptedConnection,
    pub compressor: FramedCompressor,
    pub decompressor: FramedDecompressor,
    pub closed_streams: Vec<StreamId>,
    pub rst_streams: Vec<(StreamId, QuicRstStreamErrorCode)>,
    pub write_blocked: Vec<(StreamId, QuicPriority)>,
    pub decompression_blocked: Vec<(HeaderId, StreamId)>,
}

impl RecordingSession {
    pub fn new() -> RecordingSession {
        RecordingSession {
            connection: ScriptedConnection::new(),
            compressor: FramedCompressor::new(),
            decompressor: FramedDecompressor::new(),
            closed_streams: Vec::new(),
            rst_streams: Vec::new(),
            write_blocked: Vec::new(),
            decompression_blocked: Vec::new(),
        }
    }
}

impl StreamSession for RecordingSession {
    fn writev_data(
        &mut self,
        stream_id: StreamId,
        data: &[&[u8]],
        offset: StreamOffset,
        fin: bool,
    ) -> ConsumedData {
        self.connection.send_stream_data(stream_id, data, offset, fin)
    }

    fn send_rst_stream(&mut self, stream_id: StreamId, error: QuicRstStreamErrorCode) {
        self.rst_streams.push((stream_id, error));
        self.connection.send_rst_stream(stream_id, error);
        self.close_stream(stream_id);
    }

    fn close_stream(&mut self, stream_id: StreamId) {
        self.closed_streams.push(stream_id);
    }

    fn mark_write_blocked(&mut self, stream_id: StreamId, priority: QuicPriority) {
        self.write_blocked.push((stream_id, priority));
    }

    fn mark_decompression_blocked(&mut self, header_id: HeaderId, stream_id: StreamId) {
        self.decompression_blocked.push((header_id, stream_id));
    }

    fn decompressor(&mut self) -> &mut dyn HeaderDecompressor {
        &mut self.decompressor
    }

    fn compressor(&mut self) -> &mut dyn HeaderCompressor {
        &mut self.compressor
    }

    fn connection(&self) -> &dyn QuicConnection {
        &self.connection
    }

    fn send_connection_close(&mut self, error: QuicErrorCode) {
        self.connection.send_connection_close(error);
    }
}

/// Delegate callback, in the order observed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DelegateEvent {
    SendData,
    SendDataComplete,
    DataReceived(Vec<u8>),
    Close(QuicErrorCode),
    Error(Error),
    Response(SimpleHttpMessage),
}

/// Shared between a test and the delegate it gave away.
#[derive(Debug, Default)]
pub struct DelegateLog {
    pub events: Vec<DelegateEvent>,
    pub headers_complete: bool,
    pub refuse_data: bool,
    pub eof: bool,
}

pub struct RecordingDelegate {
    log: Rc<RefCell<DelegateLog>>,
}

impl RecordingDelegate {
    pub fn new() -> (RecordingDelegate, Rc<RefCell<DelegateLog>>) {
        let log = Rc::new(RefCell::new(DelegateLog::default()));
        (RecordingDelegate { log: log.clone() }, log)
    }
}

impl ClientStreamDelegate for RecordingDelegate {
    fn on_send_data(&mut self) -> crate::Result<()> {
        self.log.borrow_mut().events.push(DelegateEvent::SendData);
        Ok(())
    }

    fn on_send_data_complete(
        &mut self,
        status: crate::Result<()>,
        eof: &mut bool,
    ) -> crate::Result<()> {
        let mut log = self.log.borrow_mut();
        log.events.push(DelegateEvent::SendDataComplete);
        *eof = log.eof;
        status
    }

    fn on_data_received(&mut self, data: &[u8]) -> crate::Result<()> {
        let mut log = self.log.borrow_mut();
        if log.refuse_data {
            return Err(Error::User("refused".to_owned()));
        }
        log.events.push(DelegateEvent::DataReceived(data.to_vec()));
        Ok(())
    }

    fn on_close(&mut self, error: QuicErrorCode) {
        self.log.borrow_mut().events.push(DelegateEvent::Close(error));
    }

    fn on_error(&mut self, error: Error) {
        self.log.borrow_mut().events.push(DelegateEvent::Error(error));
    }

    fn has_send_headers_complete(&self) -> bool {
        self.log.borrow().headers_complete
    }

    fn on_response(&mut self, response: SimpleHttpMessage) {
        self.log
            .borrow_mut()
            .events
            .push(DelegateEvent::Response(response));
    }
}
