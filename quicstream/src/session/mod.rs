//! Session: owns the streams of one connection, routes transport events to
//! them and schedules blocked writers.

use std::collections::BTreeMap;
use std::collections::HashMap;
use std::mem;

use crate::codec::framed::FramedCompressor;
use crate::codec::framed::FramedDecompressor;
use crate::codec::HeaderCompressor;
use crate::codec::HeaderDecompressor;
use crate::common::closed_streams::ClosedStreams;
use crate::common::conf::SessionConf;
use crate::common::conf::StreamConf;
use crate::common::write_blocked_list::WriteBlockedList;
use crate::protocol::error_code::QuicErrorCode;
use crate::protocol::error_code::QuicRstStreamErrorCode;
use crate::protocol::frame::StreamFrame;
use crate::protocol::ConsumedData;
use crate::protocol::HeaderId;
use crate::protocol::QuicPriority;
use crate::protocol::StreamId;
use crate::protocol::StreamOffset;
use crate::protocol::CRYPTO_STREAM_ID;
use crate::protocol::HIGHEST_PRIORITY;

pub(crate) mod intf;

use self::intf::QuicConnection;
use self::intf::SessionStream;
use self::intf::StreamSession;

/// Creates streams opened by the peer.
pub type IncomingStreamFactory = Box<dyn FnMut(StreamId, &StreamConf) -> Box<dyn SessionStream>>;

/// Session state a stream may touch during a call.
pub struct SessionCore<C: QuicConnection> {
    connection: C,
    decompressor: Box<dyn HeaderDecompressor>,
    compressor: Box<dyn HeaderCompressor>,
    write_blocked_streams: WriteBlockedList<StreamId>,
    /// Priority of each stream in `write_blocked_streams`.
    blocked_priorities: HashMap<StreamId, QuicPriority>,
    /// Streams waiting for the decompressor to reach their header id.
    decompression_blocked_streams: BTreeMap<HeaderId, StreamId>,
    /// Streams to remove once the current stream call returns.
    pending_close: Vec<StreamId>,
    pending_connection_close: Option<QuicErrorCode>,
    connection_closed: bool,
}

impl<C: QuicConnection> StreamSession for SessionCore<C> {
    fn writev_data(
        &mut self,
        stream_id: StreamId,
        data: &[&[u8]],
        offset: StreamOffset,
        fin: bool,
    ) -> ConsumedData {
        self.connection
            .send_stream_data(stream_id, data, offset, fin)
    }

    fn send_rst_stream(&mut self, stream_id: StreamId, error: QuicRstStreamErrorCode) {
        if self.connection.connected() {
            self.connection.send_rst_stream(stream_id, error);
        } else {
            debug!("not connected, rst of stream {} not sent", stream_id);
        }
        self.close_stream(stream_id);
    }

    fn close_stream(&mut self, stream_id: StreamId) {
        if !self.pending_close.contains(&stream_id) {
            self.pending_close.push(stream_id);
        }
    }

    fn mark_write_blocked(&mut self, stream_id: StreamId, priority: QuicPriority) {
        let priority = if stream_id == CRYPTO_STREAM_ID {
            HIGHEST_PRIORITY
        } else {
            WriteBlockedList::<StreamId>::clamp_priority(priority)
        };
        match self.blocked_priorities.get(&stream_id) {
            Some(&blocked) if blocked == priority => return,
            Some(&blocked) => self
                .write_blocked_streams
                .remove_stream_from_write_blocked_list(stream_id, blocked),
            None => {}
        }
        trace!("stream {} write blocked at priority {}", stream_id, priority);
        self.blocked_priorities.insert(stream_id, priority);
        self.write_blocked_streams.push_back(stream_id, priority);
    }

    fn mark_decompression_blocked(&mut self, header_id: HeaderId, stream_id: StreamId) {
        self.decompression_blocked_streams
            .insert(header_id, stream_id);
    }

    fn decompressor(&mut self) -> &mut dyn HeaderDecompressor {
        &mut *self.decompressor
    }

    fn compressor(&mut self) -> &mut dyn HeaderCompressor {
        &mut *self.compressor
    }

    fn connection(&self) -> &dyn QuicConnection {
        &self.connection
    }

    fn send_connection_close(&mut self, error: QuicErrorCode) {
        if self.connection_closed || self.pending_connection_close.is_some() {
            return;
        }
        warn!("closing connection: {}", error);
        self.connection.send_connection_close(error);
        self.pending_connection_close = Some(error);
    }
}

/// Streams of one connection.
pub struct Session<C: QuicConnection> {
    core: SessionCore<C>,
    streams: HashMap<StreamId, Box<dyn SessionStream>>,
    closed_streams: ClosedStreams,
    next_stream_id: StreamId,
    incoming: Option<IncomingStreamFactory>,
    conf: SessionConf,
    ndc: &'static str,
}

impl<C: QuicConnection> Session<C> {
    /// Session with the length prefixed header codec.
    pub fn new(connection: C, conf: SessionConf) -> Session<C> {
        Session::new_with_codec(
            connection,
            conf,
            Box::new(FramedCompressor::new()),
            Box::new(FramedDecompressor::new()),
        )
    }

    pub fn new_with_codec(
        connection: C,
        conf: SessionConf,
        compressor: Box<dyn HeaderCompressor>,
        decompressor: Box<dyn HeaderDecompressor>,
    ) -> Session<C> {
        let is_server = connection.is_server();
        Session {
            core: SessionCore {
                connection,
                decompressor,
                compressor,
                write_blocked_streams: WriteBlockedList::new(),
                blocked_priorities: HashMap::new(),
                decompression_blocked_streams: BTreeMap::new(),
                pending_close: Vec::new(),
                pending_connection_close: None,
                connection_closed: false,
            },
            streams: HashMap::new(),
            closed_streams: ClosedStreams::new(),
            // Stream 1 is the crypto stream
            next_stream_id: if is_server { 2 } else { 3 },
            incoming: None,
            conf,
            ndc: if is_server {
                "server session"
            } else {
                "client session"
            },
        }
    }

    pub fn set_incoming_stream_factory(&mut self, factory: IncomingStreamFactory) {
        self.incoming = Some(factory);
    }

    pub fn conf(&self) -> &SessionConf {
        &self.conf
    }

    pub fn connection(&self) -> &C {
        &self.core.connection
    }

    pub fn connection_mut(&mut self) -> &mut C {
        &mut self.core.connection
    }

    pub fn is_server(&self) -> bool {
        self.core.connection.is_server()
    }

    /// Connection close was sent or received.
    pub fn is_connection_closed(&self) -> bool {
        self.core.connection_closed
    }

    pub fn num_open_streams(&self) -> usize {
        self.streams.len()
    }

    pub fn has_stream(&self, stream_id: StreamId) -> bool {
        self.streams.contains_key(&stream_id)
    }

    /// Stream was open recently and has been removed.
    pub fn is_closed_stream(&self, stream_id: StreamId) -> bool {
        self.closed_streams.contains(stream_id)
    }

    pub fn num_write_blocked_streams(&self) -> usize {
        self.core.write_blocked_streams.num_blocked_streams()
    }

    pub fn has_write_blocked_streams(&self) -> bool {
        self.core.write_blocked_streams.has_write_blocked_streams()
    }

    /// Header id the decompressor expects next.
    pub fn current_header_id(&self) -> HeaderId {
        self.core.decompressor.current_header_id()
    }

    /// Allocate an id for a stream opened by this side.
    pub fn next_outgoing_stream_id(&mut self) -> StreamId {
        let id = self.next_stream_id;
        self.next_stream_id += 2;
        id
    }

    fn is_locally_initiated(&self, stream_id: StreamId) -> bool {
        stream_id % 2 == self.next_stream_id % 2
    }

    /// Register a stream created by the application.
    ///
    /// Returns the id of the new stream.
    pub fn open_stream<S, F>(&mut self, create: F) -> StreamId
    where
        S: SessionStream,
        F: FnOnce(StreamId, &StreamConf) -> S,
    {
        let id = self.next_outgoing_stream_id();
        let stream = create(id, &self.conf.stream);
        debug!("open stream {}", id);
        self.activate_stream(Box::new(stream));
        id
    }

    /// Register a stream with an id chosen by the caller, crypto stream
    /// for example.
    pub fn activate_stream(&mut self, stream: Box<dyn SessionStream>) {
        let id = stream.id();
        let prev = self.streams.insert(id, stream);
        debug_assert!(prev.is_none(), "stream {} activated twice", id);
    }

    pub fn get_stream<S: SessionStream>(&self, stream_id: StreamId) -> Option<&S> {
        self.streams.get(&stream_id)?.as_any().downcast_ref()
    }

    /// Call `f` with a stream and the session it may call back into.
    ///
    /// Returns `None` if there is no such stream or it is not an `S`.
    pub fn with_stream<S, R, F>(&mut self, stream_id: StreamId, f: F) -> Option<R>
    where
        S: SessionStream,
        F: FnOnce(&mut S, &mut dyn StreamSession) -> R,
    {
        let _guard = log_ndc::push(self.ndc);
        let r = {
            let stream = self.streams.get_mut(&stream_id)?;
            let stream = stream.as_any_mut().downcast_mut::<S>()?;
            f(stream, &mut self.core)
        };
        self.process_pending();
        Some(r)
    }

    /// Find the stream of a received frame, opening it if the peer started
    /// a new one.
    fn get_or_create_incoming(&mut self, stream_id: StreamId) -> bool {
        if self.streams.contains_key(&stream_id) {
            return true;
        }
        if self.closed_streams.contains(stream_id) {
            trace!("frame for closed stream {}", stream_id);
            return false;
        }
        if stream_id == CRYPTO_STREAM_ID {
            warn!("crypto stream is not active");
            return false;
        }
        if self.is_locally_initiated(stream_id) {
            if stream_id >= self.next_stream_id {
                warn!("peer used unopened local stream id {}", stream_id);
                self.core
                    .send_connection_close(QuicErrorCode::InvalidStreamId);
            }
            return false;
        }
        if self.streams.len() >= self.conf.max_open_streams() {
            warn!(
                "too many open streams: {}, refusing {}",
                self.streams.len(),
                stream_id
            );
            self.core
                .send_connection_close(QuicErrorCode::TooManyOpenStreams);
            return false;
        }
        let incoming = match self.incoming.as_mut() {
            Some(incoming) => incoming,
            None => {
                warn!("no incoming streams accepted, dropping stream {}", stream_id);
                return false;
            }
        };
        debug!("new incoming stream {}", stream_id);
        let stream = incoming(stream_id, &self.conf.stream);
        self.streams.insert(stream_id, stream);
        true
    }

    /// Frames received in one packet.
    ///
    /// Returns `false` if a frame could not be accepted, the transport
    /// should retransmit.
    pub fn on_stream_frames(&mut self, frames: &[StreamFrame]) -> bool {
        let _guard = log_ndc::push(self.ndc);

        for frame in frames {
            if !self.core.connection.connected() || self.core.connection_closed {
                return false;
            }
            if frame.end_offset().is_none() {
                warn!(
                    "stream {} frame offset {} overflows",
                    frame.stream_id, frame.offset
                );
                self.core
                    .send_connection_close(QuicErrorCode::InvalidFrameData);
                self.process_pending();
                return false;
            }
            if !self.get_or_create_incoming(frame.stream_id) {
                continue;
            }
            if let Some(stream) = self.streams.get(&frame.stream_id) {
                if !stream.will_accept_stream_frame(frame) {
                    debug!("stream {} does not accept frame", frame.stream_id);
                    self.process_pending();
                    return false;
                }
            }
        }

        for frame in frames {
            if self.core.pending_connection_close.is_some() {
                break;
            }
            if let Some(stream) = self.streams.get_mut(&frame.stream_id) {
                stream.on_stream_frame(&mut self.core, frame);
            }
        }

        self.resume_decompression_blocked();
        self.process_pending();
        true
    }

    /// Wake streams whose header block is next to decompress.
    fn resume_decompression_blocked(&mut self) {
        loop {
            if self.core.pending_connection_close.is_some() {
                return;
            }
            let current = self.core.decompressor.current_header_id();
            let (header_id, stream_id) =
                match self.core.decompression_blocked_streams.iter().next() {
                    Some((&header_id, &stream_id)) => (header_id, stream_id),
                    None => return,
                };
            if header_id != current {
                return;
            }
            self.core.decompression_blocked_streams.remove(&header_id);

            match self.streams.get_mut(&stream_id) {
                Some(stream) if !stream.is_fully_closed() => {
                    stream.on_decompressor_available(&mut self.core);
                }
                _ => {
                    warn!(
                        "stream {} closed before headers {} decompressed",
                        stream_id, header_id
                    );
                    self.core.send_connection_close(
                        QuicErrorCode::StreamRstBeforeHeadersDecompressed,
                    );
                    return;
                }
            }

            if self.core.decompressor.current_header_id() == current {
                // Stream is waiting for more data
                return;
            }
        }
    }

    pub fn on_rst_stream(&mut self, stream_id: StreamId, error: QuicRstStreamErrorCode) {
        let _guard = log_ndc::push(self.ndc);
        match self.streams.get_mut(&stream_id) {
            Some(stream) => stream.on_stream_reset(&mut self.core, error),
            None => debug!("rst for unknown stream {}: {}", stream_id, error),
        }
        self.process_pending();
    }

    /// Transport can take more data. Every blocked stream gets at most one
    /// chance to write.
    ///
    /// Returns `true` if no stream is left blocked.
    pub fn on_can_write(&mut self) -> bool {
        let _guard = log_ndc::push(self.ndc);

        let mut remaining = self.core.write_blocked_streams.num_blocked_streams();
        while remaining > 0
            && self.core.connection.can_write()
            && !self.core.connection.has_queued_data()
        {
            remaining -= 1;
            if !self.core.write_blocked_streams.has_write_blocked_streams() {
                break;
            }
            let priority = self
                .core
                .write_blocked_streams
                .get_highest_priority_write_blocked_list();
            let stream_id = self.core.write_blocked_streams.pop_front(priority);
            self.core.blocked_priorities.remove(&stream_id);

            match self.streams.get_mut(&stream_id) {
                Some(stream) if !stream.is_fully_closed() => stream.on_can_write(&mut self.core),
                _ => trace!("blocked stream {} is gone", stream_id),
            }
        }

        self.process_pending();
        !self.core.write_blocked_streams.has_write_blocked_streams()
    }

    /// Connection is closed by the transport or the peer.
    pub fn on_connection_closed(&mut self, error: QuicErrorCode, from_peer: bool) {
        let _guard = log_ndc::push(self.ndc);
        if self.core.connection_closed {
            return;
        }
        info!("connection closed: {}, from peer: {}", error, from_peer);
        self.core.connection_closed = true;
        self.core.pending_connection_close = None;
        self.close_all_streams(error, from_peer);
        self.process_pending();
    }

    fn close_all_streams(&mut self, error: QuicErrorCode, from_peer: bool) {
        let ids: Vec<StreamId> = self.streams.keys().cloned().collect();
        for id in ids {
            if let Some(stream) = self.streams.get_mut(&id) {
                stream.connection_close(&mut self.core, error, from_peer);
            }
            self.core.close_stream(id);
        }
        self.core.decompression_blocked_streams.clear();
    }

    fn remove_stream(&mut self, stream_id: StreamId) {
        let mut stream = match self.streams.remove(&stream_id) {
            Some(stream) => stream,
            None => return,
        };
        debug!("remove stream {}", stream_id);
        stream.on_close();
        if let Some(priority) = self.core.blocked_priorities.remove(&stream_id) {
            self.core
                .write_blocked_streams
                .remove_stream_from_write_blocked_list(stream_id, priority);
        }
        self.closed_streams.add(stream_id);
    }

    /// Apply removals and connection close requested by streams.
    fn process_pending(&mut self) {
        loop {
            if let Some(error) = self.core.pending_connection_close.take() {
                self.core.connection_closed = true;
                self.close_all_streams(error, false);
            }
            let pending = mem::take(&mut self.core.pending_close);
            if pending.is_empty() {
                return;
            }
            for stream_id in pending {
                self.remove_stream(stream_id);
            }
        }
    }
}
