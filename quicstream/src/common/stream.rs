//! Reliable stream: half-close state, buffered writes, priority and header
//! decompression sequencing.
//!
//! A stream is split in two parts: [`StreamCore`] holds the state common to
//! every stream, [`StreamHooks`] is the behaviour specific to a kind of
//! stream (client, SPDY client, SPDY server). [`ReliableStream`] glues them
//! together and drives the hooks.

use std::any::Any;
use std::cmp;
use std::collections::VecDeque;

use bytes::Bytes;
use bytes::BytesMut;

use crate::codec::partial_u32::PartialU32;
use crate::codec::DecompressorVisitor;
use crate::common::conf::StreamConf;
use crate::common::sequencer::StreamSequencer;
use crate::misc::BsDebug;
use crate::protocol::error_code::QuicErrorCode;
use crate::protocol::error_code::QuicRstStreamErrorCode;
use crate::protocol::frame::StreamFrame;
use crate::protocol::state::StreamSide;
use crate::protocol::state::StreamState;
use crate::protocol::ConsumedData;
use crate::protocol::HeaderId;
use crate::protocol::QuicPriority;
use crate::protocol::StreamId;
use crate::protocol::CRYPTO_STREAM_ID;
use crate::protocol::DEFAULT_PRIORITY;
use crate::protocol::LOWEST_PRIORITY;
use crate::session::intf::SessionStream;
use crate::session::intf::StreamSession;
use crate::Error;

/// Result of [`ReliableStream::write_or_buffer`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WriteOrBufferResult {
    /// Always the whole input: what the transport did not take is buffered.
    pub bytes_accepted: usize,
    /// Nothing was buffered, data (and fin if requested) went to the transport.
    pub wrote_eagerly: bool,
}

/// Collects decompressor output.
struct DecompressedHeaderSink<'a> {
    buf: &'a mut BytesMut,
    failed: bool,
}

impl<'a> DecompressorVisitor for DecompressedHeaderSink<'a> {
    fn on_decompressed_data(&mut self, data: &[u8]) -> bool {
        self.buf.extend_from_slice(data);
        true
    }

    fn on_decompression_error(&mut self) {
        self.failed = true;
    }
}

/// State shared by all kinds of streams.
pub struct StreamCore {
    id: StreamId,
    state: StreamState,
    /// Poison flag, once set the stream never processes data again.
    decompression_failed: bool,

    priority: QuicPriority,
    priority_parsed: bool,

    /// Includes duplicate bytes of retransmitted frames.
    bytes_read: u64,
    /// Bytes accepted by the transport.
    bytes_written: u64,

    queued_data: VecDeque<Bytes>,
    fin_buffered: bool,
    fin_sent: bool,

    sequencer: StreamSequencer,

    header_id_parser: PartialU32,
    headers_id: Option<HeaderId>,
    headers_decompressed: bool,
    decompressed_headers: BytesMut,
    max_header_id_delta: u32,

    stream_error: QuicRstStreamErrorCode,
    connection_error: QuicErrorCode,
}

impl StreamCore {
    pub fn new(id: StreamId, conf: &StreamConf) -> StreamCore {
        StreamCore {
            id,
            state: StreamState::Open,
            decompression_failed: false,
            priority: DEFAULT_PRIORITY,
            priority_parsed: false,
            bytes_read: 0,
            bytes_written: 0,
            queued_data: VecDeque::new(),
            fin_buffered: false,
            fin_sent: false,
            sequencer: StreamSequencer::new(conf.max_frame_memory()),
            header_id_parser: PartialU32::new(),
            headers_id: None,
            // Crypto stream data is never compressed.
            headers_decompressed: id == CRYPTO_STREAM_ID,
            decompressed_headers: BytesMut::new(),
            max_header_id_delta: conf.max_header_id_delta(),
            stream_error: QuicRstStreamErrorCode::NoError,
            connection_error: QuicErrorCode::NoError,
        }
    }

    pub fn id(&self) -> StreamId {
        self.id
    }

    pub fn state(&self) -> StreamState {
        self.state
    }

    pub fn read_side_closed(&self) -> bool {
        self.state.is_read_closed()
    }

    pub fn write_side_closed(&self) -> bool {
        self.state.is_write_closed()
    }

    pub fn bytes_read(&self) -> u64 {
        self.bytes_read
    }

    pub fn bytes_written(&self) -> u64 {
        self.bytes_written
    }

    pub fn priority(&self) -> QuicPriority {
        self.priority
    }

    /// Priority can only be changed before anything is written.
    pub fn set_priority(&mut self, priority: QuicPriority) {
        debug_assert_eq!(
            0, self.bytes_written,
            "priority set after stream {} wrote data",
            self.id
        );
        self.priority = priority;
    }

    pub fn headers_id(&self) -> Option<HeaderId> {
        self.headers_id
    }

    pub fn headers_decompressed(&self) -> bool {
        self.headers_decompressed
    }

    pub fn decompression_failed(&self) -> bool {
        self.decompression_failed
    }

    pub fn stream_error(&self) -> QuicRstStreamErrorCode {
        self.stream_error
    }

    pub fn connection_error(&self) -> QuicErrorCode {
        self.connection_error
    }

    pub fn fin_buffered(&self) -> bool {
        self.fin_buffered
    }

    pub fn fin_sent(&self) -> bool {
        self.fin_sent
    }

    pub fn has_buffered_data(&self) -> bool {
        !self.queued_data.is_empty()
    }

    /// Bytes written by the stream but not yet taken by the transport.
    pub fn buffered_bytes(&self) -> usize {
        self.queued_data.iter().map(|d| d.len()).sum()
    }

    pub fn sequencer(&self) -> &StreamSequencer {
        &self.sequencer
    }

    fn close_side(&mut self, session: &mut dyn StreamSession, side: StreamSide) {
        if self.state.is_closed(side) {
            return;
        }
        self.state = self.state.close(side);
        debug!("stream {} {:?} side closed, now {:?}", self.id, side, self.state);
        if self.state.is_fully_closed() {
            session.close_stream(self.id);
        }
    }

    /// Stop reading. The session is asked to remove the stream once both
    /// sides are closed.
    pub fn close_read_side(&mut self, session: &mut dyn StreamSession) {
        self.close_side(session, StreamSide::Read);
    }

    /// Stop writing. The session is asked to remove the stream once both
    /// sides are closed.
    pub fn close_write_side(&mut self, session: &mut dyn StreamSession) {
        self.close_side(session, StreamSide::Write);
    }

    /// Close the stream, resetting it unless `error` is `NoError`.
    ///
    /// Every call sends a reset, callers must not close twice.
    pub fn close(&mut self, session: &mut dyn StreamSession, error: QuicRstStreamErrorCode) {
        debug!("close stream {}: {}", self.id, error);
        self.stream_error = error;
        if error != QuicRstStreamErrorCode::NoError {
            session.send_rst_stream(self.id, error);
        } else {
            session.close_stream(self.id);
        }
        self.close_both_sides();
    }

    /// Peer finished (`half_close`) or aborted the stream.
    pub fn terminate_from_peer(&mut self, session: &mut dyn StreamSession, half_close: bool) {
        if half_close {
            self.close_read_side(session);
        } else {
            self.close_write_side(session);
            self.close_read_side(session);
        }
    }

    /// Session removes the stream. No notification is sent back.
    pub(crate) fn on_close(&mut self) {
        self.close_both_sides();
    }

    fn close_both_sides(&mut self) {
        self.state = self.state.close(StreamSide::Write).close(StreamSide::Read);
    }

    pub fn on_decompression_error(&mut self, session: &mut dyn StreamSession) {
        debug_assert!(!self.decompression_failed);
        warn!("stream {} decompression failed", self.id);
        self.decompression_failed = true;
        session.send_connection_close(QuicErrorCode::DecompressionFailure);
    }

    /// Strip the priority (server side only) and header id prefix.
    ///
    /// Returns number of bytes consumed.
    fn strip_priority_and_header_id(
        &mut self,
        session: &mut dyn StreamSession,
        data: &[u8],
    ) -> usize {
        let mut parsed = 0;

        let has_priority = {
            let connection = session.connection();
            connection.is_server() && connection.version().has_priority_prefix()
        };
        if !self.priority_parsed && has_priority && !data.is_empty() {
            let priority = data[0] as QuicPriority;
            parsed = 1;
            self.priority_parsed = true;
            if priority > LOWEST_PRIORITY {
                warn!("stream {} invalid priority {}", self.id, priority);
                session.send_connection_close(QuicErrorCode::InvalidPriority);
                return 0;
            }
            self.priority = priority;
        }

        let data = &data[parsed..];
        if !data.is_empty() && self.headers_id.is_none() {
            let (n, headers_id) = self.header_id_parser.feed(data);
            parsed += n;
            if let Some(headers_id) = headers_id {
                trace!("stream {} headers id {}", self.id, headers_id);
                self.headers_id = Some(headers_id);
            }
        }
        parsed
    }

    /// Decompressed headers are read first, then the stream data.
    pub fn readv(&mut self, bufs: &mut [&mut [u8]]) -> usize {
        if self.headers_decompressed && self.decompressed_headers.is_empty() {
            return self.sequencer.readv(bufs);
        }
        let mut consumed = 0;
        for buf in bufs.iter_mut() {
            if consumed == self.decompressed_headers.len() {
                break;
            }
            let n = cmp::min(buf.len(), self.decompressed_headers.len() - consumed);
            buf[..n].copy_from_slice(&self.decompressed_headers[consumed..consumed + n]);
            consumed += n;
        }
        let _ = self.decompressed_headers.split_to(consumed);
        consumed
    }

    pub fn readable_regions(&self, max: usize) -> Vec<&[u8]> {
        if self.headers_decompressed && self.decompressed_headers.is_empty() {
            return self.sequencer.readable_regions(max);
        }
        if max == 0 {
            return Vec::new();
        }
        vec![&self.decompressed_headers[..]]
    }

    fn writev_data_internal(
        &mut self,
        session: &mut dyn StreamSession,
        data: &[&[u8]],
        fin: bool,
        priority: QuicPriority,
    ) -> ConsumedData {
        if self.state.is_write_closed() {
            error!("stream {} attempt to write when the write side is closed", self.id);
            return ConsumedData::new(0, false);
        }

        let write_length: usize = data.iter().map(|d| d.len()).sum();
        let consumed = session.writev_data(self.id, data, self.bytes_written, fin);
        self.bytes_written += consumed.bytes_consumed as u64;
        trace!(
            "stream {} wrote {}/{} bytes, fin {}/{}",
            self.id,
            consumed.bytes_consumed,
            write_length,
            consumed.fin_consumed,
            fin
        );

        if consumed.bytes_consumed == write_length && (!fin || consumed.fin_consumed) {
            if fin {
                self.fin_sent = true;
                self.close_write_side(session);
            }
        } else {
            session.mark_write_blocked(self.id, priority);
        }
        consumed
    }

    pub(crate) fn write_or_buffer(
        &mut self,
        session: &mut dyn StreamSession,
        data: Bytes,
        fin: bool,
        priority: QuicPriority,
    ) -> WriteOrBufferResult {
        debug_assert!(!self.fin_buffered, "stream {} fin buffered twice", self.id);
        self.fin_buffered = fin;

        let mut consumed = ConsumedData::default();
        if self.queued_data.is_empty() {
            consumed = self.writev_data_internal(session, &[&data[..]], fin, priority);
        }

        let queue = consumed.bytes_consumed < data.len() || (fin && !consumed.fin_consumed);
        if queue {
            self.queued_data.push_back(data.slice(consumed.bytes_consumed..));
        }
        WriteOrBufferResult {
            bytes_accepted: data.len(),
            wrote_eagerly: !queue,
        }
    }

    /// Drain buffered data in order. Fin goes with the last chunk.
    pub fn on_can_write(&mut self, session: &mut dyn StreamSession, priority: QuicPriority) {
        let mut fin = false;
        while let Some(data) = self.queued_data.front().cloned() {
            if self.queued_data.len() == 1 && self.fin_buffered {
                fin = true;
            }
            let consumed = self.writev_data_internal(session, &[&data[..]], fin, priority);
            if consumed.bytes_consumed == data.len() && fin == consumed.fin_consumed {
                self.queued_data.pop_front();
            } else {
                if let Some(front) = self.queued_data.front_mut() {
                    *front = data.slice(consumed.bytes_consumed..);
                }
                break;
            }
        }
    }
}

/// Behaviour specific to a kind of stream.
///
/// Hooks get the stream state and the session with every call.
pub trait StreamHooks {
    /// Data for the application, decompressed headers first, then body.
    ///
    /// Returns number of bytes consumed. On error the data is dropped.
    fn process_data(
        &mut self,
        core: &mut StreamCore,
        session: &mut dyn StreamSession,
        data: &[u8],
    ) -> crate::Result<usize>;

    /// Peer finished sending (`half_close`) or aborted the stream.
    fn terminate_from_peer(
        &mut self,
        core: &mut StreamCore,
        session: &mut dyn StreamSession,
        half_close: bool,
    ) {
        core.terminate_from_peer(session, half_close);
    }

    /// Priority the stream is scheduled with.
    fn effective_priority(&self, core: &StreamCore) -> QuicPriority {
        core.priority()
    }

    /// Transport can take more data.
    fn on_can_write(&mut self, core: &mut StreamCore, session: &mut dyn StreamSession) {
        let priority = self.effective_priority(core);
        core.on_can_write(session, priority);
    }

    /// Stream is removed from the session.
    fn on_close(&mut self, _core: &StreamCore) {}

    /// Stream object is dropped.
    fn on_drop(&mut self, _core: &StreamCore) {}
}

/// A stream with its hooks.
pub struct ReliableStream<H: StreamHooks> {
    core: StreamCore,
    hooks: H,
}

impl<H: StreamHooks> ReliableStream<H> {
    pub fn with_hooks(id: StreamId, conf: &StreamConf, hooks: H) -> ReliableStream<H> {
        ReliableStream {
            core: StreamCore::new(id, conf),
            hooks,
        }
    }

    pub fn id(&self) -> StreamId {
        self.core.id
    }

    pub fn core(&self) -> &StreamCore {
        &self.core
    }

    pub fn core_mut(&mut self) -> &mut StreamCore {
        &mut self.core
    }

    pub fn hooks(&self) -> &H {
        &self.hooks
    }

    pub fn hooks_mut(&mut self) -> &mut H {
        &mut self.hooks
    }

    /// Frames are always accepted once the read side is closed, they are
    /// dropped later.
    pub fn will_accept_stream_frame(&self, frame: &StreamFrame) -> bool {
        if self.core.state.is_read_closed() {
            return true;
        }
        self.core.sequencer.will_accept_stream_frame(frame)
    }

    pub fn on_stream_frame(&mut self, session: &mut dyn StreamSession, frame: &StreamFrame) -> bool {
        assert_eq!(frame.stream_id, self.core.id);
        if self.core.state.is_read_closed() {
            trace!("stream {} read side closed, ignoring frame", self.core.id);
            return true;
        }

        self.core.bytes_read += frame.data.len() as u64;

        let accepted = match self.core.sequencer.on_stream_frame(frame) {
            Ok(accepted) => accepted,
            Err(e) => {
                warn!("stream {} bad frame: {}", self.core.id, e);
                self.fail(session, e);
                return false;
            }
        };
        if accepted {
            self.flush_buffered_frames(session);
        }
        accepted
    }

    fn fail(&mut self, session: &mut dyn StreamSession, error: Error) {
        match error {
            Error::ConnectionError(code) => session.send_connection_close(code),
            e => {
                let code = e.rst_stream_error_code();
                self.core.close(session, code);
            }
        }
    }

    /// Pass contiguous buffered data to the stream until it stops consuming.
    fn flush_buffered_frames(&mut self, session: &mut dyn StreamSession) {
        loop {
            if self.core.state.is_read_closed() {
                return;
            }
            let data = match self.core.sequencer.next_readable() {
                Some(data) => data,
                None => break,
            };
            let consumed = self.process_raw_data(session, &data);
            if consumed > data.len() {
                error!(
                    "stream {} consumed {} bytes of {}",
                    self.core.id,
                    consumed,
                    data.len()
                );
                self.core
                    .close(session, QuicRstStreamErrorCode::ServerErrorProcessingStream);
                return;
            }
            if let Err(e) = self.core.sequencer.mark_consumed(consumed) {
                self.fail(session, e);
                return;
            }
            if consumed < data.len() {
                break;
            }
        }
        self.maybe_close_from_peer(session);
    }

    fn maybe_close_from_peer(&mut self, session: &mut dyn StreamSession) {
        if self.core.sequencer.is_half_closed() && !self.core.state.is_read_closed() {
            self.terminate_from_peer(session, true);
        }
    }

    fn process_data(&mut self, session: &mut dyn StreamSession, data: &[u8]) -> usize {
        if self.core.state.is_read_closed() {
            trace!("stream {} read side closed, dropping {} bytes", self.core.id, data.len());
            return data.len();
        }
        match self.hooks.process_data(&mut self.core, session, data) {
            Ok(consumed) => consumed,
            Err(e) => {
                warn!(
                    "stream {} dropped {:?}: {}",
                    self.core.id,
                    BsDebug(data),
                    e
                );
                data.len()
            }
        }
    }

    /// Hand decompressed headers to the stream.
    fn process_header_data(&mut self, session: &mut dyn StreamSession) -> usize {
        if self.core.decompressed_headers.is_empty() {
            return 0;
        }
        let headers = self.core.decompressed_headers.split().freeze();
        let processed = cmp::min(self.process_data(session, &headers), headers.len());
        if processed < headers.len() {
            let mut rest = BytesMut::from(&headers[processed..]);
            rest.extend_from_slice(&self.core.decompressed_headers);
            self.core.decompressed_headers = rest;
        }
        processed
    }

    /// Split raw stream data into the prefix, the compressed header block
    /// and the body.
    ///
    /// Returns number of bytes consumed. Less than `data.len()` is returned
    /// when the stream is blocked on decompression or the application.
    pub fn process_raw_data(&mut self, session: &mut dyn StreamSession, data: &[u8]) -> usize {
        debug_assert!(!data.is_empty());
        if self.core.id == CRYPTO_STREAM_ID {
            return self.process_data(session, data);
        }
        if self.core.decompression_failed {
            return 0;
        }

        let mut total = 0;
        let mut data = data;
        if self.core.headers_id.is_none() {
            total = self.core.strip_priority_and_header_id(session, data);
            data = &data[total..];
            if data.is_empty() || total == 0 {
                return total;
            }
        }
        let headers_id = match self.core.headers_id {
            Some(headers_id) => headers_id,
            None => return total,
        };

        if self.core.headers_decompressed {
            if !self.core.decompressed_headers.is_empty() {
                self.process_header_data(session);
            }
            if self.core.decompressed_headers.is_empty() {
                total += self.process_data(session, data);
            }
            return total;
        }

        let current_header_id = session.decompressor().current_header_id();
        if headers_id < current_header_id
            || headers_id > current_header_id.saturating_add(self.core.max_header_id_delta)
        {
            warn!(
                "stream {} invalid headers id {}, current {}",
                self.core.id, headers_id, current_header_id
            );
            session.send_connection_close(QuicErrorCode::InvalidHeaderId);
            return total;
        }

        if current_header_id != headers_id {
            trace!(
                "stream {} waits for headers id {}, current {}",
                self.core.id,
                headers_id,
                current_header_id
            );
            session.mark_decompression_blocked(headers_id, self.core.id);
            return total;
        }

        let mut sink = DecompressedHeaderSink {
            buf: &mut self.core.decompressed_headers,
            failed: false,
        };
        let consumed = session.decompressor().decompress_data(data, &mut sink);
        if sink.failed {
            self.core.on_decompression_error(session);
            return total;
        }
        if consumed == 0 || consumed > data.len() {
            error!(
                "stream {} decompressor consumed {} of {} bytes",
                self.core.id,
                consumed,
                data.len()
            );
            self.core.on_decompression_error(session);
            return total;
        }
        total += consumed;
        let data = &data[consumed..];

        // Headers are complete once the decompressor moved to the next id.
        self.core.headers_decompressed = session.decompressor().current_header_id() != headers_id;
        if !self.core.headers_decompressed {
            debug_assert!(data.is_empty());
        }

        self.process_header_data(session);

        if !self.core.headers_decompressed || !self.core.decompressed_headers.is_empty() {
            return total;
        }

        if !data.is_empty() {
            total += self.process_data(session, data);
        }
        total
    }

    /// The decompressor reached this stream's header id.
    pub fn on_decompressor_available(&mut self, session: &mut dyn StreamSession) {
        if self.core.decompression_failed
            || self.core.headers_decompressed
            || self.core.state.is_read_closed()
        {
            return;
        }
        debug_assert_eq!(
            self.core.headers_id,
            Some(session.decompressor().current_header_id())
        );
        let headers_id = self.core.headers_id;

        while !self.core.headers_decompressed {
            let data = match self.core.sequencer.next_readable() {
                Some(data) => data,
                None => return,
            };

            let mut sink = DecompressedHeaderSink {
                buf: &mut self.core.decompressed_headers,
                failed: false,
            };
            let consumed = session.decompressor().decompress_data(&data, &mut sink);
            if sink.failed || consumed == 0 || consumed > data.len() {
                self.core.on_decompression_error(session);
                return;
            }
            if let Err(e) = self.core.sequencer.mark_consumed(consumed) {
                self.fail(session, e);
                return;
            }

            self.core.headers_decompressed =
                Some(session.decompressor().current_header_id()) != headers_id;
        }

        self.process_header_data(session);
        if self.core.sequencer.is_half_closed() {
            self.maybe_close_from_peer(session);
        } else if self.core.decompressed_headers.is_empty() {
            self.flush_buffered_frames(session);
        }
    }

    pub fn readv(&mut self, bufs: &mut [&mut [u8]]) -> usize {
        self.core.readv(bufs)
    }

    pub fn readable_regions(&self, max: usize) -> Vec<&[u8]> {
        self.core.readable_regions(max)
    }

    pub fn effective_priority(&self) -> QuicPriority {
        self.hooks.effective_priority(&self.core)
    }

    /// Write data, buffering what the transport does not take.
    pub fn write_or_buffer(
        &mut self,
        session: &mut dyn StreamSession,
        data: impl Into<Bytes>,
        fin: bool,
    ) -> WriteOrBufferResult {
        let priority = self.effective_priority();
        self.core.write_or_buffer(session, data.into(), fin, priority)
    }

    /// Same as `write_or_buffer`, the whole input is reported consumed.
    pub fn write_data(
        &mut self,
        session: &mut dyn StreamSession,
        data: impl Into<Bytes>,
        fin: bool,
    ) -> ConsumedData {
        let r = self.write_or_buffer(session, data, fin);
        ConsumedData::new(r.bytes_accepted, true)
    }

    pub fn on_can_write(&mut self, session: &mut dyn StreamSession) {
        self.hooks.on_can_write(&mut self.core, session);
    }

    pub fn close(&mut self, session: &mut dyn StreamSession, error: QuicRstStreamErrorCode) {
        self.core.close(session, error);
    }

    pub fn terminate_from_peer(&mut self, session: &mut dyn StreamSession, half_close: bool) {
        self.hooks
            .terminate_from_peer(&mut self.core, session, half_close);
    }

    pub fn on_stream_reset(&mut self, session: &mut dyn StreamSession, error: QuicRstStreamErrorCode) {
        debug!("stream {} reset by peer: {}", self.core.id, error);
        self.core.stream_error = error;
        self.terminate_from_peer(session, false);
    }

    /// Connection is closed, no-op for an already closed stream.
    pub fn connection_close(
        &mut self,
        session: &mut dyn StreamSession,
        error: QuicErrorCode,
        from_peer: bool,
    ) {
        if self.core.state.is_fully_closed() {
            return;
        }
        if error != QuicErrorCode::NoError {
            self.core.stream_error = QuicRstStreamErrorCode::StreamConnectionError;
            self.core.connection_error = error;
        }
        if from_peer {
            self.terminate_from_peer(session, false);
        } else {
            self.core.close_write_side(session);
            self.core.close_read_side(session);
        }
    }

    pub(crate) fn on_close(&mut self) {
        self.core.on_close();
        self.hooks.on_close(&self.core);
    }
}

impl<H: StreamHooks> Drop for ReliableStream<H> {
    fn drop(&mut self) {
        self.hooks.on_drop(&self.core);
    }
}

impl<H: StreamHooks + 'static> SessionStream for ReliableStream<H> {
    fn id(&self) -> StreamId {
        self.core.id
    }

    fn will_accept_stream_frame(&self, frame: &StreamFrame) -> bool {
        ReliableStream::will_accept_stream_frame(self, frame)
    }

    fn on_stream_frame(&mut self, session: &mut dyn StreamSession, frame: &StreamFrame) -> bool {
        ReliableStream::on_stream_frame(self, session, frame)
    }

    fn on_stream_reset(&mut self, session: &mut dyn StreamSession, error: QuicRstStreamErrorCode) {
        ReliableStream::on_stream_reset(self, session, error)
    }

    fn connection_close(
        &mut self,
        session: &mut dyn StreamSession,
        error: QuicErrorCode,
        from_peer: bool,
    ) {
        ReliableStream::connection_close(self, session, error, from_peer)
    }

    fn on_can_write(&mut self, session: &mut dyn StreamSession) {
        ReliableStream::on_can_write(self, session)
    }

    fn on_decompressor_available(&mut self, session: &mut dyn StreamSession) {
        ReliableStream::on_decompressor_available(self, session)
    }

    fn effective_priority(&self) -> QuicPriority {
        ReliableStream::effective_priority(self)
    }

    fn is_fully_closed(&self) -> bool {
        self.core.state.is_fully_closed()
    }

    fn on_close(&mut self) {
        ReliableStream::on_close(self)
    }

    fn as_any(&self) -> &dyn Any {
        self
    }

    fn as_any_mut(&mut self) -> &mut dyn Any {
        self
    }
}
