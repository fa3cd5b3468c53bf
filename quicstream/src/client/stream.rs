use bytes::Bytes;

use crate::client::delegate::ClientStreamDelegate;
use crate::common::conf::StreamConf;
use crate::common::stream::ReliableStream;
use crate::common::stream::StreamCore;
use crate::common::stream::StreamHooks;
use crate::misc::BsDebug;
use crate::protocol::error_code::QuicRstStreamErrorCode;
use crate::protocol::QuicPriority;
use crate::protocol::StreamId;
use crate::protocol::HIGHEST_PRIORITY;
use crate::session::intf::StreamSession;
use crate::Error;

/// What to notify when buffered data is written.
pub enum WriteCompletion {
    /// `on_send_data_complete` of the delegate, then `on_send_data` unless
    /// the delegate reports eof.
    Delegate,
    /// One-shot callback.
    Callback(Box<dyn FnOnce(crate::Result<()>)>),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WriteStatus {
    /// Everything went to the transport.
    Done,
    /// Data is buffered, the completion fires once it is written.
    Pending,
}

/// Client stream behaviour: data goes to a delegate.
#[derive(Default)]
pub struct ClientHooks {
    delegate: Option<Box<dyn ClientStreamDelegate>>,
    completion: Option<WriteCompletion>,
}

impl ClientHooks {
    pub fn new() -> ClientHooks {
        Default::default()
    }

    pub fn has_delegate(&self) -> bool {
        self.delegate.is_some()
    }

    /// Panics if a delegate is already attached.
    pub fn set_delegate(&mut self, delegate: Box<dyn ClientStreamDelegate>) {
        assert!(self.delegate.is_none(), "delegate already attached");
        self.delegate = Some(delegate);
    }

    pub fn take_delegate(&mut self) -> Option<Box<dyn ClientStreamDelegate>> {
        self.delegate.take()
    }

    pub fn has_pending_completion(&self) -> bool {
        self.completion.is_some()
    }

    fn set_completion(&mut self, completion: WriteCompletion) {
        debug_assert!(self.completion.is_none(), "write completion already pending");
        self.completion = Some(completion);
    }

    /// Terminal callback, the delegate is dropped after it.
    pub(crate) fn notify_close(&mut self, core: &StreamCore) {
        if let Some(mut delegate) = self.delegate.take() {
            delegate.on_close(core.connection_error());
        }
    }

    /// Terminal callback, the delegate is dropped after it.
    pub(crate) fn notify_error(&mut self, error: Error) {
        if let Some(mut delegate) = self.delegate.take() {
            delegate.on_error(error);
        }
    }

    fn complete_write(
        &mut self,
        core: &mut StreamCore,
        session: &mut dyn StreamSession,
        completion: WriteCompletion,
    ) {
        let delegate = match completion {
            WriteCompletion::Callback(callback) => return callback(Ok(())),
            WriteCompletion::Delegate => match self.delegate.as_mut() {
                Some(delegate) => delegate,
                None => return,
            },
        };

        let mut eof = false;
        let r = match delegate.on_send_data_complete(Ok(()), &mut eof) {
            Ok(()) if !eof => delegate.on_send_data(),
            r => r,
        };
        if let Err(e) = r {
            warn!("stream {} delegate failed to send: {}", core.id(), e);
            core.close(session, e.rst_stream_error_code());
            self.notify_error(e);
        }
    }

    /// Drain buffered data and fire the pending completion once the buffer
    /// is empty.
    pub(crate) fn drain(
        &mut self,
        core: &mut StreamCore,
        session: &mut dyn StreamSession,
        priority: QuicPriority,
    ) {
        core.on_can_write(session, priority);
        if !core.has_buffered_data() {
            if let Some(completion) = self.completion.take() {
                self.complete_write(core, session, completion);
            }
        }
    }
}

impl StreamHooks for ClientHooks {
    fn process_data(
        &mut self,
        core: &mut StreamCore,
        session: &mut dyn StreamSession,
        data: &[u8],
    ) -> crate::Result<usize> {
        let delegate = match self.delegate.as_mut() {
            Some(delegate) => delegate,
            None => return Err(Error::Aborted),
        };
        match delegate.on_data_received(data) {
            Ok(()) => Ok(data.len()),
            Err(e) => {
                warn!(
                    "stream {} delegate refused {:?}: {}",
                    core.id(),
                    BsDebug(data),
                    e
                );
                core.close(session, QuicRstStreamErrorCode::BadApplicationPayload);
                Ok(0)
            }
        }
    }

    fn terminate_from_peer(
        &mut self,
        core: &mut StreamCore,
        session: &mut dyn StreamSession,
        half_close: bool,
    ) {
        self.notify_close(core);
        core.terminate_from_peer(session, half_close);
    }

    fn effective_priority(&self, core: &StreamCore) -> QuicPriority {
        match &self.delegate {
            Some(delegate) if delegate.has_send_headers_complete() => core.priority(),
            _ => HIGHEST_PRIORITY,
        }
    }

    fn on_can_write(&mut self, core: &mut StreamCore, session: &mut dyn StreamSession) {
        let priority = self.effective_priority(core);
        self.drain(core, session, priority);
    }

    fn on_drop(&mut self, core: &StreamCore) {
        self.notify_close(core);
    }
}

/// Client initiated stream with a delegate.
pub type ClientStream = ReliableStream<ClientHooks>;

impl ReliableStream<ClientHooks> {
    pub fn new(id: StreamId, conf: &StreamConf) -> ClientStream {
        ReliableStream::with_hooks(id, conf, ClientHooks::new())
    }

    /// Panics if a delegate is already attached.
    pub fn set_delegate(&mut self, delegate: Box<dyn ClientStreamDelegate>) {
        self.hooks_mut().set_delegate(delegate);
    }

    pub fn take_delegate(&mut self) -> Option<Box<dyn ClientStreamDelegate>> {
        self.hooks_mut().take_delegate()
    }

    pub fn has_delegate(&self) -> bool {
        self.hooks().has_delegate()
    }

    /// Write data. Must not be called while previous data is buffered.
    pub fn write_stream_data(
        &mut self,
        session: &mut dyn StreamSession,
        data: impl Into<Bytes>,
        fin: bool,
        completion: WriteCompletion,
    ) -> crate::Result<WriteStatus> {
        if self.core().write_side_closed() {
            return Err(Error::WriteSideClosed);
        }
        debug_assert!(!self.core().has_buffered_data());

        self.write_or_buffer(session, data, fin);
        if !self.core().has_buffered_data() {
            return Ok(WriteStatus::Done);
        }
        self.hooks_mut().set_completion(completion);
        Ok(WriteStatus::Pending)
    }

    /// Whether the connection takes writes now. If not, the stream is
    /// marked write blocked and `completion` fires when it unblocks.
    pub fn can_write(&mut self, session: &mut dyn StreamSession, completion: WriteCompletion) -> bool {
        let can_write = session.connection().can_write();
        if !can_write {
            let priority = self.effective_priority();
            session.mark_write_blocked(self.id(), priority);
            self.hooks_mut().set_completion(completion);
        }
        can_write
    }

    /// Pass an error to the delegate and detach it.
    pub fn on_error(&mut self, error: Error) {
        self.hooks_mut().notify_error(error);
    }
}

#[cfg(test)]
mod test {
    use std::cell::Cell;
    use std::rc::Rc;

    use super::*;
    use crate::codec::framed::FramedCompressor;
    use crate::codec::HeaderCompressor;
    use crate::for_test::DelegateEvent;
    use crate::for_test::RecordingDelegate;
    use crate::for_test::RecordingSession;
    use crate::protocol::error_code::QuicErrorCode;
    use crate::protocol::frame::StreamFrame;
    use crate::protocol::header::Headers;
    use crate::protocol::header_block::serialize_header_block;

    fn response_bytes(body: &[u8]) -> Vec<u8> {
        let mut data = FramedCompressor::new()
            .compress_headers(&Headers::ok_200())
            .to_vec();
        data.extend_from_slice(body);
        data
    }

    fn frame(data: &[u8], fin: bool) -> StreamFrame {
        StreamFrame::new(3, fin, 0, Bytes::copy_from_slice(data))
    }

    #[test]
    fn no_delegate_discards_data() {
        let mut session = RecordingSession::new();
        let mut stream = ClientStream::new(3, &StreamConf::new());
        stream.on_stream_frame(&mut session, &frame(&response_bytes(b"body"), false));
        assert!(stream.core().headers_decompressed());
        assert!(!stream.core().sequencer().has_bytes_to_read());
        assert!(session.rst_streams.is_empty());
        assert!(!stream.core().read_side_closed());
    }

    #[test]
    fn delegate_receives_headers_then_body() {
        let mut session = RecordingSession::new();
        let (delegate, log) = RecordingDelegate::new();
        let mut stream = ClientStream::new(3, &StreamConf::new());
        stream.set_delegate(Box::new(delegate));
        stream.on_stream_frame(&mut session, &frame(&response_bytes(b"body"), true));

        let log = log.borrow();
        assert_eq!(
            vec![
                DelegateEvent::DataReceived(serialize_header_block(&Headers::ok_200()).to_vec()),
                DelegateEvent::DataReceived(b"body".to_vec()),
                DelegateEvent::Close(QuicErrorCode::NoError),
            ],
            log.events
        );
        assert!(!stream.has_delegate());
        assert!(stream.core().read_side_closed());
    }

    #[test]
    fn delegate_refusal_resets() {
        let mut session = RecordingSession::new();
        let (delegate, log) = RecordingDelegate::new();
        log.borrow_mut().refuse_data = true;
        let mut stream = ClientStream::new(3, &StreamConf::new());
        stream.set_delegate(Box::new(delegate));
        stream.on_stream_frame(&mut session, &frame(&response_bytes(b"body"), false));
        assert_eq!(
            vec![(3, QuicRstStreamErrorCode::BadApplicationPayload)],
            session.rst_streams
        );
        assert!(stream.core().state().is_fully_closed());
    }

    #[test]
    fn headers_first_priority() {
        let (delegate, log) = RecordingDelegate::new();
        let mut stream = ClientStream::new(3, &StreamConf::new());
        stream.core_mut().set_priority(5);
        assert_eq!(HIGHEST_PRIORITY, stream.effective_priority());
        stream.set_delegate(Box::new(delegate));
        assert_eq!(HIGHEST_PRIORITY, stream.effective_priority());
        log.borrow_mut().headers_complete = true;
        assert_eq!(5, stream.effective_priority());

        // Detached delegate can no longer report headers complete
        drop(stream.take_delegate());
        assert_eq!(HIGHEST_PRIORITY, stream.effective_priority());
    }

    #[test]
    #[should_panic]
    fn second_delegate() {
        let mut stream = ClientStream::new(3, &StreamConf::new());
        stream.set_delegate(Box::new(RecordingDelegate::new().0));
        stream.set_delegate(Box::new(RecordingDelegate::new().0));
    }

    #[test]
    fn drop_notifies_delegate_once() {
        let mut session = RecordingSession::new();
        let (delegate, log) = RecordingDelegate::new();
        {
            let mut stream = ClientStream::new(3, &StreamConf::new());
            stream.set_delegate(Box::new(delegate));
            stream.connection_close(&mut session, QuicErrorCode::ConnectionTimedOut, false);
        }
        assert_eq!(
            vec![DelegateEvent::Close(QuicErrorCode::ConnectionTimedOut)],
            log.borrow().events
        );
    }

    #[test]
    fn on_error_detaches() {
        let (delegate, log) = RecordingDelegate::new();
        let mut stream = ClientStream::new(3, &StreamConf::new());
        stream.set_delegate(Box::new(delegate));
        stream.on_error(Error::User("gone".to_owned()));
        drop(stream);
        assert_eq!(
            vec![DelegateEvent::Error(Error::User("gone".to_owned()))],
            log.borrow().events
        );
    }

    #[test]
    fn pending_write_completes_once() {
        let mut session = RecordingSession::new();
        let mut stream = ClientStream::new(3, &StreamConf::new());
        let fired = Rc::new(Cell::new(0));

        session.connection.write_budget = Some(2);
        let fired_copy = fired.clone();
        let status = stream
            .write_stream_data(
                &mut session,
                &b"hello"[..],
                false,
                WriteCompletion::Callback(Box::new(move |r| {
                    assert!(r.is_ok());
                    fired_copy.set(fired_copy.get() + 1);
                })),
            )
            .unwrap();
        assert_eq!(WriteStatus::Pending, status);

        session.connection.write_budget = Some(1);
        stream.on_can_write(&mut session);
        assert_eq!(0, fired.get());

        session.connection.write_budget = None;
        stream.on_can_write(&mut session);
        assert_eq!(1, fired.get());
        stream.on_can_write(&mut session);
        assert_eq!(1, fired.get());
        assert_eq!(5, stream.core().bytes_written());
    }

    #[test]
    fn write_done_immediately() {
        let mut session = RecordingSession::new();
        let mut stream = ClientStream::new(3, &StreamConf::new());
        let status = stream
            .write_stream_data(&mut session, &b"hello"[..], true, WriteCompletion::Delegate)
            .unwrap();
        assert_eq!(WriteStatus::Done, status);
        assert!(!stream.hooks().has_pending_completion());
        assert_eq!(
            Err(Error::WriteSideClosed),
            stream.write_stream_data(&mut session, &b"x"[..], false, WriteCompletion::Delegate)
        );
    }

    #[test]
    fn can_write_blocked_notifies_delegate() {
        let mut session = RecordingSession::new();
        session.connection.can_write = false;
        let (delegate, log) = RecordingDelegate::new();
        let mut stream = ClientStream::new(3, &StreamConf::new());
        stream.set_delegate(Box::new(delegate));

        assert!(!stream.can_write(&mut session, WriteCompletion::Delegate));
        assert_eq!(vec![(3, HIGHEST_PRIORITY)], session.write_blocked);

        stream.on_can_write(&mut session);
        assert_eq!(
            vec![DelegateEvent::SendDataComplete, DelegateEvent::SendData],
            log.borrow().events
        );
    }

    #[test]
    fn delegate_eof_stops_send_data() {
        let mut session = RecordingSession::new();
        session.connection.can_write = false;
        let (delegate, log) = RecordingDelegate::new();
        log.borrow_mut().eof = true;
        let mut stream = ClientStream::new(3, &StreamConf::new());
        stream.set_delegate(Box::new(delegate));

        stream.can_write(&mut session, WriteCompletion::Delegate);
        stream.on_can_write(&mut session);
        assert_eq!(vec![DelegateEvent::SendDataComplete], log.borrow().events);
    }
}
