//! Half-close state of a stream.

/// One direction of a bidirectional stream.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum StreamSide {
    /// Data from the peer.
    Read,
    /// Data to the peer.
    Write,
}

/// The states a stream can be in.
///
/// ```ignore
///                    +--------+
///         close read |        | close write
///           ,--------|  open  |--------.
///          /         |        |         \
///         v          +--------+          v
///   +------------+       |        +-------------+
///   |    read    |       | reset, |    write    |
///   |half closed |       | close  | half closed |
///   +------------+       |        +-------------+
///          |             v               |
///          | close  +--------+   close   |
///          | write  |  fully |   read    |
///          `------->| closed |<----------'
///                   +--------+
/// ```
///
/// There are no transitions out of `FullyClosed`.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum StreamState {
    /// Both sides open.
    Open,
    /// Peer is done sending, we may still write.
    ReadHalfClosed,
    /// We are done sending, peer may still write.
    WriteHalfClosed,
    /// Both sides closed.
    FullyClosed,
}

impl Default for StreamState {
    fn default() -> Self {
        StreamState::Open
    }
}

impl StreamState {
    /// Returns whether the stream is fully closed.
    pub fn is_fully_closed(&self) -> bool {
        *self == StreamState::FullyClosed
    }

    /// Returns whether nothing will be read from this stream anymore.
    pub fn is_read_closed(&self) -> bool {
        match *self {
            StreamState::ReadHalfClosed | StreamState::FullyClosed => true,
            _ => false,
        }
    }

    /// Returns whether nothing will be written to this stream anymore.
    pub fn is_write_closed(&self) -> bool {
        match *self {
            StreamState::WriteHalfClosed | StreamState::FullyClosed => true,
            _ => false,
        }
    }

    pub fn is_closed(&self, side: StreamSide) -> bool {
        match side {
            StreamSide::Read => self.is_read_closed(),
            StreamSide::Write => self.is_write_closed(),
        }
    }

    /// State after closing given side.
    pub fn close(self, side: StreamSide) -> StreamState {
        match (self, side) {
            (StreamState::FullyClosed, _) => StreamState::FullyClosed,
            (StreamState::Open, StreamSide::Read) => StreamState::ReadHalfClosed,
            (StreamState::Open, StreamSide::Write) => StreamState::WriteHalfClosed,
            (StreamState::ReadHalfClosed, StreamSide::Read) => StreamState::ReadHalfClosed,
            (StreamState::WriteHalfClosed, StreamSide::Write) => StreamState::WriteHalfClosed,
            (StreamState::ReadHalfClosed, StreamSide::Write)
            | (StreamState::WriteHalfClosed, StreamSide::Read) => StreamState::FullyClosed,
        }
    }
}
