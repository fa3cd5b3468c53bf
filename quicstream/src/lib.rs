#![deny(broken_intra_doc_links)]

//! Reliable stream layer of gQUIC.
//!
//! Streams reassemble frames, strip the priority and header id prefix,
//! decompress header blocks in connection-wide order, buffer writes the
//! transport does not take and half-close each direction independently.
//! The [`Session`] owns the streams of one connection and schedules
//! blocked writers by priority.
//!
//! Everything is sans-io: the transport is a [`QuicConnection`] and every
//! event is a method call.

#[macro_use]
extern crate log;

pub use crate::client::delegate::ClientStreamDelegate;
pub use crate::client::spdy::SpdyClientHooks;
pub use crate::client::spdy::SpdyClientStream;
pub use crate::client::stream::ClientHooks;
pub use crate::client::stream::ClientStream;
pub use crate::client::stream::WriteCompletion;
pub use crate::client::stream::WriteStatus;
pub use crate::codec::framed::FramedCompressor;
pub use crate::codec::framed::FramedDecompressor;
pub use crate::codec::DecompressorVisitor;
pub use crate::codec::HeaderCompressor;
pub use crate::codec::HeaderDecompressor;
pub use crate::common::conf::SessionConf;
pub use crate::common::conf::StreamConf;
pub use crate::common::sequencer::StreamSequencer;
pub use crate::common::stream::ReliableStream;
pub use crate::common::stream::StreamCore;
pub use crate::common::stream::StreamHooks;
pub use crate::common::stream::WriteOrBufferResult;
pub use crate::common::write_blocked_list::WriteBlockedList;
pub use crate::error::Error;
pub use crate::message::SimpleHttpMessage;
pub use crate::protocol::error_code::QuicErrorCode;
pub use crate::protocol::error_code::QuicRstStreamErrorCode;
pub use crate::protocol::frame::StreamFrame;
pub use crate::protocol::header::Header;
pub use crate::protocol::header::HeaderError;
pub use crate::protocol::header::HeaderName;
pub use crate::protocol::header::HeaderValue;
pub use crate::protocol::header::Headers;
pub use crate::protocol::header::PseudoHeaderName;
pub use crate::protocol::header_block::parse_header_block;
pub use crate::protocol::header_block::serialize_header_block;
pub use crate::protocol::state::StreamSide;
pub use crate::protocol::state::StreamState;
pub use crate::protocol::ConsumedData;
pub use crate::protocol::HeaderId;
pub use crate::protocol::QuicPriority;
pub use crate::protocol::QuicVersion;
pub use crate::protocol::StreamId;
pub use crate::protocol::StreamOffset;
pub use crate::protocol::CRYPTO_STREAM_ID;
pub use crate::protocol::DEFAULT_PRIORITY;
pub use crate::protocol::HIGHEST_PRIORITY;
pub use crate::protocol::LOWEST_PRIORITY;
pub use crate::protocol::QUIC_VERSION_8;
pub use crate::protocol::QUIC_VERSION_9;
pub use crate::result::Result;
pub use crate::server::handler::SpdyRequestHandler;
pub use crate::server::spdy::SpdyServerHooks;
pub use crate::server::spdy::SpdyServerStream;
pub use crate::session::intf::QuicConnection;
pub use crate::session::intf::SessionStream;
pub use crate::session::intf::StreamSession;
pub use crate::session::IncomingStreamFactory;
pub use crate::session::Session;
pub use crate::session::SessionCore;

mod protocol;

mod error;
mod result;

mod client;
mod codec;
mod server;

mod common;
mod session;

mod message;
mod req_resp;

mod assert_types;

mod misc;

/// Test doubles
#[doc(hidden)]
pub mod for_test;
