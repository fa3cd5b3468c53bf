//! Code shared by client and server streams

pub(crate) mod closed_streams;
pub(crate) mod conf;
pub(crate) mod sequencer;
pub(crate) mod stream;
pub(crate) mod write_blocked_list;
