/// Stream configuration.
#[derive(Default, Debug, Clone)]
pub struct StreamConf {
    /// How far ahead of the decompressor a received header id may be.
    pub max_header_id_delta: Option<u32>,
    /// Max bytes the sequencer buffers ahead of the read position.
    /// Unlimited by default.
    pub max_frame_memory: Option<usize>,
}

impl StreamConf {
    pub const DEFAULT_MAX_HEADER_ID_DELTA: u32 = 100;

    pub fn new() -> StreamConf {
        Default::default()
    }

    pub fn max_header_id_delta(&self) -> u32 {
        self.max_header_id_delta
            .unwrap_or(StreamConf::DEFAULT_MAX_HEADER_ID_DELTA)
    }

    pub fn max_frame_memory(&self) -> usize {
        self.max_frame_memory.unwrap_or(usize::MAX)
    }
}

/// Session configuration.
#[derive(Default, Debug, Clone)]
pub struct SessionConf {
    /// Max number of open streams, peer streams beyond it close the connection.
    pub max_open_streams: Option<usize>,

    /// Configuration of every stream of the session.
    pub stream: StreamConf,
}

impl SessionConf {
    pub const DEFAULT_MAX_OPEN_STREAMS: usize = 100;

    pub fn new() -> SessionConf {
        Default::default()
    }

    pub fn max_open_streams(&self) -> usize {
        self.max_open_streams
            .unwrap_or(SessionConf::DEFAULT_MAX_OPEN_STREAMS)
    }
}
