#[macro_use]
extern crate log;

use std::sync::Once;

use quicstream::for_test::ScriptedConnection;
use quicstream::Session;
use quicstream::SessionConf;

pub fn init_logger() {
    static ONCE: Once = Once::new();
    ONCE.call_once(|| {
        log_ndc_env_logger::init();
    });
}

pub fn client_session() -> Session<ScriptedConnection> {
    Session::new(ScriptedConnection::new(), SessionConf::new())
}

pub fn server_session(conf: SessionConf) -> Session<ScriptedConnection> {
    Session::new(ScriptedConnection::new_server(), conf)
}

/// Deliver everything `from` wrote to `to`.
///
/// Returns number of frames delivered.
pub fn pipe(from: &mut Session<ScriptedConnection>, to: &mut Session<ScriptedConnection>) -> usize {
    let frames = from.connection_mut().take_frames();
    debug!("pipe {} frames", frames.len());
    if !frames.is_empty() {
        to.on_stream_frames(&frames);
    }
    frames.len()
}
