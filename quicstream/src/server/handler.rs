use crate::message::SimpleHttpMessage;

/// Server request callback.
///
/// Called once per stream with the complete request. An error is answered
/// with `500`.
pub trait SpdyRequestHandler: 'static {
    fn handle_request(&self, request: &SimpleHttpMessage) -> crate::Result<SimpleHttpMessage>;
}

impl<F> SpdyRequestHandler for F
where
    F: Fn(&SimpleHttpMessage) -> crate::Result<SimpleHttpMessage> + 'static,
{
    fn handle_request(&self, request: &SimpleHttpMessage) -> crate::Result<SimpleHttpMessage> {
        self(request)
    }
}
