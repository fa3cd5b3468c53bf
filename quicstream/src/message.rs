use bytes::Bytes;

use crate::protocol::header::Headers;

/// Simple HTTP message is headers and body.
#[derive(Default, Debug, Clone, PartialEq, Eq)]
pub struct SimpleHttpMessage {
    pub headers: Headers,
    pub body: Bytes,
}

impl SimpleHttpMessage {
    /// New empty.
    pub fn new() -> SimpleHttpMessage {
        Default::default()
    }

    /// Multiline string
    pub fn dump(&self) -> String {
        format!(
            "{}\n{}",
            self.headers.dump(),
            String::from_utf8_lossy(&self.body)
        )
    }

    /// Create 404 message.
    pub fn not_found_404(message: &str) -> SimpleHttpMessage {
        SimpleHttpMessage {
            headers: Headers::not_found_404(),
            body: Bytes::copy_from_slice(message.as_bytes()),
        }
    }

    /// Create 500 message.
    pub fn internal_error_500(message: &str) -> SimpleHttpMessage {
        SimpleHttpMessage {
            headers: Headers::internal_error_500(),
            body: Bytes::copy_from_slice(message.as_bytes()),
        }
    }

    /// Create 200 message.
    pub fn found_200_plain_text(body: &str) -> SimpleHttpMessage {
        SimpleHttpMessage {
            headers: Headers::ok_200(),
            body: Bytes::copy_from_slice(body.as_bytes()),
        }
    }
}
