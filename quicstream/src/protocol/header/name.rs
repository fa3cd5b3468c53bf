use crate::protocol::header::{HeaderError, HeaderResult};
use crate::req_resp::RequestOrResponse;
use bytes::Bytes;
use std::fmt;
use std::str;

/// SPDY/3 pseudo headers.
#[derive(Debug, PartialEq, Eq, Copy, Clone, Hash)]
pub enum PseudoHeaderName {
    // Request
    Method = 0,
    Path = 1,
    Version = 2,
    Scheme = 3,
    Host = 4,

    // Response, `:version` is shared
    Status = 5,
}

impl PseudoHeaderName {
    pub fn name(&self) -> &'static str {
        match *self {
            PseudoHeaderName::Method => ":method",
            PseudoHeaderName::Path => ":path",
            PseudoHeaderName::Version => ":version",
            PseudoHeaderName::Scheme => ":scheme",
            PseudoHeaderName::Host => ":host",
            PseudoHeaderName::Status => ":status",
        }
    }

    pub fn parse(value: &[u8]) -> HeaderResult<PseudoHeaderName> {
        match value {
            b":method" => Ok(PseudoHeaderName::Method),
            b":path" => Ok(PseudoHeaderName::Path),
            b":version" => Ok(PseudoHeaderName::Version),
            b":scheme" => Ok(PseudoHeaderName::Scheme),
            b":host" => Ok(PseudoHeaderName::Host),
            b":status" => Ok(PseudoHeaderName::Status),
            _ => Err(HeaderError::UnknownPseudoHeader),
        }
    }

    /// Whether this pseudo header may appear in the given kind of message.
    pub fn allowed_in(&self, req_or_resp: RequestOrResponse) -> bool {
        match *self {
            PseudoHeaderName::Version => true,
            PseudoHeaderName::Status => req_or_resp == RequestOrResponse::Response,
            _ => req_or_resp == RequestOrResponse::Request,
        }
    }

    /// Pseudo headers a message must carry.
    pub fn required(req_or_resp: RequestOrResponse) -> &'static [PseudoHeaderName] {
        static REQUEST_HEADERS: &[PseudoHeaderName] =
            &[PseudoHeaderName::Method, PseudoHeaderName::Path];
        static RESPONSE_HEADERS: &[PseudoHeaderName] = &[PseudoHeaderName::Status];
        match req_or_resp {
            RequestOrResponse::Request => REQUEST_HEADERS,
            RequestOrResponse::Response => RESPONSE_HEADERS,
        }
    }
}

impl fmt::Display for PseudoHeaderName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(self.name(), f)
    }
}

#[derive(Default)]
pub(crate) struct PseudoHeaderNameSet {
    headers_mask: u32,
}

impl PseudoHeaderNameSet {
    pub fn new() -> PseudoHeaderNameSet {
        Default::default()
    }

    pub fn insert(&mut self, value: PseudoHeaderName) -> bool {
        let contains = self.contains(value);
        self.headers_mask |= 1 << (value as u32);
        !contains
    }

    pub fn contains(&self, value: PseudoHeaderName) -> bool {
        self.headers_mask & (1 << (value as u32)) != 0
    }
}

fn validate_regular_name(bs: &[u8]) -> HeaderResult<()> {
    for &b in bs {
        if !b.is_ascii() {
            return Err(HeaderError::HeaderNameNotAscii);
        }
        if b.is_ascii_control() || b.is_ascii_uppercase() {
            return Err(HeaderError::IncorrectCharInName);
        }
        if b"()<>@,;:\\\"/[]?={} \t".contains(&b) {
            return Err(HeaderError::IncorrectCharInName);
        }
    }
    // SPDY/3 forbids hop-by-hop headers.
    for s in &[
        "connection",
        "keep-alive",
        "proxy-connection",
        "transfer-encoding",
    ] {
        if bs == s.as_bytes() {
            return Err(HeaderError::ConnectionSpecificHeader(s));
        }
    }
    Ok(())
}

#[derive(Eq, PartialEq, Hash, Clone)]
enum HeaderNameEnum {
    Pseudo(PseudoHeaderName),
    Regular(String),
}

/// Header name, guaranteed to be valid.
///
/// # Examples
///
/// ```
/// # use quicstream::*;
/// assert_eq!("content-type", HeaderName::new("Content-Type").name());
/// assert_eq!(":status", HeaderName::pseudo(PseudoHeaderName::Status).name());
/// ```
#[derive(Eq, PartialEq, Hash, Clone)]
pub struct HeaderName(HeaderNameEnum);

impl From<PseudoHeaderName> for HeaderName {
    fn from(p: PseudoHeaderName) -> Self {
        HeaderName::pseudo(p)
    }
}

impl<'a> From<&'a str> for HeaderName {
    fn from(s: &'a str) -> Self {
        HeaderName::new(Bytes::copy_from_slice(s.as_bytes()))
    }
}

impl From<String> for HeaderName {
    fn from(s: String) -> Self {
        HeaderName::new(s)
    }
}

impl From<Bytes> for HeaderName {
    fn from(s: Bytes) -> Self {
        HeaderName::new(s)
    }
}

impl HeaderName {
    pub fn pseudo(name: PseudoHeaderName) -> HeaderName {
        HeaderName(HeaderNameEnum::Pseudo(name))
    }

    /// Construct a header name, converting it to lower case.
    ///
    /// # Panics
    ///
    /// Panics on incorrect header name.
    ///
    /// ```should_panic
    /// # use quicstream::*;
    /// HeaderName::new("");
    /// ```
    pub fn new(name: impl Into<Bytes>) -> HeaderName {
        let name = name.into();
        let name = if name.iter().any(|c| c.is_ascii_uppercase()) {
            Bytes::from(name.to_ascii_lowercase())
        } else {
            name
        };
        match HeaderName::new_validate(name) {
            Ok(h) => h,
            Err((e, name)) => panic!("incorrect header name: {:?}: {:?}", name, e),
        }
    }

    /// Construct a header name from bytes received from the peer.
    ///
    /// Upper case names are rejected.
    ///
    /// ```
    /// # use quicstream::*;
    /// # use bytes::*;
    /// assert!(HeaderName::new_validate(Bytes::from(":method")).is_ok());
    /// assert!(HeaderName::new_validate(Bytes::from("Content-Type")).is_err());
    /// ```
    pub fn new_validate(name: Bytes) -> Result<HeaderName, (HeaderError, Bytes)> {
        if name.is_empty() {
            return Err((HeaderError::EmptyName, name));
        }

        if name[0] == b':' {
            return match PseudoHeaderName::parse(&name) {
                Ok(p) => Ok(HeaderName::pseudo(p)),
                Err(e) => Err((e, name)),
            };
        }

        if let Err(e) = validate_regular_name(&name) {
            return Err((e, name));
        }
        match str::from_utf8(&name) {
            Ok(s) => Ok(HeaderName(HeaderNameEnum::Regular(s.to_owned()))),
            Err(_) => Err((HeaderError::HeaderNameNotAscii, name)),
        }
    }

    pub fn name(&self) -> &str {
        match &self.0 {
            HeaderNameEnum::Pseudo(p) => p.name(),
            HeaderNameEnum::Regular(r) => r,
        }
    }

    pub fn is_pseudo(&self) -> bool {
        self.pseudo_header_name().is_some()
    }

    pub fn pseudo_header_name(&self) -> Option<PseudoHeaderName> {
        match self.0 {
            HeaderNameEnum::Pseudo(p) => Some(p),
            HeaderNameEnum::Regular(_) => None,
        }
    }
}

impl fmt::Debug for HeaderName {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "HeaderName({:?})", self.name())
    }
}

impl fmt::Display for HeaderName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}
