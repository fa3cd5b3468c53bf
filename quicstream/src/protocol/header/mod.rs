use std::fmt;
use std::iter::FromIterator;
use std::result;
use std::str;
use std::str::FromStr;

use bytes::Bytes;

use crate::assert_types::*;
use crate::req_resp::RequestOrResponse;

pub(crate) mod name;
pub(crate) mod value;

pub use self::name::HeaderName;
pub use self::name::PseudoHeaderName;
use self::name::PseudoHeaderNameSet;
pub use self::value::HeaderValue;

/// SPDY header, regular or pseudo-header
#[derive(PartialEq, Eq, Hash, Clone)]
pub struct Header {
    name: HeaderName,
    pub value: HeaderValue,
}

impl fmt::Debug for Header {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Header")
            .field("name", &self.name.name())
            .field("value", &self.value)
            .finish()
    }
}

fn _assert_header_sync_send() {
    assert_sync::<Header>();
    assert_send::<Header>();
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum HeaderError {
    #[error("unknown pseudo header")]
    UnknownPseudoHeader,
    #[error("empty header name")]
    EmptyName,
    #[error("empty value of {0}")]
    EmptyValue(PseudoHeaderName),
    #[error("incorrect char in header name")]
    IncorrectCharInName,
    #[error("header name is not ASCII")]
    HeaderNameNotAscii,
    #[error("unexpected pseudo header {0}")]
    UnexpectedPseudoHeader(PseudoHeaderName),
    #[error("pseudo headers after regular headers")]
    PseudoHeadersAfterRegularHeaders,
    #[error("more than one {0}")]
    MoreThanOnePseudoHeader(PseudoHeaderName),
    #[error("missing {0}")]
    MissingPseudoHeader(PseudoHeaderName),
    #[error("connection specific header {0}")]
    ConnectionSpecificHeader(&'static str),
}

pub type HeaderResult<T> = result::Result<T, HeaderError>;

impl Header {
    /// Create a header from exact name and value, validating the name.
    pub fn new_validate(name: Bytes, value: Bytes) -> HeaderResult<Header> {
        let name = HeaderName::new_validate(name).map_err(|(e, _)| e)?;
        Ok(Header {
            name,
            value: HeaderValue::from(value),
        })
    }

    /// Header name is converted to lower case.
    /// This function panics if header name is not valid.
    pub fn new<N: Into<HeaderName>, V: Into<HeaderValue>>(name: N, value: V) -> Header {
        Header {
            name: name.into(),
            value: value.into(),
        }
    }

    fn pseudo(name: PseudoHeaderName, value: impl Into<HeaderValue>) -> Header {
        Header::new(name, value.into())
    }

    pub fn name(&self) -> &str {
        self.name.name()
    }

    pub fn value(&self) -> &[u8] {
        self.value.as_slice()
    }

    /// name: value
    pub fn format(&self) -> String {
        format!(
            "{}: {}",
            self.name(),
            String::from_utf8_lossy(self.value.as_slice())
        )
    }

    pub fn is_pseudo_header(&self) -> bool {
        self.name.is_pseudo()
    }

    pub fn pseudo_header_name(&self) -> Option<PseudoHeaderName> {
        self.name.pseudo_header_name()
    }
}

impl<N: Into<HeaderName>, V: Into<HeaderValue>> From<(N, V)> for Header {
    fn from(p: (N, V)) -> Header {
        Header::new(p.0, p.1)
    }
}

/// Message headers
#[derive(Default, Debug, PartialEq, Eq, Clone)]
pub struct Headers {
    // Pseudo-headers stored before regular headers
    headers: Vec<Header>,
    pseudo_count: usize,
}

impl Headers {
    pub fn new() -> Headers {
        Default::default()
    }

    /// Construct headers from a vec of individual headers
    pub fn from_vec(mut headers: Vec<Header>) -> Headers {
        headers.sort_by_key(|h| !h.is_pseudo_header());
        let pseudo_count = headers.iter().take_while(|h| h.is_pseudo_header()).count();
        Headers {
            headers,
            pseudo_count,
        }
    }

    /// Headers as they came from the wire: pseudo headers must come first.
    pub(crate) fn from_vec_pseudo_first(headers: Vec<Header>) -> HeaderResult<Headers> {
        let mut saw_regular_header = false;
        let mut pseudo_count = 0;
        for header in &headers {
            if header.is_pseudo_header() {
                if saw_regular_header {
                    return Err(HeaderError::PseudoHeadersAfterRegularHeaders);
                }
                pseudo_count += 1;
            } else {
                saw_regular_header = true;
            }
        }
        Ok(Headers {
            headers,
            pseudo_count,
        })
    }

    /// Pseudo headers returned first.
    pub fn iter(&self) -> impl Iterator<Item = &Header> {
        self.headers.iter()
    }

    pub fn len(&self) -> usize {
        self.headers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.headers.is_empty()
    }

    fn pseudo_headers(&self) -> &[Header] {
        &self.headers[..self.pseudo_count]
    }

    fn regular_headers(&self) -> &[Header] {
        &self.headers[self.pseudo_count..]
    }

    /// Dump all headers as multiline string.
    pub fn dump(&self) -> String {
        let mut r = String::new();
        for h in &self.headers {
            r.push_str(&h.format());
            r.push_str("\n");
        }
        r
    }

    /// `GET` request headers
    pub fn new_get(path: impl Into<HeaderValue>) -> Headers {
        Headers::from_vec(vec![
            Header::pseudo(PseudoHeaderName::Method, "GET"),
            Header::pseudo(PseudoHeaderName::Path, path),
            Header::pseudo(PseudoHeaderName::Version, "HTTP/1.1"),
        ])
    }

    /// `POST` request headers
    pub fn new_post(path: impl Into<HeaderValue>) -> Headers {
        Headers::from_vec(vec![
            Header::pseudo(PseudoHeaderName::Method, "POST"),
            Header::pseudo(PseudoHeaderName::Path, path),
            Header::pseudo(PseudoHeaderName::Version, "HTTP/1.1"),
        ])
    }

    /// Construct a `Headers` object with `:status` and `:version` headers
    pub fn new_status(code: u32) -> Headers {
        Headers::from_vec(vec![
            Header::pseudo(PseudoHeaderName::Status, format!("{}", code)),
            Header::pseudo(PseudoHeaderName::Version, "HTTP/1.1"),
        ])
    }

    pub fn ok_200() -> Headers {
        Headers::new_status(200)
    }

    pub fn not_found_404() -> Headers {
        Headers::new_status(404)
    }

    pub fn internal_error_500() -> Headers {
        Headers::new_status(500)
    }

    pub(crate) fn validate(&self, req_or_resp: RequestOrResponse) -> HeaderResult<()> {
        let mut pseudo_headers_met = PseudoHeaderNameSet::new();

        for header in self.pseudo_headers() {
            let header_name = match header.pseudo_header_name() {
                Some(h) => h,
                None => unreachable!(),
            };

            if !header_name.allowed_in(req_or_resp) {
                return Err(HeaderError::UnexpectedPseudoHeader(header_name));
            }

            if !pseudo_headers_met.insert(header_name) {
                return Err(HeaderError::MoreThanOnePseudoHeader(header_name));
            }

            if header_name == PseudoHeaderName::Path && header.value.is_empty() {
                return Err(HeaderError::EmptyValue(header_name));
            }
        }

        for &required in PseudoHeaderName::required(req_or_resp) {
            if !pseudo_headers_met.contains(required) {
                return Err(HeaderError::MissingPseudoHeader(required));
            }
        }

        Ok(())
    }

    pub fn get_opt<'a>(&'a self, name: &str) -> Option<&'a str> {
        let headers = if name.starts_with(':') {
            self.pseudo_headers()
        } else {
            self.regular_headers()
        };
        headers
            .iter()
            .find(|h| h.name() == name)
            .and_then(|h| str::from_utf8(h.value()).ok())
    }

    pub fn get<'a>(&'a self, name: &str) -> &'a str {
        self.get_opt(name).unwrap()
    }

    pub fn get_opt_parse<I: FromStr>(&self, name: &str) -> Option<I> {
        self.get_opt(name).and_then(|h| h.parse().ok())
    }

    pub fn status(&self) -> u32 {
        self.get_opt_parse(":status").unwrap()
    }

    pub fn path(&self) -> &str {
        self.get(":path")
    }

    pub fn method(&self) -> &str {
        self.get(":method")
    }

    /// `content-length` if present and a valid number.
    pub fn content_length(&self) -> Option<u64> {
        self.get_opt_parse("content-length")
    }

    pub fn add(&mut self, name: impl Into<HeaderName>, value: impl Into<HeaderValue>) {
        self.add_header(Header::new(name, value));
    }

    pub fn add_header(&mut self, header: Header) {
        if header.is_pseudo_header() {
            let pseudo_count = self.pseudo_count;
            self.headers.insert(pseudo_count, header);
            self.pseudo_count += 1;
        } else {
            self.headers.push(header);
        }
    }

    pub fn extend(&mut self, headers: Headers) {
        self.headers.reserve(headers.headers.len());
        for h in headers.headers {
            self.add_header(h);
        }
    }
}

impl FromIterator<Header> for Headers {
    fn from_iter<T: IntoIterator<Item = Header>>(iter: T) -> Headers {
        Headers::from_vec(iter.into_iter().collect())
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn test_partial_eq_of_headers() {
        let fully_static = Header::new(":method", &b"GET"[..]);
        let owned = Header::new(":method", b"GET".to_vec());
        let other = Header::new(":path", &b"/"[..]);

        assert_eq!(fully_static, owned);
        assert_ne!(fully_static, other);
    }

    #[test]
    fn test_debug() {
        assert_eq!(
            "Header { name: \":method\", value: b\"GET\" }",
            format!("{:?}", Header::new(":method", &b"GET"[..]))
        );
    }

    #[test]
    fn pseudo_headers_first() {
        let mut headers = Headers::new();
        headers.add("content-length", "3");
        headers.add(":status", "200");
        let names: Vec<_> = headers.iter().map(|h| h.name().to_owned()).collect();
        assert_eq!(vec![":status", "content-length"], names);
        assert_eq!(Some(3), headers.content_length());
        assert_eq!(200, headers.status());
    }

    #[test]
    fn content_length_not_a_number() {
        let mut headers = Headers::ok_200();
        headers.add("content-length", "eleven");
        assert_eq!(None, headers.content_length());
    }

    #[test]
    fn validate_request() {
        assert_eq!(
            Ok(()),
            Headers::new_get("/").validate(RequestOrResponse::Request)
        );
        assert_eq!(
            Err(HeaderError::UnexpectedPseudoHeader(PseudoHeaderName::Method)),
            Headers::new_get("/").validate(RequestOrResponse::Response)
        );
        let headers = Headers::from_vec(vec![Header::new(":method", "GET")]);
        assert_eq!(
            Err(HeaderError::MissingPseudoHeader(PseudoHeaderName::Path)),
            headers.validate(RequestOrResponse::Request)
        );
    }

    #[test]
    fn validate_response() {
        assert_eq!(Ok(()), Headers::ok_200().validate(RequestOrResponse::Response));
        let headers = Headers::from_vec(vec![
            Header::new(":status", "200"),
            Header::new(":status", "404"),
        ]);
        assert_eq!(
            Err(HeaderError::MoreThanOnePseudoHeader(PseudoHeaderName::Status)),
            headers.validate(RequestOrResponse::Response)
        );
    }

    #[test]
    fn pseudo_after_regular_rejected() {
        let r = Headers::from_vec_pseudo_first(vec![
            Header::new("x-a", "b"),
            Header::new(":status", "200"),
        ]);
        assert_eq!(Err(HeaderError::PseudoHeadersAfterRegularHeaders), r);
    }
}
