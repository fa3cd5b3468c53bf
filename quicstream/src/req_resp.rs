/// Which side of an exchange a header block belongs to.
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub enum RequestOrResponse {
    Request,
    Response,
}
