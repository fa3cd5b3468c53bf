use crate::error::Error;
use std::result;

/// A convenience `Result` type.
pub type Result<T> = result::Result<T, Error>;
