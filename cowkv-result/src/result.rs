use crate::error::Error;

/// Result type alias used throughout cowkv.
///
/// Shorthand for `std::result::Result<T, Error>`. All cowkv operations that
/// can fail return this type.
pub type Result<T> = std::result::Result<T, Error>;
