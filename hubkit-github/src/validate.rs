//! Argument checks run before a request is built

use crate::{Error, Result};

/// Reject an empty required string
pub fn not_empty(value: &str, name: &'static str) -> Result<()> {
    if value.is_empty() {
        return Err(Error::EmptyArgument(name));
    }
    Ok(())
}

/// Unwrap a value the operation cannot do without
///
/// The missing check comes before the empty check, so a `None` reports
/// [`Error::NullArgument`] and `Some("")` reports [`Error::EmptyArgument`].
pub fn required<'a>(value: Option<&'a str>, name: &'static str) -> Result<&'a str> {
    let value = value.ok_or(Error::NullArgument(name))?;
    not_empty(value, name)?;
    Ok(value)
}

/// Reject an empty list of required values
pub fn not_empty_list<T>(values: &[T], name: &'static str) -> Result<()> {
    if values.is_empty() {
        return Err(Error::EmptyArgument(name));
    }
    Ok(())
}
