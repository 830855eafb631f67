use super::Error;

/// Error when an API is called out of sequence.
///
/// This is a programmer error, e.g. calling `order_by()` on a query scope
/// before `select()`. It is never retried.
#[derive(Debug)]
pub(super) struct UsageError {
    message: Box<str>,
}

impl std::error::Error for UsageError {}

impl core::fmt::Display for UsageError {
    fn fmt(&self, f: &mut core::fmt::Formatter) -> core::fmt::Result {
        write!(f, "usage error: {}", self.message)
    }
}

impl Error {
    /// Creates a usage error.
    pub fn usage(message: impl Into<String>) -> Error {
        Error::from(super::ErrorKind::Usage(UsageError {
            message: message.into().into(),
        }))
    }

    /// Returns `true` if this error, or any error it wraps, is a usage error.
    pub fn is_usage(&self) -> bool {
        self.any(|kind| matches!(kind, super::ErrorKind::Usage(_)))
    }
}
