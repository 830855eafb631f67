use super::Error;

/// Context naming the request parameter whose value could not be bound.
#[derive(Debug)]
pub(super) struct InvalidParameter {
    name: Box<str>,
}

impl std::error::Error for InvalidParameter {}

impl core::fmt::Display for InvalidParameter {
    fn fmt(&self, f: &mut core::fmt::Formatter) -> core::fmt::Result {
        write!(f, "cannot convert parameter `{}`", self.name)
    }
}

impl Error {
    /// Creates an invalid parameter error. Usually attached as context to the
    /// conversion error that caused it.
    pub fn invalid_parameter(name: impl Into<String>) -> Error {
        Error::from(super::ErrorKind::InvalidParameter(InvalidParameter {
            name: name.into().into(),
        }))
    }

    /// Returns `true` if this error, or any error it wraps, is an invalid parameter error.
    pub fn is_invalid_parameter(&self) -> bool {
        self.any(|kind| matches!(kind, super::ErrorKind::InvalidParameter(_)))
    }
}
