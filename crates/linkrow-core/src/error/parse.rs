use super::Error;

/// Error when textual input cannot be parsed into the target column type.
///
/// Recoverable by the caller; usually surfaced to the end user as a
/// validation failure.
#[derive(Debug)]
pub(super) struct ParseError {
    value: Box<str>,
    target: Box<str>,
    detail: Option<Box<str>>,
}

impl std::error::Error for ParseError {}

impl core::fmt::Display for ParseError {
    fn fmt(&self, f: &mut core::fmt::Formatter) -> core::fmt::Result {
        write!(f, "cannot parse {:?} as {}", self.value, self.target)?;
        if let Some(detail) = &self.detail {
            write!(f, " ({detail})")?;
        }
        Ok(())
    }
}

impl Error {
    /// Creates a parse error naming the offending value and the target type.
    pub fn parse(value: impl Into<String>, target: impl Into<String>) -> Error {
        Error::from(super::ErrorKind::Parse(ParseError {
            value: value.into().into(),
            target: target.into().into(),
            detail: None,
        }))
    }

    /// Creates a parse error that also carries the underlying parser message.
    pub fn parse_with(
        value: impl Into<String>,
        target: impl Into<String>,
        detail: impl core::fmt::Display,
    ) -> Error {
        Error::from(super::ErrorKind::Parse(ParseError {
            value: value.into().into(),
            target: target.into().into(),
            detail: Some(detail.to_string().into()),
        }))
    }

    /// Returns `true` if this error, or any error it wraps, is a parse error.
    pub fn is_parse(&self) -> bool {
        self.any(|kind| matches!(kind, super::ErrorKind::Parse(_)))
    }
}
