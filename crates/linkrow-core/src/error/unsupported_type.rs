use super::Error;

/// Error when an attribute type has no conversion rule.
///
/// This is a configuration-time defect in the table descriptor.
#[derive(Debug)]
pub(super) struct UnsupportedTypeError {
    ty: Box<str>,
}

impl std::error::Error for UnsupportedTypeError {}

impl core::fmt::Display for UnsupportedTypeError {
    fn fmt(&self, f: &mut core::fmt::Formatter) -> core::fmt::Result {
        write!(
            f,
            "type `{}` cannot be converted; use another attribute type",
            self.ty
        )
    }
}

impl Error {
    /// Creates an unsupported type error naming the type.
    pub fn unsupported_type(ty: impl Into<String>) -> Error {
        Error::from(super::ErrorKind::UnsupportedType(UnsupportedTypeError {
            ty: ty.into().into(),
        }))
    }

    /// Returns `true` if this error, or any error it wraps, is an unsupported type error.
    pub fn is_unsupported_type(&self) -> bool {
        self.any(|kind| matches!(kind, super::ErrorKind::UnsupportedType(_)))
    }
}
