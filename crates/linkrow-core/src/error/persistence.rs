use super::Error;

/// The write that was being attempted when a [`PersistenceError`] occurred.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PersistOp {
    Insert,
    Update,
    Delete,
    CascadeInsert,
    CascadeUpdate,
    CascadeDelete,
    BatchInsert,
    BatchDelete,
}

impl PersistOp {
    fn as_str(self) -> &'static str {
        match self {
            PersistOp::Insert => "insert",
            PersistOp::Update => "update",
            PersistOp::Delete => "delete",
            PersistOp::CascadeInsert => "cascade insert",
            PersistOp::CascadeUpdate => "cascade update",
            PersistOp::CascadeDelete => "cascade delete",
            PersistOp::BatchInsert => "batch insert",
            PersistOp::BatchDelete => "batch delete",
        }
    }
}

/// Error when a write, or a batch of writes, failed or returned an
/// unexpected row count.
///
/// Not retried: the usual causes (constraint violations, missing rows) are
/// not transient.
#[derive(Debug)]
pub(super) struct PersistenceError {
    model: Box<str>,
    op: PersistOp,
    detail: Box<str>,
}

impl std::error::Error for PersistenceError {}

impl core::fmt::Display for PersistenceError {
    fn fmt(&self, f: &mut core::fmt::Formatter) -> core::fmt::Result {
        write!(
            f,
            "{} of `{}` failed: {}",
            self.op.as_str(),
            self.model,
            self.detail
        )
    }
}

impl Error {
    /// Creates a persistence error carrying the offending model and the
    /// attempted operation.
    pub fn persistence(model: impl Into<String>, op: PersistOp, detail: impl Into<String>) -> Error {
        Error::from(super::ErrorKind::Persistence(PersistenceError {
            model: model.into().into(),
            op,
            detail: detail.into().into(),
        }))
    }

    /// Returns `true` if this error, or any error it wraps, is a persistence error.
    pub fn is_persistence(&self) -> bool {
        self.any(|kind| matches!(kind, super::ErrorKind::Persistence(_)))
    }

    /// The attempted operation, if this is a persistence error.
    pub fn persist_op(&self) -> Option<PersistOp> {
        self.chain().find_map(|err| match err.kind() {
            super::ErrorKind::Persistence(err) => Some(err.op),
            _ => None,
        })
    }
}
