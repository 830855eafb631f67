use crate::stmt::ValueRecord;

#[derive(Debug, Clone, PartialEq)]
pub struct Response {
    pub rows: Rows,
}

#[derive(Debug, Clone, PartialEq)]
pub enum Rows {
    /// Number of rows impacted by the operation
    Count(RowCount),

    /// Rows returned by the operation
    Values(Vec<ValueRecord>),

    /// One count per statement of a batch
    Batch(Vec<RowCount>),
}

/// Outcome of a single write as reported by the driver.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RowCount {
    /// The write succeeded and touched this many rows
    Affected(u64),

    /// The write succeeded but the driver cannot tell how many rows it touched
    NoInfo,

    /// The write failed; only reported for entries of a batch
    Failed,
}

impl RowCount {
    /// True unless the driver reported a failure or a write that touched nothing.
    pub fn is_effective(self) -> bool {
        match self {
            RowCount::Affected(n) => n > 0,
            RowCount::NoInfo => true,
            RowCount::Failed => false,
        }
    }
}

impl Response {
    pub fn count(count: u64) -> Self {
        Self {
            rows: Rows::Count(RowCount::Affected(count)),
        }
    }

    pub fn count_unknown() -> Self {
        Self {
            rows: Rows::Count(RowCount::NoInfo),
        }
    }

    pub fn values(values: Vec<ValueRecord>) -> Self {
        Self {
            rows: Rows::Values(values),
        }
    }

    pub fn batch(counts: Vec<RowCount>) -> Self {
        Self {
            rows: Rows::Batch(counts),
        }
    }
}

impl Rows {
    pub fn is_count(&self) -> bool {
        matches!(self, Self::Count(_))
    }

    pub fn is_values(&self) -> bool {
        matches!(self, Self::Values(_))
    }

    pub fn into_count(self) -> crate::Result<RowCount> {
        match self {
            Rows::Count(count) => Ok(count),
            other => Err(crate::err!("expected a row count; rows={other:?}")),
        }
    }

    pub fn into_values(self) -> crate::Result<Vec<ValueRecord>> {
        match self {
            Rows::Values(values) => Ok(values),
            other => Err(crate::err!("expected rows; rows={other:?}")),
        }
    }

    pub fn into_batch(self) -> crate::Result<Vec<RowCount>> {
        match self {
            Rows::Batch(counts) => Ok(counts),
            other => Err(crate::err!("expected batch counts; rows={other:?}")),
        }
    }
}
