mod capability;
pub use capability::Capability;

pub mod operation;
pub use operation::Operation;

mod response;
pub use response::{Response, RowCount, Rows};

use crate::{async_trait, schema::Schema};

use std::{borrow::Cow, fmt::Debug, sync::Arc};

#[async_trait]
pub trait Driver: Debug + Send + Sync + 'static {
    /// Connection URL the driver was created from.
    fn url(&self) -> Cow<'_, str>;

    /// Describes the driver's capability.
    fn capability(&self) -> &'static Capability;

    /// Opens a new connection.
    async fn connect(&self) -> crate::Result<Box<dyn Connection>>;

    /// Upper bound on simultaneously open connections, if the backend has one.
    fn max_connections(&self) -> Option<usize> {
        None
    }
}

#[async_trait]
pub trait Connection: Debug + Send + 'static {
    /// Execute a database operation.
    ///
    /// Every call is a blocking round trip from the caller's point of view;
    /// operations on one connection never interleave.
    async fn exec(&mut self, schema: &Arc<Schema>, op: Operation) -> crate::Result<Response>;

    /// Create all entity and junction tables described by `schema`.
    async fn push_schema(&mut self, schema: &Schema) -> crate::Result<()>;
}
