mod builder;
mod connect;
mod pool;
mod transaction;

pub use builder::Builder;
pub use connect::*;
pub use pool::*;
pub use transaction::BoxFuture;

use crate::{engine::Engine, Entity, Error, QueryScope, Result, Value};

use linkrow_core::{driver::Capability, schema::UpdatePolicy, Schema};

use std::sync::Arc;

/// Settings that apply to every operation on a [`Db`] and its clones.
#[derive(Debug, Clone)]
pub(crate) struct Config {
    /// Column stamped with the current time when a row is inserted
    pub(crate) create_date: String,

    /// Column stamped with the current time on insert and update
    pub(crate) modify_date: String,

    pub(crate) verify_unlink_count: bool,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            create_date: "create_date".to_string(),
            modify_date: "modify_date".to_string(),
            verify_unlink_count: true,
        }
    }
}

/// Shared state between all `Db` clones.
pub(crate) struct Shared {
    pub(crate) engine: Engine,
    pub(crate) pool: Pool,
}

/// A database handle.
///
/// Each instance lazily acquires a dedicated connection from the pool and
/// keeps it until dropped, so consecutive calls on one handle, transactions
/// included, share a connection. Cloning produces a new handle that acquires
/// its own connection on first use.
///
/// The cascading operations ([`save`](Db::save), [`update`](Db::update),
/// [`delete`](Db::delete)) issue several statements and never open a
/// transaction themselves. Without a surrounding [`begin`](Db::begin), a
/// failure part way through leaves every statement before it committed.
pub struct Db {
    shared: Arc<Shared>,
    connection: Option<PoolConnection>,
    in_transaction: bool,
}

impl Db {
    pub fn builder() -> Builder {
        Builder::default()
    }

    fn new(shared: Shared) -> Db {
        Db {
            shared: Arc::new(shared),
            connection: None,
            in_transaction: false,
        }
    }

    /// Lazily acquire a connection from the pool.
    pub(crate) async fn connection(&mut self) -> Result<&mut PoolConnection> {
        let connection = match self.connection.take() {
            Some(connection) => connection,
            None => self.shared.pool.get().await?,
        };
        Ok(self.connection.insert(connection))
    }

    /// The engine and this handle's connection, borrowed together.
    pub(crate) async fn split(&mut self) -> Result<(Arc<Shared>, &mut PoolConnection)> {
        let shared = self.shared.clone();
        Ok((shared, self.connection().await?))
    }

    /// Creates every entity table and junction table of the schema.
    pub async fn push_schema(&mut self) -> Result<()> {
        let (shared, connection) = self.split().await?;
        connection.push_schema(&shared.engine.schema).await
    }

    /// Inserts `entity` and cascades the insert to its related entities.
    ///
    /// Generated keys are written back into `entity` and every newly
    /// inserted related entity.
    pub async fn save(&mut self, entity: &mut Entity) -> Result<()> {
        let (shared, connection) = self.split().await?;
        shared.engine.save(connection, entity).await
    }

    /// Updates `entity` and replaces the associations of every relation
    /// that cascades updates and has a value set.
    ///
    /// Prior associations are removed according to each relation's
    /// [`UpdatePolicy`].
    pub async fn update(&mut self, entity: &mut Entity) -> Result<()> {
        let (shared, connection) = self.split().await?;
        shared.engine.update(connection, entity, None).await
    }

    /// Like [`update`](Db::update), with `policy` overriding the policy of
    /// every relation for this call.
    pub async fn update_with(&mut self, entity: &mut Entity, policy: UpdatePolicy) -> Result<()> {
        let (shared, connection) = self.split().await?;
        shared.engine.update(connection, entity, Some(policy)).await
    }

    /// Updates the entity's own row only. Relations are left untouched.
    pub async fn update_without_cascade(&mut self, entity: &mut Entity) -> Result<()> {
        let (shared, connection) = self.split().await?;
        shared.engine.update_without_cascade(connection, entity).await
    }

    /// Deletes the related entities of every relation that cascades deletes,
    /// then `entity`'s own row.
    pub async fn delete(&mut self, entity: &Entity) -> Result<()> {
        let (shared, connection) = self.split().await?;
        shared.engine.delete(connection, entity).await
    }

    /// Like [`delete`](Db::delete), for the row of `model` identified by `id`.
    pub async fn delete_by_id(&mut self, model: &str, id: impl Into<Value>) -> Result<()> {
        let (shared, connection) = self.split().await?;
        shared.engine.delete_by_id(connection, model, id.into()).await
    }

    pub async fn find_by_id(&mut self, model: &str, id: impl Into<Value>) -> Result<Option<Entity>> {
        let (shared, connection) = self.split().await?;
        shared.engine.find_by_id(connection, model, id.into()).await
    }

    /// Like [`find_by_id`](Db::find_by_id), failing when no row matches.
    pub async fn get_by_id(&mut self, model: &str, id: impl Into<Value>) -> Result<Entity> {
        let id = id.into();
        let key = format!("model={model}; id={id}");
        self.find_by_id(model, id)
            .await?
            .ok_or_else(|| Error::record_not_found(key))
    }

    /// The entities currently linked to `master` through `field`.
    pub async fn find_related(&mut self, master: &Entity, field: &str) -> Result<Vec<Entity>> {
        let (shared, connection) = self.split().await?;
        let relation = shared.engine.schema.relation(master.model(), field)?;
        let master_id = shared.engine.master_id(master)?;
        shared
            .engine
            .find_linked(connection, relation, &master_id)
            .await
    }

    /// Starts a query scope. See [`QueryScope`].
    pub fn query(&self) -> QueryScope {
        QueryScope::new(self.schema().clone())
    }

    pub fn schema(&self) -> &Arc<Schema> {
        &self.shared.engine.schema
    }

    pub fn capability(&self) -> &Capability {
        self.shared.engine.capability
    }

    /// True between [`begin`](Db::begin) and the matching commit or rollback.
    pub fn in_transaction(&self) -> bool {
        self.in_transaction
    }
}

impl Clone for Db {
    fn clone(&self) -> Self {
        Db {
            shared: self.shared.clone(),
            connection: None,
            in_transaction: false,
        }
    }
}

impl std::fmt::Debug for Db {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Db")
            .field("engine", &self.shared.engine)
            .field("connected", &self.connection.is_some())
            .field("in_transaction", &self.in_transaction)
            .finish()
    }
}
