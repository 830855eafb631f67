//! Connection pooling for database connections.

use std::ops::{Deref, DerefMut};

use linkrow_core::driver::{Capability, Connection, Driver};

/// A connection pool that manages database connections.
#[derive(Debug)]
pub struct Pool {
    inner: deadpool::managed::Pool<Manager>,
    capability: &'static Capability,
}

impl Pool {
    /// Creates a new connection pool from the given driver.
    ///
    /// `max_connections` caps the pool size. The driver's own limit, if it has
    /// one, wins when it is smaller.
    pub async fn new(driver: impl Driver, max_connections: Option<usize>) -> crate::Result<Self> {
        let capability = driver.capability();
        let max_size = match (driver.max_connections(), max_connections) {
            (Some(limit), Some(requested)) => Some(limit.min(requested)),
            (limit, requested) => limit.or(requested),
        };

        let mut builder = deadpool::managed::Pool::builder(Manager {
            driver: Box::new(driver),
        })
        .runtime(deadpool::Runtime::Tokio1);

        if let Some(max_size) = max_size {
            builder = builder.max_size(max_size);
        }

        let inner = builder
            .build()
            .map_err(linkrow_core::Error::connection_pool)?;

        // Open one connection up front so a bad URL or unreachable database
        // fails at build time instead of on first use.
        let connection = inner
            .get()
            .await
            .map_err(linkrow_core::Error::connection_pool)?;
        drop(connection);

        Ok(Self { inner, capability })
    }

    /// Retrieves a connection from the pool.
    pub async fn get(&self) -> crate::Result<PoolConnection> {
        let connection = self
            .inner
            .get()
            .await
            .map_err(linkrow_core::Error::connection_pool)?;
        Ok(PoolConnection { inner: connection })
    }

    /// Returns the database driver's capabilities.
    pub fn capability(&self) -> &'static Capability {
        self.capability
    }
}

#[derive(Debug)]
struct Manager {
    driver: Box<dyn Driver>,
}

impl deadpool::managed::Manager for Manager {
    type Type = Box<dyn Connection>;
    type Error = crate::Error;

    async fn create(&self) -> Result<Self::Type, Self::Error> {
        tracing::debug!(url = %self.driver.url(), "opening connection");
        self.driver.connect().await
    }

    async fn recycle(
        &self,
        _obj: &mut Self::Type,
        _metrics: &deadpool::managed::Metrics,
    ) -> deadpool::managed::RecycleResult<Self::Error> {
        Ok(())
    }
}

/// A connection retrieved from a pool.
///
/// When dropped, the connection is returned to the pool for reuse.
pub struct PoolConnection {
    inner: deadpool::managed::Object<Manager>,
}

impl PoolConnection {
    /// Removes the connection from the pool. Dropping the result closes it.
    pub(crate) fn detach(self) -> Box<dyn Connection> {
        deadpool::managed::Object::take(self.inner)
    }
}

impl std::fmt::Debug for PoolConnection {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PoolConnection")
            .field("connection", &**self.inner)
            .finish()
    }
}

impl Deref for PoolConnection {
    type Target = Box<dyn Connection>;

    fn deref(&self) -> &Self::Target {
        &self.inner
    }
}

impl DerefMut for PoolConnection {
    fn deref_mut(&mut self) -> &mut Self::Target {
        &mut self.inner
    }
}
