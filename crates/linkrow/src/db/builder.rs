use super::{Config, Connect, Db, Pool, Shared};
use crate::{engine::Engine, Model, Result};

use linkrow_core::{
    driver::Driver,
    schema::{self, Resolution},
    Schema,
};

use std::sync::Arc;

#[derive(Debug, Default)]
pub struct Builder {
    /// Schema builder
    core: schema::Builder,

    config: Config,

    max_connections: Option<usize>,
}

impl Builder {
    pub fn register<T: Model>(&mut self) -> &mut Self {
        let mut model = T::schema();
        model.name = T::NAME.to_string();
        self.core.model(model);
        self
    }

    /// Registers a model described at runtime rather than by a [`Model`] impl.
    pub fn model(&mut self, model: schema::Model) -> &mut Self {
        self.core.model(model);
        self
    }

    /// What to do with a relation whose target cannot be resolved. Defaults
    /// to failing the build.
    pub fn resolution(&mut self, resolution: Resolution) -> &mut Self {
        self.core.resolution(resolution);
        self
    }

    /// Names of the columns stamped on insert and on every update.
    pub fn timestamp_columns(
        &mut self,
        created: impl Into<String>,
        modified: impl Into<String>,
    ) -> &mut Self {
        self.config.create_date = created.into();
        self.config.modify_date = modified.into();
        self
    }

    /// Whether unlinking checks the junction rows it removed against a prior
    /// count. On by default.
    pub fn verify_unlink_count(&mut self, verify: bool) -> &mut Self {
        self.config.verify_unlink_count = verify;
        self
    }

    pub fn max_connections(&mut self, max: usize) -> &mut Self {
        self.max_connections = Some(max);
        self
    }

    pub fn build_schema(&self) -> Result<Schema> {
        self.core.build()
    }

    pub async fn connect(&mut self, url: &str) -> Result<Db> {
        self.build(Connect::new(url)?).await
    }

    pub async fn build(&mut self, driver: impl Driver) -> Result<Db> {
        let schema = Arc::new(self.build_schema()?);
        let pool = Pool::new(driver, self.max_connections).await?;

        let engine = Engine {
            schema,
            config: Arc::new(self.config.clone()),
            capability: pool.capability(),
        };

        Ok(Db::new(Shared { engine, pool }))
    }
}
