use crate::{
    exec_log::ExecLog,
    logging_driver::{DriverOp, Faults, LoggingDriver},
    models::{Movie, MovieMan, Note, Poster},
};
use linkrow::{db::Builder, driver::operation::Transaction, Db, Entity, Model};
use linkrow_driver_sqlite::Sqlite;
use std::sync::{Arc, Mutex};

/// A database on a fresh in-memory SQLite connection, with every operation
/// logged.
pub struct DbTest {
    pub db: Db,
    ops_log: Arc<Mutex<Vec<DriverOp>>>,
    write_budget: Arc<Mutex<Option<usize>>>,
    faults: Arc<Mutex<Faults>>,
}

impl DbTest {
    /// Sets up the movie models.
    pub async fn new() -> DbTest {
        DbTest::with_builder(&mut builder()).await
    }

    pub async fn with_builder(builder: &mut Builder) -> DbTest {
        crate::init_tracing();

        let driver = LoggingDriver::new(Box::new(Sqlite::in_memory()));
        let ops_log = driver.ops_log_handle();
        let write_budget = driver.write_budget_handle();
        let faults = driver.faults_handle();

        let mut db = builder.build(driver).await.unwrap();
        db.push_schema().await.unwrap();

        DbTest {
            db,
            ops_log,
            write_budget,
            faults,
        }
    }

    pub fn log(&self) -> ExecLog {
        ExecLog::new(self.ops_log.clone())
    }

    /// Lets `writes` more writes through, then fails every write after them.
    pub fn fail_after_writes(&self, writes: usize) {
        *self.write_budget.lock().unwrap() = Some(writes);
    }

    /// Fails the next `kind` transaction op without running it.
    pub fn fail_next(&self, kind: Transaction) {
        self.faults.lock().unwrap().fail_transaction = Some(kind);
    }

    /// Makes every single `DELETE` report `count` affected rows.
    pub fn report_delete_count(&self, count: u64) {
        self.faults.lock().unwrap().delete_count = Some(count);
    }

    pub fn clear_faults(&self) {
        *self.write_budget.lock().unwrap() = None;
        *self.faults.lock().unwrap() = Faults::default();
    }

    /// Every stored row of `model`.
    pub async fn all(&mut self, model: &str) -> Vec<Entity> {
        let mut query = self.db.query();
        query.select(&Entity::new(model)).unwrap();
        query.fetch(&mut self.db, 0, 1000).await.unwrap()
    }

    /// Ids of the entities linked to `master` through `field`, sorted.
    pub async fn linked_ids(&mut self, master: &Entity, field: &str) -> Vec<i64> {
        let mut ids: Vec<i64> = self
            .db
            .find_related(master, field)
            .await
            .unwrap()
            .iter()
            .filter_map(|entity| entity.get_i64("id"))
            .collect();
        ids.sort_unstable();
        ids
    }
}

/// A builder with every test model registered.
pub fn builder() -> Builder {
    let mut builder = Db::builder();
    builder
        .register::<Movie>()
        .register::<Poster>()
        .register::<MovieMan>()
        .register::<Note>();
    builder
}

pub fn movie(name: &str, year: i32) -> Entity {
    Movie::entity().with("name", name).with("year", year)
}

pub fn poster(url: &str) -> Entity {
    Poster::entity().with("url", url)
}

pub fn actor(name: &str) -> Entity {
    MovieMan::entity().with("name", name)
}
