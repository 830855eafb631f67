use linkrow_core::{
    async_trait,
    driver::{
        operation::Transaction, Capability, Connection, Driver, Operation, Response, RowCount,
        Rows,
    },
    stmt::Statement,
    Result, Schema,
};
use std::{
    borrow::Cow,
    sync::{Arc, Mutex},
};

/// Wraps a driver, recording every operation and optionally failing writes
/// once a budget runs out.
#[derive(Debug)]
pub struct LoggingDriver {
    inner: Box<dyn Driver>,

    /// Log of all operations executed through this driver
    ops_log: Arc<Mutex<Vec<DriverOp>>>,

    /// Writes allowed before every further write fails. `None` never fails.
    write_budget: Arc<Mutex<Option<usize>>>,

    faults: Arc<Mutex<Faults>>,
}

/// One-off misbehaviors injected on top of the real driver.
#[derive(Debug, Default)]
pub struct Faults {
    /// The next transaction op of this kind fails without reaching the database
    pub fail_transaction: Option<Transaction>,

    /// Reported in place of the real count of every single `DELETE`
    pub delete_count: Option<u64>,
}

impl LoggingDriver {
    pub fn new(driver: Box<dyn Driver>) -> Self {
        Self {
            inner: driver,
            ops_log: Arc::new(Mutex::new(Vec::new())),
            write_budget: Arc::new(Mutex::new(None)),
            faults: Arc::new(Mutex::new(Faults::default())),
        }
    }

    /// Get a handle to access the operations log
    pub fn ops_log_handle(&self) -> Arc<Mutex<Vec<DriverOp>>> {
        self.ops_log.clone()
    }

    pub fn write_budget_handle(&self) -> Arc<Mutex<Option<usize>>> {
        self.write_budget.clone()
    }

    pub fn faults_handle(&self) -> Arc<Mutex<Faults>> {
        self.faults.clone()
    }
}

#[async_trait]
impl Driver for LoggingDriver {
    fn url(&self) -> Cow<'_, str> {
        self.inner.url()
    }

    fn capability(&self) -> &'static Capability {
        self.inner.capability()
    }

    async fn connect(&self) -> Result<Box<dyn Connection>> {
        Ok(Box::new(LoggingConnection {
            inner: self.inner.connect().await?,
            ops_log: self.ops_log_handle(),
            write_budget: self.write_budget_handle(),
            faults: self.faults_handle(),
        }))
    }

    fn max_connections(&self) -> Option<usize> {
        self.inner.max_connections()
    }
}

#[derive(Debug)]
pub struct DriverOp {
    pub operation: Operation,

    /// `None` when the operation was failed on purpose
    pub response: Option<Response>,
}

#[derive(Debug)]
pub struct LoggingConnection {
    /// The underlying connection that actually executes operations
    inner: Box<dyn Connection>,
    ops_log: Arc<Mutex<Vec<DriverOp>>>,
    write_budget: Arc<Mutex<Option<usize>>>,
    faults: Arc<Mutex<Faults>>,
}

impl LoggingConnection {
    /// Spends one write from the budget. False once it is exhausted.
    fn admit(&self, operation: &Operation) -> bool {
        if !operation.is_write() {
            return true;
        }

        let mut budget = self.write_budget.lock().unwrap();
        match budget.as_mut() {
            None => true,
            Some(0) => false,
            Some(remaining) => {
                *remaining -= 1;
                true
            }
        }
    }

    fn fails_transaction(&self, operation: &Operation) -> bool {
        let Operation::Transaction(kind) = operation else {
            return false;
        };

        let mut faults = self.faults.lock().unwrap();
        if faults.fail_transaction == Some(*kind) {
            faults.fail_transaction = None;
            return true;
        }
        false
    }

    fn rewrite(&self, operation: &Operation, response: &mut Response) {
        let Some(count) = self.faults.lock().unwrap().delete_count else {
            return;
        };

        if let Operation::QuerySql(op) = operation {
            if matches!(op.stmt, Statement::Delete(_)) {
                response.rows = Rows::Count(RowCount::Affected(count));
            }
        }
    }

    fn record(&self, operation: Operation, response: Option<Response>) {
        self.ops_log
            .lock()
            .expect("Failed to acquire ops log lock")
            .push(DriverOp {
                operation,
                response,
            });
    }
}

#[async_trait]
impl Connection for LoggingConnection {
    async fn exec(&mut self, schema: &Arc<Schema>, operation: Operation) -> Result<Response> {
        if !self.admit(&operation) {
            self.record(operation, None);
            return Err(linkrow_core::err!("injected write failure"));
        }

        if self.fails_transaction(&operation) {
            self.record(operation, None);
            return Err(linkrow_core::err!("injected transaction failure"));
        }

        let mut response = self.inner.exec(schema, operation.clone()).await?;
        self.rewrite(&operation, &mut response);
        self.record(operation, Some(response.clone()));

        Ok(response)
    }

    async fn push_schema(&mut self, schema: &Schema) -> Result<()> {
        self.inner.push_schema(schema).await
    }
}
