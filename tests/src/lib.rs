mod db_test;
pub use db_test::{actor, builder, movie, poster, DbTest};

pub use exec_log::ExecLog;

mod logging_driver;
pub use logging_driver::{DriverOp, Faults, LoggingDriver};

pub mod models;

use std::sync::Once;

/// Routes `tracing` output to the test harness. Filtered by `RUST_LOG`.
pub fn init_tracing() {
    static INIT: Once = Once::new();

    INIT.call_once(|| {
        let _ = tracing_subscriber::fmt()
            .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
            .with_test_writer()
            .try_init();
    });
}
