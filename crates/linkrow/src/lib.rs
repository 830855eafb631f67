mod batch;

pub mod bind;
pub use bind::Params;

pub mod db;
pub use db::Db;

mod engine;

mod entity;
pub use entity::{Entity, Related};

mod envelope;
pub use envelope::Envelope;

mod model;
pub use model::Model;

mod query;
pub use query::QueryScope;

pub mod reconcile;

pub use linkrow_core::{
    driver,
    schema::{self, Cascade, CascadeOp, Relation, Resolution, Table, UpdatePolicy},
    stmt::{Type, Value},
    Error, PersistOp, Result, Schema,
};
