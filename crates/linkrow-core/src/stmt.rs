mod convert;
pub use convert::{convert, DATE_TIME_LEN};

mod delete;
pub use delete::Delete;

mod expr;
pub use expr::{ColumnRef, Expr};

mod insert;
pub use insert::Insert;

mod select;
pub use select::{Clause, Join, Limit, Returning, Select, Source};

mod statement;
pub use statement::Statement;

mod ty;
pub use ty::Type;

mod update;
pub use update::Update;

mod value;
pub use value::Value;

mod value_record;
pub use value_record::ValueRecord;
