#[derive(Debug)]
pub struct Capability {
    /// Supports `INSERT ... RETURNING`. Without it, generated keys are read
    /// back with a last-insert-id query.
    pub returning: bool,

    /// Enforces `ON DELETE CASCADE` foreign keys. The cascade engine relies on
    /// this to drop junction rows when either side's row is deleted.
    pub foreign_key_cascade: bool,
}

impl Capability {
    /// SQLite capabilities.
    pub const SQLITE: Self = Self {
        returning: true,
        foreign_key_cascade: true,
    };

    /// PostgreSQL capabilities
    pub const POSTGRESQL: Self = Self { ..Self::SQLITE };

    /// MySQL capabilities
    pub const MYSQL: Self = Self {
        returning: false,
        ..Self::SQLITE
    };
}
