use std::fmt;

/// Semantic column type.
///
/// Every column of a table descriptor carries one of these. It drives textual
/// conversion of request parameters ([`convert`](super::convert())), decoding of
/// driver rows, and the storage type emitted by DDL.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Type {
    /// Text (varchar, char, enum, set, text variants)
    String,

    /// Signed 32-bit integer
    I32,

    /// Signed 64-bit integer
    I64,

    /// Double precision float
    F64,

    /// Single precision float
    F32,

    /// Arbitrary precision decimal
    Decimal,

    /// Arbitrary precision integer (e.g. unsigned bigint)
    BigInt,

    /// Boolean (bit, tinyint(1))
    Bool,

    /// Calendar date without time
    Date,

    /// Date and time of day, second precision
    DateTime,

    /// Time of day
    Time,

    /// Date and time of day with optional fractional seconds
    Timestamp,

    /// Raw bytes
    Bytes,

    /// A declared storage type with no conversion rule.
    Other(Box<str>),
}

impl Type {
    /// Maps a SQL storage type name to a semantic type.
    ///
    /// Names are matched case-insensitively and any length/precision suffix
    /// is ignored, except for `tinyint(1)` which is treated as a boolean.
    /// Unknown names map to [`Type::Other`].
    pub fn from_sql_name(name: &str) -> Type {
        let lower = name.trim().to_ascii_lowercase();

        if lower == "tinyint(1)" {
            return Type::Bool;
        }

        let unsigned = lower.contains("unsigned");
        let base = lower
            .split(|c: char| c == '(' || c.is_whitespace())
            .next()
            .unwrap_or("");

        match base {
            "varchar" | "char" | "enum" | "set" | "text" | "tinytext" | "mediumtext"
            | "longtext" => Type::String,
            "bigint" if unsigned => Type::BigInt,
            "bigint" => Type::I64,
            "int" | "integer" | "tinyint" | "smallint" | "mediumint" => Type::I32,
            "real" | "double" => Type::F64,
            "float" => Type::F32,
            "bit" | "bool" | "boolean" => Type::Bool,
            "decimal" | "numeric" => Type::Decimal,
            "date" | "year" => Type::Date,
            "time" => Type::Time,
            "datetime" | "timestamp" => Type::Timestamp,
            "binary" | "varbinary" | "tinyblob" | "blob" | "mediumblob" | "longblob" => {
                Type::Bytes
            }
            _ => Type::Other(name.trim().into()),
        }
    }

    pub fn is_string(&self) -> bool {
        matches!(self, Type::String)
    }

    /// True for the types that hold a calendar date.
    pub fn is_temporal(&self) -> bool {
        matches!(
            self,
            Type::Date | Type::DateTime | Type::Time | Type::Timestamp
        )
    }
}

impl fmt::Display for Type {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Type::Other(name) => f.write_str(name),
            other => fmt::Debug::fmt(other, f),
        }
    }
}
