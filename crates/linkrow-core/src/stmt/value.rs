use super::Type;

use bigdecimal::BigDecimal;
use chrono::{NaiveDate, NaiveDateTime, NaiveTime, Timelike};
use num_bigint::BigInt;
use serde::{Serialize, Serializer};
use std::fmt;

pub(crate) const DATE_PATTERN: &str = "%Y-%m-%d";
pub(crate) const DATE_TIME_PATTERN: &str = "%Y-%m-%d %H:%M:%S";
pub(crate) const TIME_PATTERN: &str = "%H:%M:%S";

/// A typed attribute value.
#[derive(Debug, Default, Clone, PartialEq)]
pub enum Value {
    /// Boolean value
    Bool(bool),

    /// Signed 32-bit integer
    I32(i32),

    /// Signed 64-bit integer
    I64(i64),

    /// Single precision float
    F32(f32),

    /// Double precision float
    F64(f64),

    /// Arbitrary precision decimal
    Decimal(BigDecimal),

    /// Arbitrary precision integer
    BigInt(BigInt),

    /// String value
    String(String),

    /// Raw bytes
    Bytes(Vec<u8>),

    /// Calendar date
    Date(NaiveDate),

    /// Date and time of day
    DateTime(NaiveDateTime),

    /// Time of day
    Time(NaiveTime),

    /// Null value
    #[default]
    Null,
}

impl Value {
    pub const fn null() -> Self {
        Self::Null
    }

    pub const fn is_null(&self) -> bool {
        matches!(self, Self::Null)
    }

    /// Returns the value as an `i64` if it is an integer that fits.
    pub fn as_i64(&self) -> Option<i64> {
        match self {
            Self::I32(v) => Some(i64::from(*v)),
            Self::I64(v) => Some(*v),
            Self::BigInt(v) => i64::try_from(v).ok(),
            _ => None,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            Self::String(v) => Some(v),
            _ => None,
        }
    }

    /// The current local time, shaped for a column of type `ty`.
    ///
    /// Used to stamp created/modified timestamp columns.
    pub fn now_for(ty: &Type) -> Value {
        let now = chrono::Local::now().naive_local();
        // Second precision keeps the stored text in the `yyyy-MM-dd HH:mm:ss` shape.
        let now = now.with_nanosecond(0).unwrap_or(now);

        match ty {
            Type::Date => Value::Date(now.date()),
            Type::Time => Value::Time(now.time()),
            Type::String => Value::String(now.format(DATE_TIME_PATTERN).to_string()),
            Type::I64 => Value::I64(now.and_utc().timestamp_millis()),
            _ => Value::DateTime(now),
        }
    }

    /// Best-effort type of this value. `None` for null.
    pub fn infer_ty(&self) -> Option<Type> {
        Some(match self {
            Value::Bool(_) => Type::Bool,
            Value::I32(_) => Type::I32,
            Value::I64(_) => Type::I64,
            Value::F32(_) => Type::F32,
            Value::F64(_) => Type::F64,
            Value::Decimal(_) => Type::Decimal,
            Value::BigInt(_) => Type::BigInt,
            Value::String(_) => Type::String,
            Value::Bytes(_) => Type::Bytes,
            Value::Date(_) => Type::Date,
            Value::DateTime(_) => Type::DateTime,
            Value::Time(_) => Type::Time,
            Value::Null => return None,
        })
    }
}

/// Textual rendering. Integers and decimals render in a form that
/// [`convert`](super::convert()) parses back to an equal value.
impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Bool(v) => write!(f, "{v}"),
            Value::I32(v) => write!(f, "{v}"),
            Value::I64(v) => write!(f, "{v}"),
            Value::F32(v) => write!(f, "{v}"),
            Value::F64(v) => write!(f, "{v}"),
            Value::Decimal(v) => write!(f, "{v}"),
            Value::BigInt(v) => write!(f, "{v}"),
            Value::String(v) => f.write_str(v),
            Value::Bytes(v) => f.write_str(&String::from_utf8_lossy(v)),
            Value::Date(v) => write!(f, "{}", v.format(DATE_PATTERN)),
            Value::DateTime(v) => write!(f, "{}", v.format(DATE_TIME_PATTERN)),
            Value::Time(v) => write!(f, "{}", v.format(TIME_PATTERN)),
            Value::Null => f.write_str("null"),
        }
    }
}

impl Serialize for Value {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            Value::Bool(v) => serializer.serialize_bool(*v),
            Value::I32(v) => serializer.serialize_i32(*v),
            Value::I64(v) => serializer.serialize_i64(*v),
            Value::F32(v) => serializer.serialize_f32(*v),
            Value::F64(v) => serializer.serialize_f64(*v),
            Value::Bytes(v) => serializer.serialize_bytes(v),
            Value::Null => serializer.serialize_none(),
            // Decimals, big integers, strings and temporal values go out as text
            other => serializer.collect_str(other),
        }
    }
}

macro_rules! impl_from {
    ( $( $t:ty => $variant:ident ),* $(,)? ) => {
        $(
            impl From<$t> for Value {
                fn from(src: $t) -> Value {
                    Value::$variant(src)
                }
            }
        )*
    };
}

impl_from! {
    bool => Bool,
    i32 => I32,
    i64 => I64,
    f32 => F32,
    f64 => F64,
    BigDecimal => Decimal,
    BigInt => BigInt,
    String => String,
    Vec<u8> => Bytes,
    NaiveDate => Date,
    NaiveDateTime => DateTime,
    NaiveTime => Time,
}

impl From<&str> for Value {
    fn from(src: &str) -> Value {
        Value::String(src.to_string())
    }
}

impl<T: Into<Value>> From<Option<T>> for Value {
    fn from(src: Option<T>) -> Value {
        src.map(Into::into).unwrap_or(Value::Null)
    }
}
