use bigdecimal::BigDecimal;
use chrono::{NaiveDate, NaiveDateTime, NaiveTime};
use linkrow_core::{
    stmt::{self, Type, Value as CoreValue},
    Error, Result,
};
use num_bigint::BigInt;
use rusqlite::{
    types::{ToSql, ToSqlOutput, Value as SqlValue, ValueRef},
    Row,
};

const DATE: &str = "%Y-%m-%d";
const DATE_TIME: &str = "%Y-%m-%d %H:%M:%S%.f";
const TIME: &str = "%H:%M:%S%.f";

#[derive(Debug)]
pub struct Value(CoreValue);

impl From<CoreValue> for Value {
    fn from(value: CoreValue) -> Self {
        Self(value)
    }
}

impl Value {
    /// Converts this SQLite driver value into the core value.
    pub fn into_inner(self) -> CoreValue {
        self.0
    }

    /// Converts a SQLite value within a row to a core value of type `ty`.
    pub fn from_sql(row: &Row, index: usize, ty: &Type) -> Result<Self> {
        let value: SqlValue = row.get(index).map_err(Error::driver_operation_failed)?;

        let core_value = match value {
            SqlValue::Null => CoreValue::Null,
            SqlValue::Integer(value) => from_integer(value, ty)?,
            SqlValue::Real(value) => match ty {
                Type::F32 => CoreValue::F32(value as f32),
                Type::Decimal => CoreValue::Decimal(
                    BigDecimal::try_from(value).map_err(|e| Error::parse_with(value.to_string(), ty.to_string(), e))?,
                ),
                _ => CoreValue::F64(value),
            },
            SqlValue::Text(value) => from_text(value, ty)?,
            SqlValue::Blob(value) => match ty {
                Type::String => CoreValue::String(String::from_utf8_lossy(&value).into_owned()),
                _ => CoreValue::Bytes(value),
            },
        };

        Ok(Value(core_value))
    }
}

fn from_integer(value: i64, ty: &Type) -> Result<CoreValue> {
    Ok(match ty {
        Type::Bool => CoreValue::Bool(value != 0),
        Type::I32 => CoreValue::I32(
            i32::try_from(value).map_err(|e| Error::parse_with(value.to_string(), "I32", e))?,
        ),
        Type::F64 => CoreValue::F64(value as f64),
        Type::F32 => CoreValue::F32(value as f32),
        Type::Decimal => CoreValue::Decimal(BigDecimal::from(value)),
        Type::BigInt => CoreValue::BigInt(BigInt::from(value)),
        Type::String => CoreValue::String(value.to_string()),
        _ => CoreValue::I64(value),
    })
}

fn from_text(value: String, ty: &Type) -> Result<CoreValue> {
    fn parse<T>(s: &str, ty: &Type, f: impl FnOnce(&str) -> std::result::Result<T, chrono::ParseError>) -> Result<T> {
        f(s).map_err(|e| Error::parse_with(s, ty.to_string(), e))
    }

    Ok(match ty {
        Type::Date => CoreValue::Date(parse(&value, ty, |s| NaiveDate::parse_from_str(s, DATE))?),
        Type::DateTime | Type::Timestamp => CoreValue::DateTime(parse(&value, ty, |s| {
            NaiveDateTime::parse_from_str(s, DATE_TIME)
        })?),
        Type::Time => CoreValue::Time(parse(&value, ty, |s| NaiveTime::parse_from_str(s, TIME))?),
        Type::Bytes => CoreValue::Bytes(value.into_bytes()),
        Type::String | Type::Other(_) => CoreValue::String(value),
        // Numeric columns only hold text when it was written that way; read it
        // back with the same rules that bind request parameters.
        _ => stmt::convert(ty, &value)?.unwrap_or(CoreValue::Null),
    })
}

impl ToSql for Value {
    fn to_sql(&self) -> rusqlite::Result<ToSqlOutput<'_>> {
        use stmt::Value;

        Ok(match &self.0 {
            Value::Bool(v) => ToSqlOutput::Owned(SqlValue::Integer(i64::from(*v))),
            Value::I32(v) => ToSqlOutput::Owned(SqlValue::Integer(i64::from(*v))),
            Value::I64(v) => ToSqlOutput::Owned(SqlValue::Integer(*v)),
            Value::F32(v) => ToSqlOutput::Owned(SqlValue::Real(f64::from(*v))),
            Value::F64(v) => ToSqlOutput::Owned(SqlValue::Real(*v)),
            Value::Decimal(v) => ToSqlOutput::Owned(SqlValue::Text(v.to_string())),
            Value::BigInt(v) => ToSqlOutput::Owned(SqlValue::Text(v.to_string())),
            Value::String(v) => ToSqlOutput::Borrowed(ValueRef::Text(v.as_bytes())),
            Value::Bytes(v) => ToSqlOutput::Borrowed(ValueRef::Blob(&v[..])),
            Value::Date(v) => ToSqlOutput::Owned(SqlValue::Text(v.format(DATE).to_string())),
            Value::DateTime(v) => {
                ToSqlOutput::Owned(SqlValue::Text(v.format(DATE_TIME).to_string()))
            }
            Value::Time(v) => ToSqlOutput::Owned(SqlValue::Text(v.format(TIME).to_string())),
            Value::Null => ToSqlOutput::Owned(SqlValue::Null),
        })
    }
}
