use super::{
    value::{DATE_PATTERN, DATE_TIME_PATTERN, TIME_PATTERN},
    Type, Value,
};
use crate::{Error, Result};

use bigdecimal::BigDecimal;
use chrono::{NaiveDate, NaiveDateTime, NaiveTime};
use num_bigint::BigInt;
use std::str::FromStr;

/// Length of a rendered `yyyy-MM-dd HH:mm:ss` value.
///
/// Date-like inputs at least this long are parsed with the date-time pattern,
/// shorter ones with the date-only pattern. The choice is made on length alone.
pub const DATE_TIME_LEN: usize = 19;

/// Converts one submitted textual value into a value of type `ty`.
///
/// `Ok(None)` means "no value": the attribute must be left unset. This is the
/// result for an empty string of any type, and for a blank (whitespace-only)
/// string of any non-text type. Text passes through untrimmed.
pub fn convert(ty: &Type, raw: &str) -> Result<Option<Value>> {
    let s = raw.trim();

    let value = match ty {
        // An empty form field means the user entered nothing.
        Type::String if raw.is_empty() => return Ok(None),
        Type::String => Value::String(raw.to_string()),
        _ if s.is_empty() => return Ok(None),
        Type::I32 => Value::I32(parse_num(s, ty)?),
        Type::I64 => Value::I64(parse_num(s, ty)?),
        Type::F64 => Value::F64(parse_num(s, ty)?),
        Type::F32 => Value::F32(parse_num(s, ty)?),
        Type::Decimal => Value::Decimal(parse_num::<BigDecimal>(s, ty)?),
        Type::BigInt => Value::BigInt(parse_num::<BigInt>(s, ty)?),
        Type::Bool => Value::Bool(parse_bool(s)?),
        Type::Date => Value::Date(if s.len() >= DATE_TIME_LEN {
            parse_date_time_prefix(s, ty)?.date()
        } else {
            parse_date_prefix(s, ty)?
        }),
        Type::DateTime => Value::DateTime(if s.len() >= DATE_TIME_LEN {
            parse_date_time_prefix(s, ty)?
        } else {
            midnight(parse_date_prefix(s, ty)?)
        }),
        Type::Timestamp => Value::DateTime(if s.len() >= DATE_TIME_LEN {
            NaiveDateTime::parse_from_str(s, "%Y-%m-%d %H:%M:%S%.f")
                .map_err(|e| Error::parse_with(s, ty.to_string(), e))?
        } else {
            midnight(parse_date_prefix(s, ty)?)
        }),
        Type::Time => Value::Time(
            NaiveTime::parse_from_str(s, TIME_PATTERN)
                .map_err(|e| Error::parse_with(s, ty.to_string(), e))?,
        ),
        Type::Bytes => Value::Bytes(s.as_bytes().to_vec()),
        Type::Other(name) => return Err(Error::unsupported_type(name.as_ref())),
    };

    Ok(Some(value))
}

fn parse_num<T>(s: &str, ty: &Type) -> Result<T>
where
    T: FromStr,
    T::Err: std::fmt::Display,
{
    s.parse::<T>()
        .map_err(|e| Error::parse_with(s, ty.to_string(), e))
}

fn parse_bool(s: &str) -> Result<bool> {
    match s.to_ascii_lowercase().as_str() {
        "1" | "true" => Ok(true),
        "0" | "false" => Ok(false),
        _ => Err(Error::parse(s, "Bool")),
    }
}

// Pattern parsing accepts trailing text after a complete match.
fn parse_date_time_prefix(s: &str, ty: &Type) -> Result<NaiveDateTime> {
    NaiveDateTime::parse_and_remainder(s, DATE_TIME_PATTERN)
        .map(|(dt, _)| dt)
        .map_err(|e| Error::parse_with(s, ty.to_string(), e))
}

fn parse_date_prefix(s: &str, ty: &Type) -> Result<NaiveDate> {
    NaiveDate::parse_and_remainder(s, DATE_PATTERN)
        .map(|(date, _)| date)
        .map_err(|e| Error::parse_with(s, ty.to_string(), e))
}

fn midnight(date: NaiveDate) -> NaiveDateTime {
    date.and_time(NaiveTime::MIN)
}
