//! Builds entities from textual request parameters.
//!
//! Parameter names map to column names, optionally namespaced as
//! `<prefix>.<column>`. Values go through [`stmt::convert`], so an empty
//! value leaves the attribute unset rather than writing a null.

use crate::{Entity, Error, Result};

use linkrow_core::{
    schema::Table,
    stmt::{self, Type},
    Schema,
};

use indexmap::IndexMap;

/// Request parameters: each name carries one or more textual values, in
/// submission order.
#[derive(Debug, Default, Clone, PartialEq)]
pub struct Params {
    values: IndexMap<String, Vec<String>>,
}

impl Params {
    pub fn new() -> Params {
        Params::default()
    }

    /// Appends `value` to the values submitted under `name`.
    pub fn insert(&mut self, name: impl Into<String>, value: impl Into<String>) -> &mut Self {
        self.values
            .entry(name.into())
            .or_default()
            .push(value.into());
        self
    }

    /// Appends every one of `values` under `name`.
    pub fn insert_all<I, S>(&mut self, name: impl Into<String>, values: I) -> &mut Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.values
            .entry(name.into())
            .or_default()
            .extend(values.into_iter().map(Into::into));
        self
    }

    /// The first value submitted under `name`.
    pub fn get(&self, name: &str) -> Option<&str> {
        self.values.get(name)?.first().map(String::as_str)
    }

    pub fn get_all(&self, name: &str) -> &[String] {
        self.values.get(name).map(Vec::as_slice).unwrap_or_default()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Parameters under `prefix` as `(name, attribute, values)`; all of them
    /// when there is no prefix.
    fn matching<'a>(
        &'a self,
        prefix: Option<&'a str>,
    ) -> impl Iterator<Item = (&'a str, &'a str, &'a [String])> + 'a {
        self.values.iter().filter_map(move |(name, values)| {
            let attr = match prefix {
                Some(prefix) => name.strip_prefix(prefix)?.strip_prefix('.')?,
                None => name.as_str(),
            };
            Some((name.as_str(), attr, values.as_slice()))
        })
    }
}

impl<K: Into<String>, V: Into<String>> FromIterator<(K, V)> for Params {
    fn from_iter<T: IntoIterator<Item = (K, V)>>(iter: T) -> Params {
        let mut params = Params::new();
        for (name, value) in iter {
            params.insert(name, value);
        }
        params
    }
}

/// Builds one `model` entity from the first value of every matching
/// parameter.
///
/// A parameter naming a column the table lacks fails. So does a value that
/// does not convert; the error names the parameter.
pub fn bind(schema: &Schema, model: &str, prefix: Option<&str>, params: &Params) -> Result<Entity> {
    let table = schema.table(model)?;
    let mut entity = Entity::new(model);

    for (name, attr, values) in params.matching(prefix) {
        let ty = column_type(table, model, name, attr)?;

        let Some(raw) = values.first() else {
            continue;
        };

        if let Some(value) = convert(ty, name, raw)? {
            entity.set(attr, value);
        }
    }

    Ok(entity)
}

/// Builds one `model` entity per index of the submitted value arrays.
///
/// The number of entities is the number of values of the first matching
/// parameter. Blank values are skipped whatever the column type. A
/// parameter with fewer values than that fails.
pub fn bind_all(
    schema: &Schema,
    model: &str,
    prefix: Option<&str>,
    params: &Params,
) -> Result<Vec<Entity>> {
    let table = schema.table(model)?;
    let mut entities: Option<Vec<Entity>> = None;

    for (name, attr, values) in params.matching(prefix) {
        let ty = column_type(table, model, name, attr)?;

        let entities =
            entities.get_or_insert_with(|| (0..values.len()).map(|_| Entity::new(model)).collect());

        let expected = entities.len();
        for (index, entity) in entities.iter_mut().enumerate() {
            let Some(raw) = values.get(index) else {
                return Err(linkrow_core::err!(
                    "expected {expected} values, found {}",
                    values.len()
                )
                .context(Error::invalid_parameter(name)));
            };

            if raw.trim().is_empty() {
                continue;
            }

            if let Some(value) = convert(ty, name, raw)? {
                entity.set(attr, value);
            }
        }
    }

    Ok(entities.unwrap_or_default())
}

fn column_type<'a>(table: &'a Table, model: &str, name: &str, attr: &str) -> Result<&'a Type> {
    table.column_type(attr).ok_or_else(|| {
        Error::usage(format!("`{model}` has no attribute `{attr}`"))
            .context(Error::invalid_parameter(name))
    })
}

fn convert(ty: &Type, name: &str, raw: &str) -> Result<Option<stmt::Value>> {
    stmt::convert(ty, raw).map_err(|err| err.context(Error::invalid_parameter(name)))
}
