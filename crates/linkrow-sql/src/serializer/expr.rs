use super::{Delimited, Formatter, Ident, Params, ToSql};

use linkrow_core::stmt::{ColumnRef, Expr};

/// ` WHERE a AND b`, or nothing for an empty filter
pub(super) struct Filter<'a>(pub(super) &'a [Expr]);

impl ToSql for &ColumnRef {
    fn to_sql<P: Params>(self, f: &mut Formatter<'_, P>) {
        if let Some(table) = &self.table {
            fmt!(f, Ident(table) ".");
        }
        fmt!(f, Ident(&self.name));
    }
}

impl ToSql for &Expr {
    fn to_sql<P: Params>(self, f: &mut Formatter<'_, P>) {
        match self {
            Expr::True => fmt!(f, "1 = 1"),
            Expr::Eq(column, value) if value.is_null() => fmt!(f, column " IS NULL"),
            Expr::Eq(column, value) => fmt!(f, column " = " value),
            Expr::ColumnEq(lhs, rhs) => fmt!(f, lhs " = " rhs),
        }
    }
}

impl ToSql for Filter<'_> {
    fn to_sql<P: Params>(self, f: &mut Formatter<'_, P>) {
        if !self.0.is_empty() {
            fmt!(f, " WHERE " Delimited(self.0, " AND "));
        }
    }
}
