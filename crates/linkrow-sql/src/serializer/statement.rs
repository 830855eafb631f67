use super::{expr::Filter, Comma, Formatter, Ident, Params, ToSql};

use linkrow_core::stmt::{self, Clause, Returning, Statement};

impl ToSql for &Statement {
    fn to_sql<P: Params>(self, f: &mut Formatter<'_, P>) {
        match self {
            Statement::Query(stmt) => stmt.to_sql(f),
            Statement::Insert(stmt) => stmt.to_sql(f),
            Statement::Update(stmt) => stmt.to_sql(f),
            Statement::Delete(stmt) => stmt.to_sql(f),
        }
    }
}

impl ToSql for &stmt::Select {
    fn to_sql<P: Params>(self, f: &mut Formatter<'_, P>) {
        let returning = &self.returning;
        let source = &self.source;
        fmt!(f, "SELECT " returning " FROM " source Filter(&self.filter));

        for clause in &self.tail {
            clause.to_sql(f);
        }

        if let Some(limit) = self.limit {
            if f.serializer.is_mysql() {
                fmt!(f, " LIMIT " limit.offset ", " limit.count);
            } else {
                fmt!(f, " LIMIT " limit.count " OFFSET " limit.offset);
            }
        }
    }
}

impl ToSql for &Returning {
    fn to_sql<P: Params>(self, f: &mut Formatter<'_, P>) {
        match self {
            Returning::Columns(columns) => fmt!(f, Comma(columns)),
            Returning::Count => fmt!(f, "count(*)"),
        }
    }
}

impl ToSql for &stmt::Source {
    fn to_sql<P: Params>(self, f: &mut Formatter<'_, P>) {
        fmt!(f, Ident(&self.table));

        if let Some(alias) = &self.alias {
            fmt!(f, " " Ident(alias));
        }

        for join in &self.joins {
            fmt!(f, " LEFT JOIN " Ident(&join.table));
            if let Some(alias) = &join.alias {
                fmt!(f, " " Ident(alias));
            }
            let on = &join.on;
            fmt!(f, " ON " on);
        }
    }
}

// Raw fragments are written verbatim
impl ToSql for &Clause {
    fn to_sql<P: Params>(self, f: &mut Formatter<'_, P>) {
        match self {
            Clause::GroupBy(sql) => fmt!(f, " GROUP BY " sql),
            Clause::Having(sql) => fmt!(f, " HAVING " sql),
            Clause::OrderBy(sql) => fmt!(f, " ORDER BY " sql),
            Clause::Asc => fmt!(f, " ASC"),
            Clause::Desc => fmt!(f, " DESC"),
        }
    }
}

impl ToSql for &stmt::Insert {
    fn to_sql<P: Params>(self, f: &mut Formatter<'_, P>) {
        fmt!(f, "INSERT INTO " Ident(&self.table));

        if self.columns.is_empty() {
            if f.serializer.is_mysql() {
                fmt!(f, " () VALUES ()");
            } else {
                fmt!(f, " DEFAULT VALUES");
            }
        } else {
            let columns = Comma(self.columns.iter().map(Ident));
            let rows = Comma(self.rows.iter().map(|row| Row(row)));
            fmt!(f, " (" columns ") VALUES " rows);
        }

        // MySQL has no RETURNING; the driver reads the generated key back
        // with LAST_INSERT_ID().
        if let Some(returning) = &self.returning {
            if !f.serializer.is_mysql() {
                fmt!(f, " RETURNING " Comma(returning.iter().map(Ident)));
            }
        }
    }
}

struct Row<'a>(&'a [stmt::Value]);

impl ToSql for Row<'_> {
    fn to_sql<P: Params>(self, f: &mut Formatter<'_, P>) {
        fmt!(f, "(" Comma(self.0) ")");
    }
}

struct Assignment<'a>(&'a str, &'a stmt::Value);

impl ToSql for Assignment<'_> {
    fn to_sql<P: Params>(self, f: &mut Formatter<'_, P>) {
        fmt!(f, Ident(self.0) " = " self.1);
    }
}

impl ToSql for &stmt::Update {
    fn to_sql<P: Params>(self, f: &mut Formatter<'_, P>) {
        let assignments = Comma(
            self.assignments
                .iter()
                .map(|(column, value)| Assignment(column, value)),
        );

        fmt!(f, "UPDATE " Ident(&self.table) " SET " assignments Filter(&self.filter));
    }
}

impl ToSql for &stmt::Delete {
    fn to_sql<P: Params>(self, f: &mut Formatter<'_, P>) {
        fmt!(f, "DELETE FROM " Ident(&self.table) Filter(&self.filter));
    }
}
