use crate::{Dialect, PLACEHOLDER, separated_by};

/// How the primary key produced by the store during an insert is obtained.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GeneratedKey {
    /// Read from [`RowsAffected::last_affected_id`](crate::RowsAffected).
    LastInsertId,
    /// Appended as `RETURNING <pk>` and read from the first cell of the returned row.
    Returning,
    /// Nothing is generated, the key is always supplied by the caller.
    None,
}

impl GeneratedKey {
    pub fn for_dialect(dialect: Dialect) -> Self {
        match dialect {
            Dialect::Native => GeneratedKey::LastInsertId,
            Dialect::DollarNumbered => GeneratedKey::Returning,
            Dialect::ColonNumbered => GeneratedKey::None,
        }
    }
}

/// Renders the statements of the CRUD operations.
///
/// Values are always bound as `?` markers, the text is translated to the
/// dialect syntax afterwards. The table name is written as given so callers
/// can qualify it with a schema.
pub trait SqlWriter: Send + Sync {
    fn dialect(&self) -> Dialect;

    fn generated_key(&self) -> GeneratedKey {
        GeneratedKey::for_dialect(self.dialect())
    }

    fn write_escaped(&self, out: &mut String, value: &str, search: char, replace: &str) {
        let mut position = 0;
        for (i, c) in value.char_indices() {
            if c == search {
                out.push_str(&value[position..i]);
                out.push_str(replace);
                position = i + c.len_utf8();
            }
        }
        out.push_str(&value[position..]);
    }

    fn write_identifier_quoted(&self, out: &mut String, value: &str) {
        match self.dialect() {
            Dialect::Native => {
                out.push('`');
                self.write_escaped(out, value, '`', "``");
                out.push('`');
            }
            _ => {
                out.push('"');
                self.write_escaped(out, value, '"', r#""""#);
                out.push('"');
            }
        }
    }

    /// Clause restricting UPDATE and DELETE to one row, only written for
    /// [`Dialect::Native`]. Override it for `?` stores rejecting `UPDATE .. LIMIT`.
    fn write_limit_single(&self, out: &mut String) {
        if self.dialect() == Dialect::Native {
            out.push_str(" LIMIT 1");
        }
    }

    fn write_insert(
        &self,
        out: &mut String,
        table: &str,
        columns: &[&str],
        returning: Option<&str>,
    ) {
        out.push_str("INSERT INTO ");
        out.push_str(table);
        if columns.is_empty() && self.dialect() != Dialect::Native {
            out.push_str(" DEFAULT VALUES");
            self.write_returning(out, returning);
            return;
        }
        out.push_str(" (");
        separated_by(
            out,
            columns,
            |out, v| self.write_identifier_quoted(out, v),
            ", ",
        );
        out.push_str(") VALUES (");
        separated_by(out, columns, |out, _| out.push(PLACEHOLDER), ", ");
        out.push(')');
        self.write_returning(out, returning);
    }

    fn write_returning(&self, out: &mut String, returning: Option<&str>) {
        if let Some(returning) = returning {
            out.push_str(" RETURNING ");
            self.write_identifier_quoted(out, returning);
        }
    }

    fn write_update(&self, out: &mut String, table: &str, columns: &[&str], primary_key: &str) {
        out.push_str("UPDATE ");
        out.push_str(table);
        out.push_str(" SET ");
        separated_by(
            out,
            columns,
            |out, v| {
                self.write_identifier_quoted(out, v);
                out.push_str(" = ");
                out.push(PLACEHOLDER);
            },
            ", ",
        );
        self.write_key_condition(out, primary_key);
        self.write_limit_single(out);
    }

    fn write_delete(&self, out: &mut String, table: &str, primary_key: &str) {
        out.push_str("DELETE FROM ");
        out.push_str(table);
        self.write_key_condition(out, primary_key);
        self.write_limit_single(out);
    }

    fn write_key_condition(&self, out: &mut String, primary_key: &str) {
        out.push_str(" WHERE ");
        self.write_identifier_quoted(out, primary_key);
        out.push_str(" = ");
        out.push(PLACEHOLDER);
    }
}

/// Writer parametrized by the dialect, enough for most drivers.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GenericSqlWriter {
    pub dialect: Dialect,
    pub generated_key: GeneratedKey,
}

impl GenericSqlWriter {
    pub fn new(dialect: Dialect) -> Self {
        Self {
            dialect,
            generated_key: GeneratedKey::for_dialect(dialect),
        }
    }
    pub fn with_generated_key(mut self, generated_key: GeneratedKey) -> Self {
        self.generated_key = generated_key;
        self
    }
}

impl Default for GenericSqlWriter {
    fn default() -> Self {
        Self::new(Dialect::default())
    }
}

impl SqlWriter for GenericSqlWriter {
    fn dialect(&self) -> Dialect {
        self.dialect
    }
    fn generated_key(&self) -> GeneratedKey {
        self.generated_key
    }
}
