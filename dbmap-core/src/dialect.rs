use crate::{Context, Error, Result, placeholder_positions};
use std::{
    borrow::Cow,
    fmt::{self, Display, Write},
    str::FromStr,
};
use url::Url;

/// Bind parameter syntax of a store.
///
/// Queries are always authored with `?` markers, they are rewritten into the
/// target syntax right before execution.
#[derive(Default, Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Dialect {
    /// `?`, left unchanged (MySQL and MariaDB).
    ///
    /// The generic writer adds `LIMIT 1` to UPDATE and DELETE in this dialect,
    /// stores using `?` without that clause (SQLite, DuckDB) need their own writer.
    #[default]
    Native,
    /// `$1`, `$2`, ... (PostgreSQL).
    DollarNumbered,
    /// `:1`, `:2`, ... (Oracle).
    ColonNumbered,
}

impl Dialect {
    /// Dialect of a driver, by its registered name.
    ///
    /// Unknown names fall back to [`Dialect::Native`].
    pub fn from_driver_name(name: &str) -> Self {
        match name.to_ascii_lowercase().as_str() {
            "postgres" | "postgresql" | "pgx" => Dialect::DollarNumbered,
            "oracle" | "goracle" | "godror" => Dialect::ColonNumbered,
            _ => Dialect::Native,
        }
    }

    /// Dialect of a connection url, by its scheme.
    pub fn from_url(url: &str) -> Result<Self> {
        let url = Url::parse(url).with_context(|| format!("Invalid connection url `{url}`"))?;
        Ok(Self::from_driver_name(url.scheme()))
    }

    fn prefix(&self) -> Option<char> {
        match self {
            Dialect::Native => None,
            Dialect::DollarNumbered => Some('$'),
            Dialect::ColonNumbered => Some(':'),
        }
    }

    /// Rewrite the `?` markers of `sql` into this dialect, numbering them from 1
    /// left to right. Markers inside quoted literals are not touched.
    pub fn translate<'s>(&self, sql: &'s str) -> Cow<'s, str> {
        let Some(prefix) = self.prefix() else {
            return Cow::Borrowed(sql);
        };
        let mut positions = placeholder_positions(sql).peekable();
        if positions.peek().is_none() {
            return Cow::Borrowed(sql);
        }
        let mut out = String::with_capacity(sql.len() + 16);
        let mut last = 0;
        for (i, position) in positions.enumerate() {
            out.push_str(&sql[last..position]);
            let _ = write!(out, "{prefix}{}", i + 1);
            last = position + 1;
        }
        out.push_str(&sql[last..]);
        Cow::Owned(out)
    }
}

impl Display for Dialect {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Dialect::Native => "native",
            Dialect::DollarNumbered => "dollar",
            Dialect::ColonNumbered => "colon",
        })
    }
}

impl FromStr for Dialect {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_ascii_lowercase().as_str() {
            "native" | "?" => Ok(Dialect::Native),
            "dollar" | "$" => Ok(Dialect::DollarNumbered),
            "colon" | ":" => Ok(Dialect::ColonNumbered),
            _ => Err(anyhow::anyhow!(
                "Unknown dialect `{s}`, expected `native`, `dollar` or `colon`"
            )),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn numbered_markers() {
        let sql = "SELECT * FROM t WHERE id = ? AND ee = ?";
        assert_eq!(
            Dialect::DollarNumbered.translate(sql),
            "SELECT * FROM t WHERE id = $1 AND ee = $2"
        );
        assert_eq!(
            Dialect::ColonNumbered.translate(sql),
            "SELECT * FROM t WHERE id = :1 AND ee = :2"
        );
        assert!(matches!(Dialect::Native.translate(sql), Cow::Borrowed(v) if v == sql));
    }

    #[test]
    fn quoted_markers_are_literal() {
        assert_eq!(
            Dialect::DollarNumbered.translate("SELECT '?', \"a?\" FROM t WHERE a = ?"),
            "SELECT '?', \"a?\" FROM t WHERE a = $1"
        );
        assert_eq!(
            Dialect::ColonNumbered.translate("SELECT 'it''s?' WHERE b = ?"),
            "SELECT 'it''s?' WHERE b = :1"
        );
        assert_eq!(
            Dialect::DollarNumbered.translate(r"SELECT 'a\'b ?' , ?"),
            r"SELECT 'a\'b ?' , $1"
        );
        assert_eq!(
            Dialect::ColonNumbered.translate(r#"SELECT "a\"?", 'c:\\' FROM t WHERE d = ?"#),
            r#"SELECT "a\"?", 'c:\\' FROM t WHERE d = :1"#
        );
    }

    #[test]
    fn no_markers_is_unchanged() {
        for dialect in [Dialect::DollarNumbered, Dialect::ColonNumbered] {
            let sql = "SELECT '$1', ':1' FROM t";
            let translated = dialect.translate(sql);
            assert!(matches!(translated, Cow::Borrowed(v) if v == sql));
            assert_eq!(dialect.translate(&translated), sql);
        }
    }

    #[test]
    fn driver_names() {
        assert_eq!(Dialect::from_driver_name("postgres"), Dialect::DollarNumbered);
        assert_eq!(Dialect::from_driver_name("pgx"), Dialect::DollarNumbered);
        assert_eq!(Dialect::from_driver_name("godror"), Dialect::ColonNumbered);
        assert_eq!(Dialect::from_driver_name("mysql"), Dialect::Native);
        assert_eq!(Dialect::from_driver_name(""), Dialect::Native);
        assert_eq!(
            Dialect::from_url("postgresql://user@localhost/db").unwrap(),
            Dialect::DollarNumbered
        );
        assert!(Dialect::from_url("not a url").is_err());
    }

    #[test]
    fn names_round_trip() {
        for dialect in [
            Dialect::Native,
            Dialect::DollarNumbered,
            Dialect::ColonNumbered,
        ] {
            assert_eq!(dialect.to_string().parse::<Dialect>().unwrap(), dialect);
        }
        assert!("sqlserver".parse::<Dialect>().is_err());
    }
}
