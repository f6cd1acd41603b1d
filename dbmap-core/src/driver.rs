use crate::{Dialect, SqlWriter};

/// Static description of a store backend.
pub trait Driver: Send + Sync {
    type SqlWriter: SqlWriter;

    fn sql_writer(&self) -> Self::SqlWriter;

    fn dialect(&self) -> Dialect {
        self.sql_writer().dialect()
    }
}
