use dbmap_core::{Driver, GenericSqlWriter};

#[derive(Debug, Clone, Copy, Default)]
pub struct MockDriver {
    pub writer: GenericSqlWriter,
}

impl Driver for MockDriver {
    type SqlWriter = GenericSqlWriter;
    fn sql_writer(&self) -> Self::SqlWriter {
        self.writer
    }
}
