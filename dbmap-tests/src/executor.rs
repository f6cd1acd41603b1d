use crate::{MockDriver, TrackedCursor};
use dbmap_core::{
    Dialect, Error, Executor, GenericSqlWriter, Query, QueryResult, Result, Row, RowLabeled,
    RowNames, RowsAffected, Value,
    stream::{self, Stream},
};
use std::{
    collections::VecDeque,
    sync::{
        Arc,
        atomic::{AtomicUsize, Ordering},
    },
};

/// Scripted outcome of the next statement.
#[derive(Debug, Clone)]
pub enum Response {
    Rows { labels: RowNames, rows: Vec<Row> },
    Affected(RowsAffected),
    /// The statement fails with this message.
    Error(String),
}

impl Response {
    pub fn rows<const N: usize>(labels: [&str; N], rows: Vec<[Value; N]>) -> Self {
        Response::Rows {
            labels: labels.iter().map(|v| v.to_string()).collect(),
            rows: rows.into_iter().map(Row::from).collect(),
        }
    }

    pub fn affected(rows_affected: u64, last_affected_id: Option<i64>) -> Self {
        Response::Affected(RowsAffected {
            rows_affected,
            last_affected_id,
        })
    }
}

/// In-memory executor replaying scripted responses in order.
///
/// Every statement it receives is recorded in `queries`. When the script is
/// exhausted a statement affects zero rows.
#[derive(Debug, Default)]
pub struct MockExecutor {
    pub driver: MockDriver,
    pub responses: VecDeque<Response>,
    pub queries: Vec<Query>,
    open_cursors: Arc<AtomicUsize>,
}

impl MockExecutor {
    pub fn new(dialect: Dialect) -> Self {
        Self::with_writer(GenericSqlWriter::new(dialect))
    }

    pub fn with_writer(writer: GenericSqlWriter) -> Self {
        Self {
            driver: MockDriver { writer },
            ..Default::default()
        }
    }

    pub fn respond(&mut self, response: Response) -> &mut Self {
        self.responses.push_back(response);
        self
    }

    pub fn last_query(&self) -> Option<&Query> {
        self.queries.last()
    }

    /// Streams returned by `run` and not dropped yet.
    pub fn open_cursors(&self) -> usize {
        self.open_cursors.load(Ordering::SeqCst)
    }
}

impl Executor for MockExecutor {
    type Driver = MockDriver;

    fn driver(&self) -> &Self::Driver {
        &self.driver
    }

    fn run(&mut self, query: Query) -> impl Stream<Item = Result<QueryResult>> + Send {
        log::trace!("Mock executor received {query}");
        self.queries.push(query);
        let items: Vec<Result<QueryResult>> = match self.responses.pop_front() {
            Some(Response::Rows { labels, rows }) => rows
                .into_iter()
                .map(|v| Ok(RowLabeled::new(labels.clone(), v).into()))
                .collect(),
            Some(Response::Affected(v)) => vec![Ok(v.into())],
            Some(Response::Error(message)) => vec![Err(Error::msg(message))],
            None => vec![Ok(RowsAffected::default().into())],
        };
        TrackedCursor::new(stream::iter(items), self.open_cursors.clone())
    }
}
