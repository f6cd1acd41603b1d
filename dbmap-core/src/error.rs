use std::error::Error as StdError;
use thiserror::Error as ThisError;

/// Failures raised by the mapping engine itself.
///
/// They are returned as the root of an [`anyhow::Error`](crate::Error), use
/// `error.downcast_ref::<MappingError>()` to inspect them. Errors coming from
/// the executor (statement execution or query failures) are passed through
/// unchanged and never appear here.
#[derive(Debug, ThisError)]
pub enum MappingError {
    /// Decomposition attempted on a value that is not a record.
    #[error("`{0}` is not a record and cannot be mapped to columns")]
    NotAStruct(&'static str),

    /// Update or delete on a record without a usable primary key.
    #[error("record `{record}` has an invalid primary key: {reason}")]
    InvalidPrimaryKey {
        record: &'static str,
        reason: &'static str,
    },

    /// A scalar holder received a row with more than one column.
    #[error("too many columns: the holder binds {expected} but the row has {found}")]
    TooManyColumns { expected: usize, found: usize },

    /// A single row holder received more than one row.
    #[error("too many rows: the holder is not a sequence, add a LIMIT to the query")]
    TooManyRows,

    /// A cell could not be converted or decoded into its destination.
    #[error("cannot scan column `{column}`: {source}")]
    ScanFailure {
        column: String,
        #[source]
        source: Box<dyn StdError + Send + Sync>,
    },

    /// Placeholder markers and arguments cannot be paired.
    #[error("the query has {markers} placeholders but {arguments} arguments were provided")]
    ArgumentCount { markers: usize, arguments: usize },

    /// More than one field of a record declares itself primary key.
    #[error("record `{record}` declares both `{first}` and `{second}` as primary key")]
    DuplicatePrimaryKey {
        record: &'static str,
        first: &'static str,
        second: &'static str,
    },

    /// Column tag option not understood.
    #[error("unknown option `{0}` in column tag, expected `pk` or `json`")]
    UnknownTagOption(String),

    /// Update on a record whose only column is the primary key.
    #[error("record `{0}` has no column to update besides the primary key")]
    NoColumns(&'static str),

    /// The store did not report the generated primary key after an insert.
    #[error("the store did not return a generated key for `{record}`.`{column}`")]
    MissingGeneratedKey {
        record: &'static str,
        column: &'static str,
    },

    /// Field index outside the descriptor, or pointing to an excluded field.
    #[error("record `{record}` has no mapped field at index {index}")]
    UnknownField { record: &'static str, index: usize },

    /// Sequence holders cannot contain other sequences.
    #[error("a sequence holder cannot contain another sequence")]
    NestedSequence,
}

impl MappingError {
    pub fn scan(column: impl Into<String>, source: crate::Error) -> Self {
        MappingError::ScanFailure {
            column: column.into(),
            source: source.into(),
        }
    }
}
