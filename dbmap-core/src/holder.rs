use crate::{AsValue, Record, Result, RowLabeled, Value, scan_single};
use rust_decimal::Decimal;
use time::{Date, OffsetDateTime, PrimitiveDateTime, Time};
use uuid::Uuid;

/// Receives a single cell.
pub trait ValueSink: Send {
    fn accept(&mut self, value: Value) -> Result<()>;
}

impl<T: AsValue + Send> ValueSink for T {
    fn accept(&mut self, value: Value) -> Result<()> {
        *self = T::try_from_value(value)?;
        Ok(())
    }
}

impl ValueSink for Value {
    fn accept(&mut self, value: Value) -> Result<()> {
        *self = value;
        Ok(())
    }
}

/// Sink for result columns that have no destination: the value is read and dropped.
#[derive(Default, Debug, Clone, Copy)]
pub struct Discard;

impl ValueSink for Discard {
    fn accept(&mut self, _value: Value) -> Result<()> {
        Ok(())
    }
}

/// Growable sequence of holders, each row becomes a new element.
pub trait Appender: Send {
    fn len(&self) -> usize;
    fn append_row(&mut self, row: RowLabeled) -> Result<()>;
    /// Drop the elements past `len`.
    fn truncate(&mut self, len: usize);
}

impl<T: Holder + Default> Appender for Vec<T> {
    fn len(&self) -> usize {
        Vec::len(self)
    }
    fn append_row(&mut self, row: RowLabeled) -> Result<()> {
        let mut item = T::default();
        scan_single(&mut item.destination(), row)?;
        self.push(item);
        Ok(())
    }
    fn truncate(&mut self, len: usize) {
        Vec::truncate(self, len);
    }
}

/// Shape of a SELECT destination, decided by the holder type.
pub enum Destination<'a> {
    /// At most one row of at most one column.
    Value(&'a mut dyn ValueSink),
    /// At most one row, columns matched to fields by name.
    Record(&'a mut dyn Record),
    /// Any number of rows, appended in order.
    Sequence(&'a mut dyn Appender),
}

impl Destination<'_> {
    pub fn kind(&self) -> &'static str {
        match self {
            Destination::Value(..) => "value",
            Destination::Record(..) => "record",
            Destination::Sequence(..) => "sequence",
        }
    }
}

/// Caller supplied destination of a query result.
///
/// Implemented for the scalar types, `Option<T>`, [`Value`], `Vec<T>` of any
/// holder with a default, and by `#[derive(Record)]`. A custom type decoded
/// from a single cell implements [`AsValue`] and returns
/// `Destination::Value(self)`.
pub trait Holder: Send {
    fn destination(&mut self) -> Destination<'_>;
    /// Read access to the record, `None` for holders that are not records.
    fn as_record(&self) -> Option<&dyn Record> {
        None
    }
}

macro_rules! impl_holder_value {
    ($($source:ty),+ $(,)?) => {
        $(
            impl Holder for $source {
                fn destination(&mut self) -> Destination<'_> {
                    Destination::Value(self)
                }
            }
        )+
    };
}

impl_holder_value!(
    bool,
    i8,
    i16,
    i32,
    i64,
    u8,
    u16,
    u32,
    u64,
    f32,
    f64,
    String,
    Box<[u8]>,
    Decimal,
    Date,
    Time,
    PrimitiveDateTime,
    OffsetDateTime,
    Uuid,
    Value,
    Discard,
);

impl<T: AsValue + Send> Holder for Option<T> {
    fn destination(&mut self) -> Destination<'_> {
        Destination::Value(self)
    }
}

impl<T: Holder + Default> Holder for Vec<T> {
    fn destination(&mut self) -> Destination<'_> {
        Destination::Sequence(self)
    }
}
