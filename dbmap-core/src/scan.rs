use crate::{
    Destination, Discard, Holder, MappingError, Record, Result, RowLabeled, ValueSink,
    stream::{Stream, TryStreamExt},
};
use std::{
    iter::zip,
    pin::{Pin, pin},
};

/// Fill `holder` with the rows produced by `rows`.
///
/// The shape of the holder is decided once through [`Holder::destination`]:
/// - a value holder accepts at most one row of at most one column;
/// - a record holder accepts at most one row, its columns are matched to the
///   fields case insensitively, unmatched columns are discarded;
/// - a sequence holder appends one fresh element per row, in row order. If the
///   call fails the elements appended so far are removed.
///
/// The stream is owned by this function and dropped before returning, on every
/// path, which releases the cursor it wraps.
pub async fn scan<S, H>(rows: S, holder: &mut H) -> Result<()>
where
    S: Stream<Item = Result<RowLabeled>>,
    H: Holder + ?Sized,
{
    let mut rows = pin!(rows);
    let mut destination = holder.destination();
    let initial = match &destination {
        Destination::Sequence(sequence) => sequence.len(),
        _ => 0,
    };
    let result = fill(rows.as_mut(), &mut destination).await;
    if result.is_err() {
        if let Destination::Sequence(sequence) = &mut destination {
            sequence.truncate(initial);
        }
    }
    result
}

async fn fill<S>(mut rows: Pin<&mut S>, destination: &mut Destination<'_>) -> Result<()>
where
    S: Stream<Item = Result<RowLabeled>>,
{
    let mut count = 0;
    while let Some(row) = rows.try_next().await? {
        match &mut *destination {
            Destination::Sequence(sequence) => sequence.append_row(row)?,
            single => {
                if count > 0 {
                    log::warn!(
                        "A {} holder received more than one row, a LIMIT is likely missing",
                        single.kind()
                    );
                    return Err(MappingError::TooManyRows.into());
                }
                scan_single(single, row)?;
            }
        }
        count += 1;
    }
    Ok(())
}

/// Scan one row into a value or record destination.
pub fn scan_single(destination: &mut Destination<'_>, row: RowLabeled) -> Result<()> {
    match destination {
        Destination::Value(sink) => scan_value(&mut **sink, row),
        Destination::Record(record) => scan_record(&mut **record, row),
        Destination::Sequence(..) => Err(MappingError::NestedSequence.into()),
    }
}

pub fn scan_value(sink: &mut dyn ValueSink, row: RowLabeled) -> Result<()> {
    let found = row.values.len();
    if found > 1 {
        return Err(MappingError::TooManyColumns { expected: 1, found }.into());
    }
    let label = row.labels.first().cloned().unwrap_or_default();
    if let Some(value) = row.values.into_vec().pop() {
        sink.accept(value)
            .map_err(|e| MappingError::scan(label, e))?;
    }
    Ok(())
}

pub fn scan_record(record: &mut dyn Record, row: RowLabeled) -> Result<()> {
    let def = record.def();
    for (label, value) in zip(row.labels.iter(), row.values.into_vec()) {
        match def.find_column(label) {
            Some((index, ..)) => record
                .set_field(index, value)
                .map_err(|e| MappingError::scan(label.as_str(), e))?,
            None => {
                log::trace!("Column `{label}` has no field in `{}`, discarded", def.name);
                Discard.accept(value)?;
            }
        }
    }
    Ok(())
}
