use crate::{Holder, MappingError, Record, Result, Value};
use std::any::type_name;

/// Primary key of a decomposed record.
#[derive(Debug, Clone, PartialEq)]
pub struct PrimaryKeyPart {
    /// Field index, used with [`Record::set_field`] to write back a generated key.
    pub index: usize,
    pub column: &'static str,
    pub value: Value,
}

/// Columns and values of a record, in field declaration order.
///
/// The primary key is kept apart from `columns` and `values`.
#[derive(Default, Debug, Clone, PartialEq)]
pub struct Decomposition {
    pub columns: Vec<&'static str>,
    pub values: Vec<Value>,
    pub primary_key: Option<PrimaryKeyPart>,
}

/// Split a record holder into its columns and values.
///
/// Fails with [`MappingError::NotAStruct`] when the holder is not a record.
pub fn decompose<H: Holder + ?Sized>(holder: &H) -> Result<Decomposition> {
    match holder.as_record() {
        Some(record) => decompose_record(record),
        None => Err(MappingError::NotAStruct(type_name::<H>()).into()),
    }
}

pub fn decompose_record(record: &dyn Record) -> Result<Decomposition> {
    let def = record.def();
    let mut result = Decomposition::default();
    for (index, field) in def.mapped_fields() {
        let value = record.get_field(index)?;
        if field.primary_key {
            result.primary_key = Some(PrimaryKeyPart {
                index,
                column: field.column,
                value,
            });
        } else {
            result.columns.push(field.column);
            result.values.push(value);
        }
    }
    Ok(result)
}
