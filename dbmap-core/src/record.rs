use crate::{Error, MappingError, Result, Value};
use std::borrow::Cow;

/// Descriptor of one field of a record type.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FieldDef {
    /// Rust field name.
    pub name: &'static str,
    /// Column name, equal to `name` unless overridden by the tag.
    pub column: &'static str,
    /// Never read nor written by the mapper.
    pub excluded: bool,
    pub primary_key: bool,
    /// Stored as JSON text in a single column.
    pub json: bool,
}

impl FieldDef {
    pub const fn new(name: &'static str) -> Self {
        Self {
            name,
            column: name,
            excluded: false,
            primary_key: false,
            json: false,
        }
    }
    pub const fn column(mut self, column: &'static str) -> Self {
        self.column = column;
        self
    }
    pub const fn primary_key(mut self) -> Self {
        self.primary_key = true;
        self
    }
    pub const fn json(mut self) -> Self {
        self.json = true;
        self
    }
    pub const fn excluded(mut self) -> Self {
        self.excluded = true;
        self
    }

    /// Case insensitive comparison with a result column label.
    pub fn matches(&self, label: &str) -> bool {
        self.column.eq_ignore_ascii_case(label)
            || self
                .column
                .chars()
                .flat_map(char::to_lowercase)
                .eq(label.chars().flat_map(char::to_lowercase))
    }
}

/// Field descriptor table of a record type.
///
/// The derive macro emits it as a `static`, so it is built once per type and
/// never inspected through reflection. Hand written records can register one
/// with [`RecordDef::new`], which validates the primary key declaration.
#[derive(Debug, Clone)]
pub struct RecordDef {
    /// Rust type name.
    pub name: &'static str,
    /// Default table name.
    pub table: &'static str,
    /// Fields in declaration order, excluded ones included.
    pub fields: Cow<'static, [FieldDef]>,
    /// Index of the primary key inside `fields`.
    pub primary_key: Option<usize>,
}

impl RecordDef {
    pub fn new(
        name: &'static str,
        table: &'static str,
        fields: impl Into<Cow<'static, [FieldDef]>>,
    ) -> Result<Self> {
        let fields = fields.into();
        let mut primary_key: Option<usize> = None;
        for (i, field) in fields.iter().enumerate() {
            if !field.primary_key || field.excluded {
                continue;
            }
            if let Some(first) = primary_key {
                return Err(MappingError::DuplicatePrimaryKey {
                    record: name,
                    first: fields[first].name,
                    second: field.name,
                }
                .into());
            }
            primary_key = Some(i);
        }
        Ok(Self {
            name,
            table,
            fields,
            primary_key,
        })
    }

    pub fn primary_key_def(&self) -> Option<&FieldDef> {
        self.primary_key.map(|i| &self.fields[i])
    }

    /// Fields that take part in the mapping, with their index.
    pub fn mapped_fields(&self) -> impl Iterator<Item = (usize, &FieldDef)> {
        self.fields.iter().enumerate().filter(|(_, f)| !f.excluded)
    }

    /// Field receiving the result column `label`, excluded fields never match.
    pub fn find_column(&self, label: &str) -> Option<(usize, &FieldDef)> {
        self.mapped_fields().find(|(_, f)| f.matches(label))
    }

    pub fn unknown_field(&self, index: usize) -> Error {
        MappingError::UnknownField {
            record: self.name,
            index,
        }
        .into()
    }
}

/// A struct mapped to a table row, usually implemented with `#[derive(Record)]`.
///
/// Fields are addressed by their index in [`RecordDef::fields`]. Excluded fields
/// have an index but `get_field` and `set_field` reject them.
pub trait Record: Send {
    fn record_def() -> &'static RecordDef
    where
        Self: Sized;
    fn def(&self) -> &'static RecordDef;
    /// Current value of the field, JSON fields are returned as `Value::Varchar`.
    fn get_field(&self, index: usize) -> Result<Value>;
    /// Overwrite the field, JSON fields decode text or bytes.
    fn set_field(&mut self, index: usize, value: Value) -> Result<()>;
}

#[cfg(test)]
mod tests {
    use super::*;

    const FIELDS: &[FieldDef] = &[
        FieldDef::new("ID").primary_key(),
        FieldDef::new("Name").column("full_name"),
        FieldDef::new("Cache").excluded(),
    ];

    #[test]
    fn registration_finds_primary_key() {
        let def = RecordDef::new("User", "users", FIELDS).unwrap();
        assert_eq!(def.primary_key, Some(0));
        assert_eq!(def.primary_key_def().map(|f| f.column), Some("ID"));
        assert_eq!(def.mapped_fields().count(), 2);
    }

    #[test]
    fn registration_rejects_two_primary_keys() {
        let fields = vec![
            FieldDef::new("a").primary_key(),
            FieldDef::new("b").primary_key(),
        ];
        let error = RecordDef::new("Pair", "pairs", fields).unwrap_err();
        assert!(matches!(
            error.downcast_ref::<MappingError>(),
            Some(MappingError::DuplicatePrimaryKey {
                first: "a",
                second: "b",
                ..
            })
        ));
    }

    #[test]
    fn columns_match_case_insensitively() {
        let def = RecordDef::new("User", "users", FIELDS).unwrap();
        assert_eq!(def.find_column("id").map(|(i, _)| i), Some(0));
        assert_eq!(def.find_column("FULL_NAME").map(|(i, _)| i), Some(1));
        assert!(def.find_column("Name").is_none());
        assert!(def.find_column("cache").is_none());
        assert!(!FieldDef::new("Straße").matches("STRASSE"));
        assert!(FieldDef::new("Émile").matches("émile"));
    }

    #[test]
    fn excluded_fields_do_not_shadow_columns() {
        let fields = vec![
            FieldDef::new("draft").column("label").excluded(),
            FieldDef::new("label"),
        ];
        let def = RecordDef::new("Tag", "tags", fields).unwrap();
        assert_eq!(def.find_column("LABEL").map(|(i, f)| (i, f.name)), Some((1, "label")));
    }
}
