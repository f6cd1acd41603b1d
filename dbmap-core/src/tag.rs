use crate::{MappingError, Result};

/// Column metadata attached to a record field.
///
/// Tag syntax is a comma separated list: the first token is the explicit column
/// name (empty keeps the field name), the following ones are options.
///
/// | tag           | meaning                               |
/// |---------------|---------------------------------------|
/// | `""`          | column named after the field          |
/// | `"-"`         | field excluded from the mapping       |
/// | `",pk"`       | primary key                           |
/// | `",json"`     | value stored as JSON text             |
/// | `"name,json"` | column `name`, stored as JSON text    |
#[derive(Default, Debug, Clone, PartialEq, Eq)]
pub struct ColumnTag {
    pub name: Option<String>,
    pub excluded: bool,
    pub primary_key: bool,
    pub json: bool,
}

impl ColumnTag {
    /// Column name to use for a field called `field`.
    pub fn column_name<'a>(&'a self, field: &'a str) -> &'a str {
        self.name.as_deref().unwrap_or(field)
    }
}

pub fn parse_tag(tag: &str) -> Result<ColumnTag> {
    let tag = tag.trim();
    if tag == "-" {
        return Ok(ColumnTag {
            excluded: true,
            ..Default::default()
        });
    }
    let mut tokens = tag.split(',').map(str::trim);
    let mut result = ColumnTag {
        name: tokens
            .next()
            .filter(|v| !v.is_empty())
            .map(ToOwned::to_owned),
        ..Default::default()
    };
    for token in tokens {
        match token {
            "pk" => result.primary_key = true,
            "json" => result.json = true,
            "" => {}
            other => return Err(MappingError::UnknownTagOption(other.into()).into()),
        }
    }
    Ok(result)
}
