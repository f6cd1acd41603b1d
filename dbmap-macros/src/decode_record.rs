use crate::decode_column::{ColumnMetadata, decode_column};
use convert_case::{Case, Casing};
use quote::ToTokens;
use syn::{Fields, ItemStruct, LitStr, parse::ParseBuffer};

pub(crate) struct RecordMetadata {
    pub(crate) columns: Vec<ColumnMetadata>,
    pub(crate) table: String,
    pub(crate) primary_key: Option<usize>,
}

pub(crate) fn decode_record(item: &ItemStruct) -> RecordMetadata {
    let Fields::Named(fields) = &item.fields else {
        panic!(
            "Record can only be derived on structs with named fields, `{}` is not one",
            item.ident
        );
    };
    let columns: Vec<_> = fields.named.iter().map(decode_column).collect();
    let mut table = item.ident.to_string().to_case(Case::Snake);
    for attr in &item.attrs {
        let meta = &attr.meta;
        if meta.path().is_ident("db") {
            let Ok(list) = meta.require_list() else {
                panic!("Error while parsing `db`, use it like: `#[db(table = \"my_table\")]`");
            };
            let _ = list.parse_nested_meta(|arg| {
                if arg.path.is_ident("table") {
                    let Ok(value) = arg.value().and_then(ParseBuffer::parse::<LitStr>) else {
                        panic!("Error while parsing `table`, use it like: `#[db(table = \"my_table\")]`");
                    };
                    table = value.value();
                } else {
                    panic!(
                        "Unknown attribute `{}` inside db macro",
                        arg.path.to_token_stream()
                    );
                }
                Ok(())
            });
        }
    }
    let mut primary_key: Option<usize> = None;
    for (i, column) in columns.iter().enumerate() {
        if !column.tag.primary_key || column.tag.excluded {
            continue;
        }
        if let Some(first) = primary_key {
            panic!(
                "Record `{}` declares both `{}` and `{}` as primary key, only one is allowed",
                item.ident, columns[first].name, column.name
            );
        }
        primary_key = Some(i);
    }
    RecordMetadata {
        columns,
        table,
        primary_key,
    }
}
