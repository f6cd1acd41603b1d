use dbmap_core::{ColumnTag, parse_tag};
use quote::ToTokens;
use syn::{Expr, ExprLit, Field, Ident, Lit, LitStr, Meta, parse::ParseBuffer};

pub(crate) struct ColumnMetadata {
    pub(crate) ident: Ident,
    /// Field name without the raw identifier prefix.
    pub(crate) name: String,
    pub(crate) tag: ColumnTag,
}

impl ColumnMetadata {
    pub(crate) fn column(&self) -> &str {
        self.tag.column_name(&self.name)
    }
}

pub(crate) fn decode_column(field: &Field) -> ColumnMetadata {
    let ident = field
        .ident
        .clone()
        .expect("Field is expected to have a name");
    let name = ident.to_string().trim_start_matches("r#").to_string();
    let mut tag = ColumnTag::default();
    for attr in &field.attrs {
        let meta = &attr.meta;
        if !meta.path().is_ident("db") {
            continue;
        }
        match meta {
            Meta::NameValue(v) => {
                let Expr::Lit(ExprLit {
                    lit: Lit::Str(value),
                    ..
                }) = &v.value
                else {
                    panic!(
                        "Error while parsing `db` on `{name}`, use it like: `#[db = \"column,pk,json\"]`"
                    );
                };
                tag = match parse_tag(&value.value()) {
                    Ok(v) => v,
                    Err(e) => panic!("Error while parsing `db` on `{name}`: {e}"),
                };
            }
            Meta::List(list) => {
                let _ = list.parse_nested_meta(|arg| {
                    if arg.path.is_ident("name") {
                        let Ok(v) = arg.value().and_then(ParseBuffer::parse::<LitStr>) else {
                            panic!("Error while parsing `name`, use it like: `#[db(name = \"my_column\")]`");
                        };
                        tag.name = Some(v.value()).filter(|v| !v.is_empty());
                    } else if arg.path.is_ident("primary_key") || arg.path.is_ident("pk") {
                        let Err(..) = arg.value() else {
                            // value() is Err for Meta::Path
                            panic!("Error while parsing `primary_key`, use it like: `#[db(primary_key)]`");
                        };
                        tag.primary_key = true;
                    } else if arg.path.is_ident("json") {
                        let Err(..) = arg.value() else {
                            panic!("Error while parsing `json`, use it like: `#[db(json)]`");
                        };
                        tag.json = true;
                    } else if arg.path.is_ident("skip") {
                        let Err(..) = arg.value() else {
                            panic!("Error while parsing `skip`, use it like: `#[db(skip)]`");
                        };
                        tag.excluded = true;
                    } else {
                        panic!(
                            "Unknown attribute `{}` inside db macro",
                            arg.path.to_token_stream()
                        );
                    }
                    Ok(())
                });
            }
            Meta::Path(..) => panic!(
                "Error while parsing `db` on `{name}`, use it like: `#[db = \"column,pk\"]` or `#[db(name = \"column\", primary_key)]`"
            ),
        }
    }
    ColumnMetadata { ident, name, tag }
}
