mod decode_column;
mod decode_record;

use decode_column::ColumnMetadata;
use decode_record::decode_record;
use proc_macro::TokenStream;
use quote::quote;
use syn::{ItemStruct, parse_macro_input};

/// Implements `Record` and `Holder` for a struct with named fields.
///
/// Field attribute, either `#[db = "column,pk,json"]` (`"-"` excludes the field)
/// or `#[db(name = "column", primary_key, json, skip)]`. Container attribute
/// `#[db(table = "name")]`, the table defaults to the snake_case type name.
#[proc_macro_derive(Record, attributes(db))]
pub fn derive_record(input: TokenStream) -> TokenStream {
    let item: ItemStruct = parse_macro_input!(input as ItemStruct);
    let name = &item.ident;
    let (impl_generics, ty_generics, where_clause) = item.generics.split_for_impl();
    let metadata = decode_record(&item);
    let record_name = name.to_string();
    let table = &metadata.table;
    let field_defs = metadata.columns.iter().map(field_def);
    let primary_key = match metadata.primary_key {
        Some(i) => quote!(Some(#i)),
        None => quote!(None),
    };
    let mapped: Vec<_> = metadata
        .columns
        .iter()
        .enumerate()
        .filter(|(_, c)| !c.tag.excluded)
        .collect();
    let get_arms = mapped.iter().map(|(i, c)| get_arm(*i, c));
    let set_arms = mapped.iter().map(|(i, c)| set_arm(*i, c));
    quote! {
        impl #impl_generics ::dbmap::Record for #name #ty_generics #where_clause {
            fn record_def() -> &'static ::dbmap::RecordDef {
                static RECORD_DEF: ::dbmap::RecordDef = ::dbmap::RecordDef {
                    name: #record_name,
                    table: #table,
                    fields: ::std::borrow::Cow::Borrowed(&[#(#field_defs),*]),
                    primary_key: #primary_key,
                };
                &RECORD_DEF
            }

            fn def(&self) -> &'static ::dbmap::RecordDef {
                Self::record_def()
            }

            fn get_field(&self, index: usize) -> ::dbmap::Result<::dbmap::Value> {
                match index {
                    #(#get_arms,)*
                    _ => Err(Self::record_def().unknown_field(index)),
                }
            }

            fn set_field(&mut self, index: usize, value: ::dbmap::Value) -> ::dbmap::Result<()> {
                match index {
                    #(#set_arms,)*
                    _ => return Err(Self::record_def().unknown_field(index)),
                }
                Ok(())
            }
        }

        impl #impl_generics ::dbmap::Holder for #name #ty_generics #where_clause {
            fn destination(&mut self) -> ::dbmap::Destination<'_> {
                ::dbmap::Destination::Record(self)
            }

            fn as_record(&self) -> Option<&dyn ::dbmap::Record> {
                Some(self)
            }
        }
    }
    .into()
}

fn field_def(column: &ColumnMetadata) -> proc_macro2::TokenStream {
    let field = &column.name;
    let name = column.column();
    let mut def = quote!(::dbmap::FieldDef::new(#field).column(#name));
    if column.tag.primary_key {
        def = quote!(#def.primary_key());
    }
    if column.tag.json {
        def = quote!(#def.json());
    }
    if column.tag.excluded {
        def = quote!(#def.excluded());
    }
    def
}

fn get_arm(index: usize, column: &ColumnMetadata) -> proc_macro2::TokenStream {
    let field = &column.ident;
    if column.tag.json {
        quote!(#index => ::dbmap::encode_json(&self.#field))
    } else {
        quote!(#index => Ok(::dbmap::AsValue::as_value(::std::clone::Clone::clone(&self.#field))))
    }
}

fn set_arm(index: usize, column: &ColumnMetadata) -> proc_macro2::TokenStream {
    let field = &column.ident;
    if column.tag.json {
        quote!(#index => self.#field = ::dbmap::decode_json(value)?)
    } else {
        quote!(#index => self.#field = ::dbmap::AsValue::try_from_value(value)?)
    }
}
