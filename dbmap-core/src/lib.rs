mod as_value;
mod crud;
mod decompose;
mod dialect;
mod driver;
mod error;
mod executor;
mod expand;
mod holder;
mod json;
mod query;
mod record;
mod scan;
mod sql_writer;
mod tag;
mod util;
mod value;

pub use ::anyhow::Context;
pub use as_value::*;
pub use crud::*;
pub use decompose::*;
pub use dialect::*;
pub use driver::*;
pub use error::*;
pub use executor::*;
pub use expand::*;
pub use holder::*;
pub use json::*;
pub use query::*;
pub use record::*;
pub use scan::*;
pub use sql_writer::*;
pub use tag::*;
pub use util::*;
pub use value::*;
pub mod stream {
    pub use ::futures::stream::*;
}
pub use ::futures::future;

pub type Result<T> = anyhow::Result<T>;
pub type Error = anyhow::Error;
