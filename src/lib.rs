//! Maps plain Rust structs to relational tables.
//!
//! ```rust,ignore
//! #[derive(Record, Default)]
//! #[db(table = "users")]
//! struct User {
//!     #[db = "id,pk"]
//!     id: i64,
//!     name: String,
//!     #[db = ",json"]
//!     settings: Settings,
//! }
//!
//! let mut user = User { name: "Ada".into(), ..Default::default() };
//! executor.insert("users", &mut user).await?;
//! let mut users: Vec<User> = Vec::new();
//! executor
//!     .select(&mut users, "SELECT * FROM users WHERE id IN (?)", params![vec![1, 2, 3]])
//!     .await?;
//! ```
pub use ::dbmap_core::*;
pub use ::dbmap_macros::Record;
