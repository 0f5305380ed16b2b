mod adapter;
mod builtin;
mod schema;

pub use adapter::CatalogAdapter;
pub use builtin::BUILTIN_CATALOG;
pub use schema::{Catalog, CatalogCommand, CatalogPage, Effect, FollowUp, SubmitAction};
