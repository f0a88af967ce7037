//! Domain types and the structured filter builder for the institution directory.
//!
//! Nothing in this crate touches storage: filters compile to a parameterized
//! SQL fragment that the store layer executes.

mod errors;
mod query;
pub mod types;
pub use self::errors::Error;
pub use self::query::{
    ActiveFilter, Column, CompiledFilter, Expr, FacetLevel, FilterKey, FilterPlan, Join,
    LatestPublications, SearchQuery, Value,
};
