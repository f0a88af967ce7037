mod predicate;
pub use self::predicate::{Column, Expr, Value};
mod search;
pub use self::search::{
    ActiveFilter, CompiledFilter, FacetLevel, FilterKey, FilterPlan, Join, LatestPublications,
    SearchQuery,
};
