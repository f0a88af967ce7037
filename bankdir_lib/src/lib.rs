//! Library layer for the institution directory: SQLite store, parameter
//! sanitization, publication resolution, faceted search and the directory
//! operations served by the CLI and HTTP API.

pub mod config;
pub mod db;
pub mod directory;
pub mod error;
pub mod facets;
pub mod format;
pub mod lookup;
pub mod publication;
pub mod validation;

pub use bankdir_query;
pub use bankdir_query::types;
pub use bankdir_query::{ActiveFilter, FacetLevel, FilterKey, LatestPublications, SearchQuery};

pub use config::DirectoryConfig;
pub use db::{Db, DbError, InstitutionRecord, InstitutionSummary};
pub use directory::{
    Directory, FiguresReport, HistoryEntry, InstitutionDetail, InstitutionKey, MembershipRoster,
    SearchResults,
};
pub use error::DirectoryError;
pub use facets::FacetCounts;
pub use publication::{resolve_neighbors, Neighbors, PublicationChoice, PublicationResolver};
