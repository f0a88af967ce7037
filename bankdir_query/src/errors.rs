//! Error types for parsing directory values.

/// Errors produced when a string does not name a known domain value.
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum Error {
    /// Season other than `spring` or `fall`.
    #[error("unknown season '{0}'")]
    UnknownSeason(String),
    /// Institution type code not in the reference set.
    #[error("unknown institution type '{0}'")]
    UnknownInstitutionType(String),
    /// Asset range code not one of the five fixed buckets.
    #[error("unknown asset range '{0}'")]
    UnknownAssetRange(String),
}
