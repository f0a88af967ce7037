//! CLI subcommand implementations.

pub mod figures;
pub mod history;
pub mod init_db;
pub mod institution;
pub mod membership;
pub mod publications;
pub mod search;
pub mod serve;
