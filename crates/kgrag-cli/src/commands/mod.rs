//! CLI command implementations.

pub mod extract;
pub mod init;
pub mod load;
pub mod query;
pub mod serve;
