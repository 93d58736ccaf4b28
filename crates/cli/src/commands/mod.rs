//! CLI Commands

pub mod init;
pub mod replay;
pub mod summary;
