//! CLI command implementations.

pub mod init;
pub mod memo;
pub mod prepare;
pub mod show;
pub mod watch;
