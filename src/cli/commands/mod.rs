//! Command implementations, one module per category.

pub mod chat;
pub mod config;
pub mod help;
pub mod init;
pub mod models;
