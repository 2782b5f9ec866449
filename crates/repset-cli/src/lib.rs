//! Library side of the repset CLI: logging, settings, catalog and tables.

pub mod catalog;
pub mod config;
pub mod logging;
pub mod summary;
