//! emberscope core library: discovery, batch analysis, aggregation and graphs.
//!
//! The main entry point is [`explorer::Explorer`], which scans a project
//! directory, groups files into logical components and exposes aggregated
//! [`aggregate::ComponentInformation`] records and the component graph.

pub mod aggregate;
pub mod config;
pub mod discovery;
pub mod error;
pub mod explorer;
pub mod file_info;
pub mod graph;
pub mod naming;
pub mod progress;
