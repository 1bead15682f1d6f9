//! strsync - design-to-app string synchronization
//!
//! strsync extracts labeled texts from a design document, compares them with
//! the last published string table, gates the run on invalid or conflicting
//! labels and on deletions, offers spelling suggestions, and publishes the
//! reconciled table to remote config, the code repository and local exports.
//!
//! ## Module Structure
//!
//! - `cli`: Command-line interface layer
//! - `config`: Configuration file loading and credentials
//! - `core`: Extraction, conflict detection and diff (pure)
//! - `pipeline`: Gated run from review to publish
//! - `services`: Design, repository, remote-config and correction clients

pub mod cli;
pub mod config;
pub mod core;
pub mod pipeline;
pub mod services;
