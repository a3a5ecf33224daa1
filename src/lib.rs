//! poglot - gettext build tooling for localized browser scripts and pages
//!
//! poglot extracts translatable strings from Handlebars views, browser
//! scripts and HTML pages into a `.pot` template, merges that template into
//! the `.po` catalogs, and builds one translated copy of every script and
//! page per catalog by splicing translations over the original call sites.
//!
//! ## Module Structure
//!
//! - `cli`: Command-line interface layer
//! - `config`: Configuration file loading and parsing
//! - `core`: Parsers, call-site discovery, the splicer and the pipelines
//! - `issues`: Issue type definitions and reporting
//! - `mcp`: Model Context Protocol server implementation
//! - `utils`: Shared utility functions

pub mod cli;
pub mod config;
pub mod core;
pub mod issues;
pub mod mcp;
pub mod utils;
