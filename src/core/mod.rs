//! Core engine: parsing, call-site discovery, splicing and the three
//! pipelines built on top of them (extract, merge, build).

pub mod build;
pub mod catalog;
pub mod context;
pub mod extract;
pub mod file_scanner;
pub mod merge;
pub mod parsers;
pub mod pot;
pub mod splice;
pub mod translate;

pub use context::{Overrides, ProjectContext};
