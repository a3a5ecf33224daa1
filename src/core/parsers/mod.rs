//! File parsers.
//!
//! - `handlebars`: view templates
//! - `js`: browser scripts (swc)
//! - `po`: gettext catalogs and templates

pub mod handlebars;
pub mod js;
pub mod po;
