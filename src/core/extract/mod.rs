//! Message discovery in scripts and templates.
//!
//! - `call_sites`: translation calls in parsed scripts
//! - `template_calls`: helper calls in template trees
//! - `translator_comments`: `translator:` comments attached to a call

pub mod call_sites;
pub mod template_calls;
pub mod translator_comments;
