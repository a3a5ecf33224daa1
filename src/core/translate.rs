//! Per-file translation: locate call sites once, splice once per locale.

use std::sync::Arc;

use regex::Regex;
use swc_common::SourceMap;

use crate::core::{
    catalog::Lookup,
    extract::call_sites::{DynamicCall, collect_call_sites},
    parsers::js::parse_script,
    splice::{CallSite, PrefixGuard, QuoteGuard, SpliceError, SpliceOutput, Splicer},
};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SourceKind {
    /// Browser script; calls are `<function>('msgid')`.
    Script { function: String },
    /// HTML page; `{{i18n('<catalog>', 'msgid') | raw}}` tags keep their shape.
    Page,
}

/// A source file with its call sites located against the original text.
#[derive(Debug, Clone)]
pub struct PreparedSource {
    pub kind: SourceKind,
    pub text: String,
    pub sites: Vec<CallSite>,
    pub dynamic_calls: Vec<DynamicCall>,
}

impl PreparedSource {
    pub fn script(
        text: String,
        file_path: &str,
        function: &str,
        source_map: Arc<SourceMap>,
    ) -> anyhow::Result<Self> {
        let parsed = parse_script(text.clone(), file_path, source_map)?;
        let calls = collect_call_sites(&parsed, &text, function);
        Ok(Self {
            kind: SourceKind::Script {
                function: function.to_string(),
            },
            text,
            sites: calls.sites,
            dynamic_calls: calls.dynamic_calls,
        })
    }

    pub fn page(text: String, catalog_name: &str) -> anyhow::Result<Self> {
        let sites = page_call_sites(&text, catalog_name)?;
        Ok(Self {
            kind: SourceKind::Page,
            text,
            sites,
            dynamic_calls: Vec::new(),
        })
    }

    /// Produce the text for one catalog.
    pub fn translate<L: Lookup + ?Sized>(&self, lookup: &L) -> Result<SpliceOutput, SpliceError> {
        match &self.kind {
            SourceKind::Script { function } => {
                Splicer::with_guard(PrefixGuard::new(function.as_str()))
                    .splice(&self.text, &self.sites, lookup)
            }
            SourceKind::Page => {
                Splicer::with_guard(QuoteGuard).splice(&self.text, &self.sites, lookup)
            }
        }
    }
}

fn page_tag_regex(catalog_name: &str) -> Result<Regex, regex::Error> {
    Regex::new(&format!(
        r"\{{\{{\s*i18n\(\s*'{}'\s*,\s*'((?:[^'\\\n]|\\.)*)'\s*\)\s*\|\s*raw\s*\}}\}}",
        regex::escape(catalog_name)
    ))
}

/// Literal sites for every `{{i18n('<catalog>', '...') | raw}}` tag.
///
/// Only the quoted msgid is replaced; the surrounding tag stays for the
/// page template engine.
pub fn page_call_sites(text: &str, catalog_name: &str) -> Result<Vec<CallSite>, regex::Error> {
    Ok(page_tag_regex(catalog_name)?
        .captures_iter(text)
        .filter_map(|caps| caps.get(1))
        .map(|msgid| CallSite::literal(msgid.start() - 1..msgid.end() + 1, '\''))
        .collect())
}

/// Translate every catalog tag of an HTML page in one pass.
pub fn translate_html<L: Lookup + ?Sized>(
    text: &str,
    catalog_name: &str,
    lookup: &L,
) -> anyhow::Result<SpliceOutput> {
    let sites = page_call_sites(text, catalog_name)?;
    Ok(Splicer::with_guard(QuoteGuard).splice(text, &sites, lookup)?)
}
