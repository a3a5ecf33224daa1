//! Catalog merge: refresh every `.po` file from the extracted template.

use std::{collections::HashMap, fs, path::PathBuf};

use anyhow::{Context, Result};

use crate::core::{
    context::ProjectContext,
    parsers::po::{PoEntry, PoFile, load_po},
    pot::timestamp,
};

/// Display names of the locales the project ships.
pub fn language_name(code: &str) -> Option<&'static str> {
    match code {
        "bg" => Some("Bulgarian"),
        "de" => Some("German"),
        "en" => Some("English"),
        "fi" => Some("Finnish"),
        "fr" => Some("French"),
        "ru" => Some("Russian"),
        "sv" => Some("Swedish"),
        "tok" => Some("Tok Pisin"),
        _ => None,
    }
}

/// Rebuild `existing` from `template`.
///
/// Entries follow the template. A msgid keeps its translation and translator
/// comments from `existing` when it had a non-empty msgstr there; entries no
/// longer in the template are dropped.
pub fn merge_catalog(
    template: &PoFile,
    existing: &PoFile,
    locale: &str,
    revision_date: &str,
) -> PoFile {
    let previous: HashMap<&str, &PoEntry> = existing
        .entries
        .iter()
        .filter(|e| !e.obsolete)
        .rev()
        .map(|e| (e.msgid.as_str(), e))
        .collect();

    let project_id = template.header("Project-Id-Version").unwrap_or_default();
    let mut merged = PoFile {
        header_comments: existing.header_comments.clone(),
        ..Default::default()
    };
    let mut set_header = |name: &str, value: &str| {
        merged.headers.insert(name.to_string(), value.to_string());
    };
    set_header("Project-Id-Version", project_id);
    set_header(
        "POT-Creation-Date",
        template.header("POT-Creation-Date").unwrap_or_default(),
    );
    set_header("PO-Revision-Date", revision_date);
    set_header("Last-Translator", "Automatic generation");
    if let Some(language) = language_name(locale) {
        set_header("Language-Team", language);
    }
    set_header("Language", locale);
    set_header("Content-Type", "text/plain; charset=UTF-8");
    set_header(
        "X-Generator",
        &format!("{} localization generator", project_id),
    );

    merged.entries = template
        .entries
        .iter()
        .filter(|e| !e.obsolete)
        .map(|item| {
            let mut entry = item.clone();
            entry.msgstr = vec![String::new()];
            if let Some(old) = previous.get(item.msgid.as_str())
                && old.translation().is_some()
            {
                entry.msgstr = old.msgstr.clone();
                entry.translator_comments = old.translator_comments.clone();
            }
            entry
        })
        .collect();

    merged
}

#[derive(Debug)]
pub struct MergedCatalog {
    pub locale: String,
    pub path: PathBuf,
    pub language: Option<&'static str>,
    pub string_count: usize,
    pub translated_count: usize,
}

/// Merge the template into every catalog of the project and write them back.
pub fn merge_all(ctx: &ProjectContext) -> Result<Vec<MergedCatalog>> {
    let template_path = ctx.template_path();
    let template = load_po(&template_path).with_context(|| {
        format!(
            "Failed to load template {:?} (run `poglot extract` first)",
            template_path
        )
    })?;
    let revision_date = timestamp()?;

    let mut merged_catalogs = Vec::new();
    for catalog in ctx.catalogs()? {
        let existing = load_po(&catalog.path)?;
        let merged = merge_catalog(&template, &existing, &catalog.locale, &revision_date);

        fs::write(&catalog.path, merged.to_po_string())
            .with_context(|| format!("Failed to write catalog: {:?}", catalog.path))?;

        merged_catalogs.push(MergedCatalog {
            language: language_name(&catalog.locale),
            string_count: merged.entries.len(),
            translated_count: merged
                .entries
                .iter()
                .filter(|e| e.translation().is_some())
                .count(),
            locale: catalog.locale,
            path: catalog.path,
        });
    }

    Ok(merged_catalogs)
}
