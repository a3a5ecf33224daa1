//! Build pipeline: one localized copy of every script and page per catalog.

use std::{fs, path::Path, sync::Arc};

use anyhow::{Context, Result, bail};
use rayon::prelude::*;
use swc_common::SourceMap;

use crate::{
    core::{
        catalog::{Catalog, CatalogCache, CatalogFile},
        context::ProjectContext,
        file_scanner::scan_files,
        translate::{PreparedSource, SourceKind},
    },
    issues::{DynamicCallIssue, Issue, MissingTranslationIssue, ParseErrorIssue, SourceContext},
    utils::LineIndex,
};

/// Insert a locale suffix before the extension of the file name:
/// `js/main.js` + `_fr` → `js/main_fr.js`.
pub fn localized_name(relative: &str, suffix: &str) -> String {
    let name_start = relative.rfind('/').map(|i| i + 1).unwrap_or(0);
    match relative[name_start..].rfind('.') {
        Some(dot) if dot > 0 => {
            let dot = name_start + dot;
            format!("{}{}{}", &relative[..dot], suffix, &relative[dot..])
        }
        _ => format!("{}{}", relative, suffix),
    }
}

/// Per-locale totals.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LocaleSummary {
    pub locale: String,
    pub files_written: usize,
    /// Call sites that kept their original text.
    pub missing: usize,
}

#[derive(Debug)]
pub struct BuildOutcome {
    /// Translatable scripts and pages found.
    pub source_count: usize,
    pub locales: Vec<LocaleSummary>,
    pub files_copied: usize,
    /// Localized outputs that were not written.
    pub failed: usize,
    pub issues: Vec<Issue>,
}

impl BuildOutcome {
    pub fn has_failures(&self) -> bool {
        self.failed > 0
    }
}

/// A source ready to be translated into every locale.
struct Source {
    relative: String,
    display: String,
    prepared: PreparedSource,
    index: LineIndex,
}

impl Source {
    fn context(&self, offset: usize) -> SourceContext {
        SourceContext::at_offset(&self.display, &self.prepared.text, &self.index, offset)
    }

    fn dynamic_call_issues(&self) -> Vec<Issue> {
        let SourceKind::Script { function } = &self.prepared.kind else {
            return Vec::new();
        };
        self.prepared
            .dynamic_calls
            .iter()
            .map(|call| {
                Issue::DynamicCall(DynamicCallIssue {
                    context: SourceContext::at_line(
                        &self.display,
                        &self.prepared.text,
                        &self.index,
                        call.line,
                        call.col,
                    ),
                    function: function.clone(),
                })
            })
            .collect()
    }
}

struct JobResult {
    catalog: usize,
    written: bool,
    missing: usize,
    issues: Vec<Issue>,
}

pub fn build(ctx: &ProjectContext) -> Result<BuildOutcome> {
    let config = &ctx.config;
    let source_root = ctx.source_root();
    let out_dir = ctx.out_dir();

    let catalogs = ctx.catalogs()?;
    if catalogs.is_empty() {
        bail!("No catalogs found in {:?}", ctx.po_root());
    }
    let cache = CatalogCache::new();
    let loaded: Vec<(CatalogFile, Arc<Catalog>)> = catalogs
        .into_iter()
        .map(|file| {
            let catalog = cache.get(&file.path)?;
            Ok((file, catalog))
        })
        .collect::<Result<_>>()?;

    let scripts = scan_files(&source_root, &ctx.script_matcher(), ctx.verbose).files;
    let pages = scan_files(&source_root, &ctx.page_matcher(), ctx.verbose).files;
    let source_count = scripts.len() + pages.len();

    let source_map: Arc<SourceMap> = Default::default();
    let prepared: Vec<Result<Source, Issue>> = scripts
        .par_iter()
        .map(|rel| (rel, true))
        .chain(pages.par_iter().map(|rel| (rel, false)))
        .map(|(rel, is_script)| {
            let display = ctx.display_path(&config.source_root, rel);
            let parse_error = |error: String| {
                Issue::ParseError(ParseErrorIssue {
                    file_path: display.clone(),
                    error,
                })
            };
            let text = fs::read_to_string(source_root.join(rel))
                .map_err(|e| parse_error(e.to_string()))?;
            let prepared = if is_script {
                PreparedSource::script(
                    text,
                    &display,
                    &config.translation_function,
                    Arc::clone(&source_map),
                )
            } else {
                PreparedSource::page(text, &config.catalog_name)
            }
            .map_err(|e| parse_error(format!("{:#}", e)))?;
            Ok(Source {
                relative: rel.clone(),
                index: LineIndex::new(&prepared.text),
                display,
                prepared,
            })
        })
        .collect();

    let mut issues = Vec::new();
    let mut failed = 0;
    let mut sources = Vec::new();
    for result in prepared {
        match result {
            Ok(source) => {
                issues.extend(source.dynamic_call_issues());
                sources.push(source);
            }
            Err(issue) => {
                failed += loaded.len();
                issues.push(issue);
            }
        }
    }

    let jobs: Vec<(usize, &Source)> = (0..loaded.len())
        .flat_map(|c| sources.iter().map(move |s| (c, s)))
        .collect();
    let results: Vec<JobResult> = jobs
        .par_iter()
        .map(|&(c, source)| {
            let (file, catalog) = &loaded[c];
            translate_one(c, source, file, catalog, &out_dir)
        })
        .collect::<Result<_>>()?;

    let mut locales: Vec<LocaleSummary> = loaded
        .iter()
        .map(|(file, _)| LocaleSummary {
            locale: file.locale.clone(),
            files_written: 0,
            missing: 0,
        })
        .collect();
    for result in results {
        let summary = &mut locales[result.catalog];
        if result.written {
            summary.files_written += 1;
        } else {
            failed += 1;
        }
        summary.missing += result.missing;
        issues.extend(result.issues);
    }

    let copies = scan_files(&source_root, &ctx.copy_matcher(), ctx.verbose).files;
    for rel in &copies {
        let target = out_dir.join(rel);
        create_parent(&target)?;
        fs::copy(source_root.join(rel), &target)
            .with_context(|| format!("Failed to copy {} to {:?}", rel, target))?;
    }

    Ok(BuildOutcome {
        source_count,
        locales,
        files_copied: copies.len(),
        failed,
        issues,
    })
}

fn translate_one(
    catalog_index: usize,
    source: &Source,
    file: &CatalogFile,
    catalog: &Catalog,
    out_dir: &Path,
) -> Result<JobResult> {
    let mut result = JobResult {
        catalog: catalog_index,
        written: false,
        missing: 0,
        issues: Vec::new(),
    };
    let sites = &source.prepared.sites;

    let output = match source.prepared.translate(catalog) {
        Ok(output) => output,
        Err(err) => {
            let offset = sites.get(err.index()).map_or(0, |s| s.range.start);
            result.issues.push(Issue::from_splice_error(
                source.context(offset),
                &file.locale,
                &err,
            ));
            return Ok(result);
        }
    };

    let target = out_dir.join(localized_name(&source.relative, &file.suffix));
    create_parent(&target)?;
    fs::write(&target, &output.text).with_context(|| format!("Failed to write {:?}", target))?;

    result.written = true;
    result.missing = output.missing.len();
    result.issues = output
        .missing
        .into_iter()
        .map(|missing| {
            let offset = sites.get(missing.index).map_or(0, |s| s.range.start);
            Issue::MissingTranslation(MissingTranslationIssue {
                context: source.context(offset),
                key: missing.key,
                locale: file.locale.clone(),
            })
        })
        .collect();
    Ok(result)
}

fn create_parent(path: &Path) -> Result<()> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)
            .with_context(|| format!("Failed to create directory {:?}", parent))?;
    }
    Ok(())
}
