//! Template extraction: every msgid used by views, scripts and pages.

use std::{fs, path::Path, sync::Arc};

use anyhow::{Context, Result};
use indexmap::IndexMap;
use rayon::prelude::*;
use swc_common::SourceMap;
use time::{OffsetDateTime, format_description::well_known::Rfc3339};

use crate::{
    core::{
        context::ProjectContext,
        extract::{
            call_sites::collect_call_sites, template_calls::collect_template_calls,
            translator_comments::translator_comments,
        },
        file_scanner::scan_files,
        parsers::{
            handlebars::parse_template,
            js::parse_script,
            po::{PoEntry, PoFile},
        },
        translate::page_call_sites,
    },
    issues::{DynamicCallIssue, Issue, ParseErrorIssue, SourceContext},
    utils::LineIndex,
};

/// Current UTC time in RFC 3339 form, as used in PO headers.
pub fn timestamp() -> Result<String> {
    OffsetDateTime::now_utc()
        .format(&Rfc3339)
        .context("Failed to format timestamp")
}

/// Accumulates template entries keyed by msgid, in first-seen order.
#[derive(Debug, Default)]
pub struct MessageCollector {
    entries: IndexMap<String, PoEntry>,
}

impl MessageCollector {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record one use of `msgid`. References and comments are kept once each.
    pub fn add(&mut self, msgid: &str, reference: &str, comments: Vec<String>) {
        let entry = self
            .entries
            .entry(msgid.to_string())
            .or_insert_with(|| PoEntry::new(msgid));
        if !entry.references.iter().any(|r| r == reference) {
            entry.references.push(reference.to_string());
        }
        for comment in comments {
            if !entry.extracted_comments.contains(&comment) {
                entry.extracted_comments.push(comment);
            }
        }
    }

    /// Number of distinct msgids.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn into_template(self, project_id: &str, creation_date: &str) -> PoFile {
        let mut template = PoFile::default();
        for (name, value) in [
            ("Project-Id-Version", project_id),
            ("POT-Creation-Date", creation_date),
            ("Language", ""),
            ("Content-Type", "text/plain; charset=UTF-8"),
        ] {
            template.headers.insert(name.to_string(), value.to_string());
        }
        template.entries = self.entries.into_values().collect();
        template
    }
}

/// One message use found in a file.
struct FoundMessage {
    msgid: String,
    comments: Vec<String>,
}

/// Messages and issues found in one file.
#[derive(Default)]
struct FileMessages {
    reference: String,
    messages: Vec<FoundMessage>,
    issues: Vec<Issue>,
}

impl FileMessages {
    fn new(reference: String) -> Self {
        Self {
            reference,
            ..Default::default()
        }
    }

    fn parse_error(mut self, error: impl std::fmt::Display) -> Self {
        self.issues.push(Issue::ParseError(ParseErrorIssue {
            file_path: self.reference.clone(),
            error: error.to_string(),
        }));
        self
    }
}

#[derive(Debug)]
pub struct ExtractOutcome {
    pub template: PoFile,
    pub file_count: usize,
    /// Distinct msgids in the template.
    pub string_count: usize,
    pub issues: Vec<Issue>,
}

impl ExtractOutcome {
    pub fn has_parse_errors(&self) -> bool {
        self.issues.iter().any(|i| matches!(i, Issue::ParseError(_)))
    }
}

/// Scan views, then scripts, then pages, and build the template.
pub fn extract_messages(ctx: &ProjectContext) -> Result<ExtractOutcome> {
    let config = &ctx.config;

    let views_root = ctx.views_root();
    let views = scan_files(&views_root, &ctx.view_matcher(), ctx.verbose).files;
    let source_root = ctx.source_root();
    let scripts = scan_files(&source_root, &ctx.script_matcher(), ctx.verbose).files;
    let pages = scan_files(&source_root, &ctx.page_matcher(), ctx.verbose).files;

    let source_map: Arc<SourceMap> = Default::default();

    let view_results: Vec<FileMessages> = views
        .par_iter()
        .map(|rel| {
            let reference = ctx.display_path(&config.views_root, rel);
            view_messages(&views_root.join(rel), reference, &config.view_helper)
        })
        .collect();

    let script_results: Vec<FileMessages> = scripts
        .par_iter()
        .map(|rel| {
            let reference = ctx.display_path(&config.source_root, rel);
            script_messages(
                &source_root.join(rel),
                reference,
                &config.translation_function,
                Arc::clone(&source_map),
            )
        })
        .collect();

    let page_results: Vec<FileMessages> = pages
        .par_iter()
        .map(|rel| {
            let reference = ctx.display_path(&config.source_root, rel);
            page_messages(&source_root.join(rel), reference, &config.catalog_name)
        })
        .collect();

    let mut collector = MessageCollector::new();
    let mut issues = Vec::new();
    let file_count = views.len() + scripts.len() + pages.len();

    for result in view_results
        .into_iter()
        .chain(script_results)
        .chain(page_results)
    {
        for message in result.messages {
            collector.add(&message.msgid, &result.reference, message.comments);
        }
        issues.extend(result.issues);
    }

    let string_count = collector.len();
    let template = collector.into_template(&config.project_id, &timestamp()?);

    Ok(ExtractOutcome {
        template,
        file_count,
        string_count,
        issues,
    })
}

fn view_messages(path: &Path, reference: String, helper: &str) -> FileMessages {
    let mut result = FileMessages::new(reference);
    let content = match fs::read_to_string(path) {
        Ok(content) => content,
        Err(e) => return result.parse_error(e),
    };
    let nodes = match parse_template(&content) {
        Ok(nodes) => nodes,
        Err(e) => return result.parse_error(e),
    };

    let calls = collect_template_calls(&nodes, helper);
    let index = LineIndex::new(&content);
    result.messages = calls
        .messages
        .into_iter()
        .map(|m| FoundMessage {
            msgid: m.msgid,
            comments: m.comments,
        })
        .collect();
    result.issues = calls
        .dynamic_calls
        .into_iter()
        .map(|call| {
            let line = call.line.unwrap_or(1);
            Issue::DynamicCall(DynamicCallIssue {
                context: SourceContext::at_line(&result.reference, &content, &index, line, 1),
                function: helper.to_string(),
            })
        })
        .collect();
    result
}

fn script_messages(
    path: &Path,
    reference: String,
    function: &str,
    source_map: Arc<SourceMap>,
) -> FileMessages {
    let mut result = FileMessages::new(reference);
    let content = match fs::read_to_string(path) {
        Ok(content) => content,
        Err(e) => return result.parse_error(e),
    };
    let parsed = match parse_script(content.clone(), &result.reference, source_map) {
        Ok(parsed) => parsed,
        Err(e) => return result.parse_error(e),
    };

    let calls = collect_call_sites(&parsed, &content, function);
    result.messages = calls
        .sites
        .iter()
        .filter_map(|site| {
            Some(FoundMessage {
                msgid: site.key(&content)?,
                comments: translator_comments(&content, &parsed.comments, &site.argument_range),
            })
        })
        .collect();

    let index = LineIndex::new(&content);
    result.issues = calls
        .dynamic_calls
        .iter()
        .map(|call| {
            Issue::DynamicCall(DynamicCallIssue {
                context: SourceContext::at_line(
                    &result.reference,
                    &content,
                    &index,
                    call.line,
                    call.col,
                ),
                function: function.to_string(),
            })
        })
        .collect();
    result
}

fn page_messages(path: &Path, reference: String, catalog_name: &str) -> FileMessages {
    let mut result = FileMessages::new(reference);
    let content = match fs::read_to_string(path) {
        Ok(content) => content,
        Err(e) => return result.parse_error(e),
    };
    let sites = match page_call_sites(&content, catalog_name) {
        Ok(sites) => sites,
        Err(e) => return result.parse_error(e),
    };
    result.messages = sites
        .iter()
        .filter_map(|site| site.key(&content))
        .map(|msgid| FoundMessage {
            msgid,
            comments: Vec::new(),
        })
        .collect();
    result
}
