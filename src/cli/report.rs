//! Report formatting and printing utilities.
//!
//! Issues are displayed in cargo-style format. Kept apart from the core so
//! poglot can be used as a library.

use std::{
    collections::BTreeMap,
    io::{self, Write},
};

use colored::Colorize;
use unicode_width::UnicodeWidthStr;

use super::commands::{
    BuildSummary, CommandResult, CommandSummary, ExtractSummary, InitSummary, MergeSummary,
};
use crate::{
    issues::{Issue, Report, ReportLocation, Severity},
    utils::plural,
};

/// Success mark for consistent output formatting.
pub const SUCCESS_MARK: &str = "\u{2713}"; // ✓

/// Failure mark for consistent output formatting.
pub const FAILURE_MARK: &str = "\u{2718}"; // ✘

/// Print the issues and summary of a finished command.
///
/// Missing translations are only listed one by one with `verbose`;
/// otherwise a count per locale goes to stderr.
pub fn print(result: &CommandResult, verbose: bool) {
    print_to(
        result,
        verbose,
        &mut io::stdout().lock(),
        &mut io::stderr().lock(),
    );
}

pub fn print_to<W: Write, E: Write>(result: &CommandResult, verbose: bool, out: &mut W, err: &mut E) {
    let shown: Vec<&Issue> = result
        .issues
        .iter()
        .filter(|i| verbose || !matches!(i, Issue::MissingTranslation(_)))
        .collect();
    report_to(&shown, out);

    if !verbose {
        print_missing_summary_to(&result.issues, err);
    }

    match &result.summary {
        CommandSummary::Build(summary) => print_build(summary, out),
        CommandSummary::Extract(summary) => print_extract(summary, out),
        CommandSummary::Merge(summary) => print_merge(summary, out),
        CommandSummary::Init(summary) => print_init(summary, out, err),
    }
}

/// Print issues sorted by location, then the problem count.
pub fn report_to<W: Write>(issues: &[&Issue], writer: &mut W) {
    if issues.is_empty() {
        return;
    }

    let mut sorted = issues.to_vec();
    sorted.sort_by(|a, b| compare_issues(a, b));

    let max_line_width = calculate_max_line_width(&sorted);
    for issue in &sorted {
        print_issue(issue, writer, max_line_width);
    }

    print_problem_count(&sorted, writer);
}

/// One warning line per locale with untranslated call sites.
pub fn print_missing_summary_to<W: Write>(issues: &[Issue], writer: &mut W) {
    let mut per_locale: BTreeMap<&str, usize> = BTreeMap::new();
    for issue in issues {
        if let Issue::MissingTranslation(missing) = issue {
            *per_locale.entry(missing.locale.as_str()).or_default() += 1;
        }
    }

    for (locale, count) in per_locale {
        let _ = writeln!(
            writer,
            "{} {} missing {} in {} (use {} for details)",
            "warning:".bold().yellow(),
            count,
            plural(count, "translation", "translations"),
            locale,
            "-v".cyan()
        );
    }
}

// ============================================================
// Internal Functions
// ============================================================

fn print_issue<W: Write>(issue: &Issue, writer: &mut W, max_line_width: usize) {
    let loc = issue.location();
    let (file_path, line, col, source_line) = extract_location_info(&loc);

    let severity = issue.report_severity();
    let severity_str = match severity {
        Severity::Error => "error".bold().red(),
        Severity::Warning => "warning".bold().yellow(),
    };

    let _ = writeln!(
        writer,
        "{}: {}  {}",
        severity_str,
        issue.message(),
        issue.report_rule().to_string().dimmed().cyan()
    );

    // Clickable location: --> path:line:col
    if line > 0 {
        let _ = writeln!(writer, "  {} {}:{}:{}", "-->".blue(), file_path, line, col);
    } else {
        let _ = writeln!(writer, "  {} {}", "-->".blue(), file_path);
    }

    if let Some(source_line) = source_line {
        let caret_char = match severity {
            Severity::Error => "^".red(),
            Severity::Warning => "^".yellow(),
        };

        let _ = writeln!(
            writer,
            "{:>width$} {}",
            "",
            "|".blue(),
            width = max_line_width
        );
        let _ = writeln!(
            writer,
            "{:>width$} {} {}",
            line.to_string().blue(),
            "|".blue(),
            source_line,
            width = max_line_width
        );

        // col is 1-based
        let prefix: String = source_line.chars().take(col.saturating_sub(1)).collect();
        let caret_padding = UnicodeWidthStr::width(prefix.as_str());
        let _ = writeln!(
            writer,
            "{:>width$} {} {:>padding$}{}",
            "",
            "|".blue(),
            "",
            caret_char,
            width = max_line_width,
            padding = caret_padding
        );
    }

    if let Some(details) = issue.details() {
        let _ = writeln!(
            writer,
            "{:>width$} {} {} {}",
            "",
            "=".blue(),
            "note:".bold(),
            details,
            width = max_line_width
        );
    }

    if let Some(hint) = issue.hint() {
        let _ = writeln!(
            writer,
            "{:>width$} {} {} {}",
            "",
            "=".blue(),
            "hint:".bold().cyan(),
            hint,
            width = max_line_width
        );
    }

    let _ = writeln!(writer);
}

fn print_problem_count<W: Write>(issues: &[&Issue], writer: &mut W) {
    let errors = issues
        .iter()
        .filter(|i| i.report_severity() == Severity::Error)
        .count();
    let warnings = issues.len() - errors;

    let _ = writeln!(
        writer,
        "{} {} {} ({} {}, {} {})\n",
        FAILURE_MARK.red(),
        issues.len(),
        plural(issues.len(), "problem", "problems"),
        errors,
        plural(errors, "error", "errors").red(),
        warnings,
        plural(warnings, "warning", "warnings").yellow()
    );
}

fn extract_location_info<'a>(
    loc: &'a ReportLocation<'a>,
) -> (&'a str, usize, usize, Option<&'a str>) {
    match loc {
        ReportLocation::Source(ctx) => (
            ctx.file_path(),
            ctx.line(),
            ctx.col(),
            Some(&ctx.source_line),
        ),
        ReportLocation::File { path } => (path, 0, 0, None),
    }
}

fn calculate_max_line_width(issues: &[&Issue]) -> usize {
    issues
        .iter()
        .filter_map(|i| match i.location() {
            ReportLocation::Source(ctx) => Some(ctx.line()),
            ReportLocation::File { .. } => None,
        })
        .max()
        .map(|n| n.to_string().len())
        .unwrap_or(1)
}

fn compare_issues(a: &Issue, b: &Issue) -> std::cmp::Ordering {
    let a_loc = a.location();
    let b_loc = b.location();
    let (a_path, a_line, a_col, _) = extract_location_info(&a_loc);
    let (b_path, b_line, b_col, _) = extract_location_info(&b_loc);

    a_path
        .cmp(b_path)
        .then_with(|| a_line.cmp(&b_line))
        .then_with(|| a_col.cmp(&b_col))
        .then_with(|| a.report_rule().cmp(&b.report_rule()))
}

fn print_build<W: Write>(summary: &BuildSummary, writer: &mut W) {
    for locale in &summary.locales {
        let mut line = format!(
            "  {}: {} {} written",
            locale.locale,
            locale.files_written,
            plural(locale.files_written, "file", "files")
        );
        if locale.missing > 0 {
            line.push_str(&format!(
                ", {} missing {}",
                locale.missing,
                plural(locale.missing, "translation", "translations")
            ));
        }
        let _ = writeln!(writer, "{}", line);
    }

    if summary.failed > 0 {
        let _ = writeln!(
            writer,
            "{} {}",
            FAILURE_MARK.red(),
            format!(
                "{} localized {} not written",
                summary.failed,
                plural(summary.failed, "file", "files")
            )
            .red()
        );
    } else {
        let locales = summary.locales.len();
        let _ = writeln!(
            writer,
            "{} {}",
            SUCCESS_MARK.green(),
            format!(
                "Translated {} source {} into {} {}, copied {} {}",
                summary.source_count,
                plural(summary.source_count, "file", "files"),
                locales,
                plural(locales, "locale", "locales"),
                summary.files_copied,
                plural(summary.files_copied, "file", "files")
            )
            .green()
        );
    }
}

fn print_extract<W: Write>(summary: &ExtractSummary, writer: &mut W) {
    if summary.written {
        let _ = writeln!(
            writer,
            "{} {}",
            SUCCESS_MARK.green(),
            format!(
                "Extracted {} {} from {} {} into {}",
                summary.string_count,
                plural(summary.string_count, "string", "strings"),
                summary.file_count,
                plural(summary.file_count, "file", "files"),
                summary.template_path
            )
            .green()
        );
    } else {
        let _ = writeln!(
            writer,
            "{} {}",
            FAILURE_MARK.red(),
            format!(
                "{} not written: some files could not be parsed",
                summary.template_path
            )
            .red()
        );
    }
}

fn print_merge<W: Write>(summary: &MergeSummary, writer: &mut W) {
    for catalog in &summary.catalogs {
        let name = catalog
            .path
            .file_name()
            .map(|n| n.to_string_lossy().to_string())
            .unwrap_or_default();
        let language = catalog
            .language
            .map(|l| format!(" ({})", l))
            .unwrap_or_default();
        let _ = writeln!(
            writer,
            "  {}{}: {} {}, {} translated",
            name,
            language,
            catalog.string_count,
            plural(catalog.string_count, "string", "strings"),
            catalog.translated_count
        );
    }

    let count = summary.catalogs.len();
    let _ = writeln!(
        writer,
        "{} {}",
        SUCCESS_MARK.green(),
        format!(
            "Merged template into {} {}",
            count,
            plural(count, "catalog", "catalogs")
        )
        .green()
    );
}

fn print_init<W: Write, E: Write>(summary: &InitSummary, out: &mut W, err: &mut E) {
    match &summary.error {
        Some(error) => {
            let _ = writeln!(err, "{} {}", "error:".bold().red(), error);
        }
        None => {
            let _ = writeln!(
                out,
                "{} {}",
                SUCCESS_MARK.green(),
                format!("Created {}", summary.path.display()).green()
            );
        }
    }
}
