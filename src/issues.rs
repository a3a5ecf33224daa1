//! Issue types produced while extracting and building.
//!
//! Each issue carries everything the reporter needs to display it: location,
//! source line, message and rule.

use std::fmt;

use enum_dispatch::enum_dispatch;

use crate::{core::splice::SpliceError, utils::LineIndex};

// ============================================================
// Severity and Rule
// ============================================================

/// Severity level of an issue.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Severity {
    Error,
    Warning,
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Severity::Error => write!(f, "error"),
            Severity::Warning => write!(f, "warning"),
        }
    }
}

/// Rule identifier for each issue type.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum Rule {
    MissingTranslation,
    DynamicCall,
    OffsetDrift,
    MalformedLiteral,
    ParseError,
}

impl fmt::Display for Rule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Rule::MissingTranslation => write!(f, "missing-translation"),
            Rule::DynamicCall => write!(f, "dynamic-call"),
            Rule::OffsetDrift => write!(f, "offset-drift"),
            Rule::MalformedLiteral => write!(f, "malformed-literal"),
            Rule::ParseError => write!(f, "parse-error"),
        }
    }
}

// ============================================================
// Locations
// ============================================================

/// Pure position information in a source file.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord)]
pub struct SourceLocation {
    pub file_path: String,
    pub line: usize,
    pub col: usize,
}

impl SourceLocation {
    pub fn new(file_path: impl Into<String>, line: usize, col: usize) -> Self {
        Self {
            file_path: file_path.into(),
            line,
            col,
        }
    }
}

/// Position plus the source line shown under the `-->` marker.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SourceContext {
    pub location: SourceLocation,
    pub source_line: String,
}

impl SourceContext {
    pub fn new(location: SourceLocation, source_line: impl Into<String>) -> Self {
        Self {
            location,
            source_line: source_line.into(),
        }
    }

    /// Context for a byte offset into `content`.
    pub fn at_offset(
        file_path: impl Into<String>,
        content: &str,
        index: &LineIndex,
        offset: usize,
    ) -> Self {
        let (line, col) = index.line_col(content, offset);
        Self::at_line(file_path, content, index, line, col)
    }

    pub fn at_line(
        file_path: impl Into<String>,
        content: &str,
        index: &LineIndex,
        line: usize,
        col: usize,
    ) -> Self {
        Self::new(
            SourceLocation::new(file_path, line, col),
            index.line_text(content, line),
        )
    }

    pub fn file_path(&self) -> &str {
        &self.location.file_path
    }

    pub fn line(&self) -> usize {
        self.location.line
    }

    pub fn col(&self) -> usize {
        self.location.col
    }
}

// ============================================================
// Issue Types
// ============================================================

/// A msgid with no translation in a catalog; the original text was kept.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MissingTranslationIssue {
    pub context: SourceContext,
    pub key: String,
    pub locale: String,
}

impl MissingTranslationIssue {
    pub fn severity() -> Severity {
        Severity::Warning
    }

    pub fn rule() -> Rule {
        Rule::MissingTranslation
    }
}

/// A translation call whose argument is not a string literal.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DynamicCallIssue {
    pub context: SourceContext,
    pub function: String,
}

impl DynamicCallIssue {
    pub fn severity() -> Severity {
        Severity::Warning
    }

    pub fn rule() -> Rule {
        Rule::DynamicCall
    }
}

/// The running offset lost sync with the buffer; the file was not written.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OffsetDriftIssue {
    pub context: SourceContext,
    pub locale: String,
    pub reason: String,
}

impl OffsetDriftIssue {
    pub fn severity() -> Severity {
        Severity::Error
    }

    pub fn rule() -> Rule {
        Rule::OffsetDrift
    }
}

/// A call site whose literal could not be read; the file was not written.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MalformedLiteralIssue {
    pub context: SourceContext,
    pub locale: String,
    pub reason: String,
}

impl MalformedLiteralIssue {
    pub fn severity() -> Severity {
        Severity::Error
    }

    pub fn rule() -> Rule {
        Rule::MalformedLiteral
    }
}

/// File could not be read or parsed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParseErrorIssue {
    pub file_path: String,
    pub error: String,
}

impl ParseErrorIssue {
    pub fn severity() -> Severity {
        Severity::Error
    }

    pub fn rule() -> Rule {
        Rule::ParseError
    }
}

// ============================================================
// Issue Enum
// ============================================================

#[enum_dispatch(Report)]
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Issue {
    MissingTranslation(MissingTranslationIssue),
    DynamicCall(DynamicCallIssue),
    OffsetDrift(OffsetDriftIssue),
    MalformedLiteral(MalformedLiteralIssue),
    ParseError(ParseErrorIssue),
}

impl Issue {
    /// Convert a failed splice into the matching issue.
    pub fn from_splice_error(context: SourceContext, locale: &str, error: &SpliceError) -> Self {
        match error {
            SpliceError::Drift { reason, .. } => Issue::OffsetDrift(OffsetDriftIssue {
                context,
                locale: locale.to_string(),
                reason: reason.to_string(),
            }),
            SpliceError::MalformedLiteral { reason, .. } => {
                Issue::MalformedLiteral(MalformedLiteralIssue {
                    context,
                    locale: locale.to_string(),
                    reason: reason.clone(),
                })
            }
        }
    }

    pub fn severity(&self) -> Severity {
        self.report_severity()
    }

    pub fn rule(&self) -> Rule {
        self.report_rule()
    }

    pub fn file_path(&self) -> &str {
        match self.location() {
            ReportLocation::Source(ctx) => ctx.file_path(),
            ReportLocation::File { path } => path,
        }
    }
}

// ============================================================
// Report Trait (for CLI output)
// ============================================================

/// Location information for report output.
pub enum ReportLocation<'a> {
    /// Source code location (has source_line for context display).
    Source(&'a SourceContext),
    /// File-level only (for ParseError - no line context).
    File { path: &'a str },
}

/// Interface the reporter uses to print any issue.
#[enum_dispatch]
pub trait Report {
    fn location(&self) -> ReportLocation<'_>;

    /// Primary message to display (key, reason, error, etc.).
    fn message(&self) -> String;

    fn report_severity(&self) -> Severity;

    fn report_rule(&self) -> Rule;

    /// Optional hint for fixing the issue.
    fn hint(&self) -> Option<String> {
        None
    }

    /// Optional details for the "= note:" line.
    fn details(&self) -> Option<String> {
        None
    }
}

// ============================================================
// Report Implementations
// ============================================================

impl Report for MissingTranslationIssue {
    fn location(&self) -> ReportLocation<'_> {
        ReportLocation::Source(&self.context)
    }

    fn message(&self) -> String {
        format!("missing translation for \"{}\"", self.key)
    }

    fn report_severity(&self) -> Severity {
        Self::severity()
    }

    fn report_rule(&self) -> Rule {
        Self::rule()
    }

    fn details(&self) -> Option<String> {
        Some(format!("no translation in {}, original text kept", self.locale))
    }
}

impl Report for DynamicCallIssue {
    fn location(&self) -> ReportLocation<'_> {
        ReportLocation::Source(&self.context)
    }

    fn message(&self) -> String {
        format!("{} called without a string literal", self.function)
    }

    fn report_severity(&self) -> Severity {
        Self::severity()
    }

    fn report_rule(&self) -> Rule {
        Self::rule()
    }

    fn hint(&self) -> Option<String> {
        Some(format!(
            "pass the message as a literal, e.g. `{}('Text')`",
            self.function
        ))
    }
}

impl Report for OffsetDriftIssue {
    fn location(&self) -> ReportLocation<'_> {
        ReportLocation::Source(&self.context)
    }

    fn message(&self) -> String {
        self.reason.clone()
    }

    fn report_severity(&self) -> Severity {
        Self::severity()
    }

    fn report_rule(&self) -> Rule {
        Self::rule()
    }

    fn details(&self) -> Option<String> {
        Some(format!("translation offset drift while building {}", self.locale))
    }
}

impl Report for MalformedLiteralIssue {
    fn location(&self) -> ReportLocation<'_> {
        ReportLocation::Source(&self.context)
    }

    fn message(&self) -> String {
        self.reason.clone()
    }

    fn report_severity(&self) -> Severity {
        Self::severity()
    }

    fn report_rule(&self) -> Rule {
        Self::rule()
    }

    fn details(&self) -> Option<String> {
        Some(format!("while building {}", self.locale))
    }
}

impl Report for ParseErrorIssue {
    fn location(&self) -> ReportLocation<'_> {
        ReportLocation::File {
            path: &self.file_path,
        }
    }

    fn message(&self) -> String {
        self.error.clone()
    }

    fn report_severity(&self) -> Severity {
        Self::severity()
    }

    fn report_rule(&self) -> Rule {
        Self::rule()
    }
}
