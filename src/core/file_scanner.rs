use std::path::Path;

use colored::Colorize;
use glob::{MatchOptions, Pattern};
use walkdir::WalkDir;

const MATCH_OPTIONS: MatchOptions = MatchOptions {
    case_sensitive: true,
    require_literal_separator: true,
    require_literal_leading_dot: false,
};

/// Result of scanning files.
#[derive(Debug, Default)]
pub struct ScanResult {
    /// Matching files relative to the scanned directory, `/`-separated and sorted.
    pub files: Vec<String>,
    pub skipped_count: usize,
}

/// Compiled include/exclude pattern sets, matched against relative paths.
#[derive(Debug, Clone, Default)]
pub struct FileMatcher {
    includes: Vec<Pattern>,
    excludes: Vec<Pattern>,
}

impl FileMatcher {
    /// Invalid patterns are skipped; configs are validated before they get here.
    pub fn new(includes: &[String], excludes: &[String]) -> Self {
        let compile = |patterns: &[String]| -> Vec<Pattern> {
            patterns.iter().filter_map(|p| Pattern::new(p).ok()).collect()
        };
        Self {
            includes: compile(includes),
            excludes: compile(excludes),
        }
    }

    pub fn is_match(&self, relative_path: &str) -> bool {
        self.includes
            .iter()
            .any(|p| p.matches_with(relative_path, MATCH_OPTIONS))
            && !self
                .excludes
                .iter()
                .any(|p| p.matches_with(relative_path, MATCH_OPTIONS))
    }
}

/// Relative `/`-separated form of `path` under `base_dir`.
pub fn relative_path(base_dir: &Path, path: &Path) -> Option<String> {
    let relative = path.strip_prefix(base_dir).ok()?;
    let parts: Vec<_> = relative
        .components()
        .map(|c| c.as_os_str().to_string_lossy())
        .collect();
    Some(parts.join("/"))
}

pub fn scan_files(base_dir: &Path, matcher: &FileMatcher, verbose: bool) -> ScanResult {
    let mut result = ScanResult::default();

    if !base_dir.is_dir() {
        if verbose {
            eprintln!(
                "{} Directory does not exist: {}",
                "warning:".bold().yellow(),
                base_dir.display()
            );
        }
        return result;
    }

    for entry in WalkDir::new(base_dir) {
        let entry = match entry {
            Ok(e) => e,
            Err(e) => {
                result.skipped_count += 1;
                if verbose {
                    eprintln!("{} Cannot access path: {}", "warning:".bold().yellow(), e);
                }
                continue;
            }
        };
        if !entry.file_type().is_file() {
            continue;
        }
        if let Some(relative) = relative_path(base_dir, entry.path())
            && matcher.is_match(&relative)
        {
            result.files.push(relative);
        }
    }

    result.files.sort();
    result
}
