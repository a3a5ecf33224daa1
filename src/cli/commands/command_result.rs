use std::path::PathBuf;

use crate::{
    core::{build::LocaleSummary, merge::MergedCatalog},
    issues::Issue,
};

#[derive(Debug)]
pub enum CommandSummary {
    Build(BuildSummary),
    Extract(ExtractSummary),
    Merge(MergeSummary),
    Init(InitSummary),
}

#[derive(Debug)]
pub struct BuildSummary {
    pub source_count: usize,
    pub locales: Vec<LocaleSummary>,
    pub files_copied: usize,
    /// Localized outputs that were not written.
    pub failed: usize,
}

#[derive(Debug)]
pub struct ExtractSummary {
    /// Project-relative template path, e.g. `po/Localization.pot`.
    pub template_path: String,
    pub file_count: usize,
    pub string_count: usize,
    /// False when parse errors kept the template from being written.
    pub written: bool,
}

#[derive(Debug)]
pub struct MergeSummary {
    pub catalogs: Vec<MergedCatalog>,
}

#[derive(Debug)]
pub struct InitSummary {
    pub path: PathBuf,
    /// Set when the config file already existed.
    pub error: Option<String>,
}

/// Result of running poglot commands
#[derive(Debug)]
pub struct CommandResult {
    pub summary: CommandSummary,
    pub error_count: usize,
    pub warning_count: usize,
    /// Issues found while running the command, in discovery order.
    pub issues: Vec<Issue>,
}
