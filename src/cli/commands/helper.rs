use super::{CommandResult, CommandSummary};
use crate::issues::{Issue, Severity};

pub fn finish(summary: CommandSummary, issues: Vec<Issue>) -> CommandResult {
    let mut error_count = issues
        .iter()
        .filter(|i| i.severity() == Severity::Error)
        .count();
    let warning_count = issues.len() - error_count;

    match &summary {
        CommandSummary::Init(init) if init.error.is_some() => error_count += 1,
        CommandSummary::Build(build) if build.failed > 0 && error_count == 0 => error_count += 1,
        _ => {}
    }

    CommandResult {
        summary,
        error_count,
        warning_count,
        issues,
    }
}
