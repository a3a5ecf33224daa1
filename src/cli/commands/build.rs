use anyhow::Result;

use super::super::args::BuildCommand;
use super::{BuildSummary, CommandResult, CommandSummary, helper::finish};
use crate::core::{ProjectContext, build::build as build_project};

pub fn build(cmd: BuildCommand) -> Result<CommandResult> {
    let args = &cmd.args;
    let mut overrides = args.common.overrides();
    overrides.out_dir = args.out_dir.clone();
    let ctx = ProjectContext::load(&args.common.root, &overrides, args.common.verbose)?;

    let outcome = build_project(&ctx)?;

    Ok(finish(
        CommandSummary::Build(BuildSummary {
            source_count: outcome.source_count,
            locales: outcome.locales,
            files_copied: outcome.files_copied,
            failed: outcome.failed,
        }),
        outcome.issues,
    ))
}
