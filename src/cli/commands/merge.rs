use anyhow::Result;

use super::super::args::MergeCommand;
use super::{CommandResult, CommandSummary, MergeSummary, helper::finish};
use crate::core::{ProjectContext, merge::merge_all};

pub fn merge(cmd: MergeCommand) -> Result<CommandResult> {
    let args = &cmd.args;
    let ctx = ProjectContext::load(
        &args.common.root,
        &args.common.overrides(),
        args.common.verbose,
    )?;

    let catalogs = merge_all(&ctx)?;

    Ok(finish(
        CommandSummary::Merge(MergeSummary { catalogs }),
        Vec::new(),
    ))
}
