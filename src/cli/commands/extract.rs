use std::fs;

use anyhow::{Context, Result};

use super::super::args::ExtractCommand;
use super::{CommandResult, CommandSummary, ExtractSummary, helper::finish};
use crate::core::{ProjectContext, pot::extract_messages};

/// Extract messages and write the template. Nothing is written when a
/// source fails to parse.
pub fn extract(cmd: ExtractCommand) -> Result<CommandResult> {
    let args = &cmd.args;
    let ctx = ProjectContext::load(
        &args.common.root,
        &args.common.overrides(),
        args.common.verbose,
    )?;

    let outcome = extract_messages(&ctx)?;
    let written = !outcome.has_parse_errors();
    if written {
        let path = ctx.template_path();
        fs::create_dir_all(ctx.po_root())
            .with_context(|| format!("Failed to create directory {:?}", ctx.po_root()))?;
        fs::write(&path, outcome.template.to_po_string())
            .with_context(|| format!("Failed to write template: {:?}", path))?;
    }

    let template_path = ctx.display_path(
        &ctx.config.po_root,
        &format!("{}.pot", ctx.config.catalog_name),
    );
    Ok(finish(
        CommandSummary::Extract(ExtractSummary {
            template_path,
            file_count: outcome.file_count,
            string_count: outcome.string_count,
            written,
        }),
        outcome.issues,
    ))
}
