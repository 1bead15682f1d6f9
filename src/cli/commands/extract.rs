use std::io::{self, Write};

use anyhow::{Context, Result};

use super::super::args::ExtractCommand;
use super::super::exit_status::ExitStatus;
use super::super::report::{
    print_conflicts_to, print_extraction_summary, print_extraction_to, print_saved_to,
};
use super::RunContext;
use crate::{core::detect_conflicts, pipeline::write_original_snapshot};

pub fn extract(cmd: ExtractCommand) -> Result<ExitStatus> {
    let ctx = RunContext::new(&cmd.common)?;
    let raw = ctx.pipeline.fetch_extraction()?;
    let grouped = raw.grouped();
    let conflicts = detect_conflicts(&raw);
    ctx.write_conflict_log(&conflicts)?;

    let mut out = io::stdout().lock();
    print_extraction_to(&raw, cmd.raw, &mut out).context("Failed to serialize the extraction")?;
    writeln!(out)?;
    print_conflicts_to(&conflicts, &mut out);

    if let Some(path) = &cmd.output {
        write_original_snapshot(&grouped, &ctx.root_dir.join(path))?;
        print_saved_to(path, &mut out);
    }
    print_extraction_summary(&grouped, &conflicts, &mut out);

    Ok(ExitStatus::Success)
}
