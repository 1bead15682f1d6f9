use anyhow::Result;

use super::super::args::DiffCommand;
use super::super::exit_status::ExitStatus;
use super::super::report::print_review;
use super::RunContext;
use crate::core::Gate;

pub fn diff(cmd: DiffCommand) -> Result<ExitStatus> {
    let ctx = RunContext::new(&cmd.common)?;
    let review = ctx.pipeline.review()?;
    ctx.write_conflict_log(review.conflicts())?;

    print_review(&review);

    Ok(match review.gate() {
        Gate::Blocked => ExitStatus::Failure,
        Gate::UpToDate | Gate::NeedsConfirmation | Gate::Clear => ExitStatus::Success,
    })
}
