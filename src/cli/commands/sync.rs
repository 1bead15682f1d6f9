use std::collections::BTreeSet;
use std::io::{self, Write};

use anyhow::Result;
use colored::Colorize;

use super::super::args::SyncCommand;
use super::super::exit_status::ExitStatus;
use super::super::prompt::{LinePrompter, Prompter};
use super::super::report::{
    print_declined_to, print_dry_run_to, print_publish_to, print_review_to, print_suggestions_to,
};
use super::RunContext;
use crate::{
    core::{DiffState, Gate},
    pipeline::{Capability, DeletionDecision, PipelineError, SuggestionEntry},
};

pub fn sync(cmd: SyncCommand) -> Result<ExitStatus> {
    let mut prompter = LinePrompter::stdio();
    sync_with(cmd, &mut prompter, &mut io::stdout())
}

/// The gated run: review, confirm deletions, review spelling, publish.
///
/// Nothing is written before every gate has passed and `--apply` is given.
pub fn sync_with<W: Write>(
    cmd: SyncCommand,
    prompter: &mut dyn Prompter,
    out: &mut W,
) -> Result<ExitStatus> {
    let ctx = RunContext::new(&cmd.common)?;
    let plan = ctx.publish_plan(cmd.skip_remote_config);

    let mut required = Vec::new();
    if !cmd.no_correct {
        required.push(Capability::Correction);
    }
    if cmd.apply {
        if plan.remote_config {
            required.push(Capability::RemoteConfig);
        }
        if plan.repository {
            required.push(Capability::SnapshotStore);
        }
    }
    if let Some(missing) = required.into_iter().find(|c| !ctx.pipeline.has(*c)) {
        return Err(PipelineError::CapabilityUnavailable(missing).into());
    }

    let review = ctx.pipeline.review()?;
    ctx.write_conflict_log(review.conflicts())?;
    print_review_to(&review, out);

    let decision = match review.gate() {
        Gate::Blocked => return Ok(ExitStatus::Failure),
        Gate::UpToDate => return Ok(ExitStatus::Success),
        Gate::NeedsConfirmation => {
            let count = review
                .diff()
                .rows()
                .iter()
                .filter(|row| row.state == DiffState::Deleted)
                .count();
            if cmd.yes || prompter.confirm_deletion(count)? {
                DeletionDecision::Confirmed
            } else {
                DeletionDecision::Declined
            }
        }
        Gate::Clear => DeletionDecision::Declined,
    };

    let mut reconciliation = match review.proceed(decision) {
        Ok(reconciliation) => reconciliation,
        Err(PipelineError::DeletionNotConfirmed { count }) => {
            print_declined_to(count, out);
            return Ok(ExitStatus::Failure);
        }
        Err(err) => return Err(err.into()),
    };

    let selection = if cmd.no_correct || reconciliation.candidates().next().is_none() {
        BTreeSet::new()
    } else {
        let report = ctx.pipeline.compute_suggestions(&mut reconciliation)?;
        print_suggestions_to(&report, out);
        select_suggestions(&cmd, reconciliation.suggestions(), prompter, out)?
    };
    let mapping = reconciliation.apply_selection(&selection)?;

    if !cmd.apply {
        print_dry_run_to(&mapping, &plan, out);
        return Ok(ExitStatus::Success);
    }

    let report = ctx.pipeline.publish(&mapping, &plan)?;
    print_publish_to(&report, out);
    Ok(if report.is_success() {
        ExitStatus::Success
    } else {
        ExitStatus::Error
    })
}

/// Labels whose suggestion the operator takes, from flags or prompts.
fn select_suggestions<W: Write>(
    cmd: &SyncCommand,
    suggestions: &[SuggestionEntry],
    prompter: &mut dyn Prompter,
    out: &mut W,
) -> Result<BTreeSet<String>> {
    if cmd.accept_all {
        return Ok(suggestions.iter().map(|s| s.key.clone()).collect());
    }

    if !cmd.accept.is_empty() {
        let mut selection = BTreeSet::new();
        for label in &cmd.accept {
            if suggestions.iter().any(|s| &s.key == label) {
                selection.insert(label.clone());
            } else {
                writeln!(
                    out,
                    "{} no suggestion for \"{}\", keeping its text",
                    "warning:".bold().yellow(),
                    label
                )?;
            }
        }
        return Ok(selection);
    }

    let mut selection = BTreeSet::new();
    for suggestion in suggestions {
        if prompter.accept_suggestion(suggestion)? {
            selection.insert(suggestion.key.clone());
        }
    }
    Ok(selection)
}
