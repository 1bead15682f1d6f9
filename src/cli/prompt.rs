//! Operator prompts for the soft stops of `sync`.

use std::io::{self, BufRead, Write};

use anyhow::Result;
use colored::Colorize;

use crate::pipeline::SuggestionEntry;

pub trait Prompter {
    /// Ask before deleting published labels. Only a typed `yes` confirms.
    fn confirm_deletion(&mut self, count: usize) -> Result<bool>;

    /// Ask whether to take one spelling suggestion.
    fn accept_suggestion(&mut self, suggestion: &SuggestionEntry) -> Result<bool>;
}

/// Line-based prompter. End of input answers no.
pub struct LinePrompter<R, W> {
    input: R,
    output: W,
}

impl LinePrompter<io::StdinLock<'static>, io::Stdout> {
    pub fn stdio() -> Self {
        Self::new(io::stdin().lock(), io::stdout())
    }
}

impl<R: BufRead, W: Write> LinePrompter<R, W> {
    pub fn new(input: R, output: W) -> Self {
        Self { input, output }
    }

    fn ask(&mut self, question: &str) -> Result<String> {
        write!(self.output, "{} ", question)?;
        self.output.flush()?;
        let mut line = String::new();
        if self.input.read_line(&mut line)? == 0 {
            writeln!(self.output)?;
        }
        Ok(line.trim().to_lowercase())
    }
}

impl<R: BufRead, W: Write> Prompter for LinePrompter<R, W> {
    fn confirm_deletion(&mut self, count: usize) -> Result<bool> {
        let answer = self.ask(&format!(
            "{} label(s) will be deleted. Type {} to continue:",
            count,
            "yes".bold()
        ))?;
        Ok(answer == "yes")
    }

    fn accept_suggestion(&mut self, suggestion: &SuggestionEntry) -> Result<bool> {
        let answer = self.ask(&format!(
            "{}: \"{}\" -> \"{}\" accept? [s/n]",
            suggestion.key.bold(),
            suggestion.original,
            suggestion.suggested.green()
        ))?;
        Ok(is_affirmative(&answer))
    }
}

fn is_affirmative(answer: &str) -> bool {
    matches!(answer, "s" | "si" | "sí" | "y" | "yes")
}
