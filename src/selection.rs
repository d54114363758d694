//! Interactive "pick one from a list" protocol.
//!
//! Each step of the departure lookup presents the candidate names, takes one
//! answer from the rider (or from a pre-supplied value) and hands back the
//! matching candidate.

use std::io::{self, BufRead, Stdin, StdinLock, Stdout, Write};

use tracing::debug;

use crate::error::{Error, Result};

/// Line-oriented console the rider talks to.
pub struct Console<R, W> {
    input: R,
    output: W,
}

impl Console<StdinLock<'static>, Stdout> {
    /// Console on the process's stdin and stdout.
    pub fn stdio() -> Self {
        let stdin: Stdin = io::stdin();
        Self::new(stdin.lock(), io::stdout())
    }
}

impl<R: BufRead, W: Write> Console<R, W> {
    pub fn new(input: R, output: W) -> Self {
        Self { input, output }
    }

    /// Consumes the console, returning the output stream.
    pub fn into_output(self) -> W {
        self.output
    }

    /// Writes one line of text.
    pub fn say(&mut self, line: &str) -> Result<()> {
        writeln!(self.output, "{line}")?;
        Ok(())
    }

    /// Asks the rider to choose one of `candidates` by display name.
    ///
    /// `provided` answers the question without reading input. Matching is
    /// exact and case-sensitive; with duplicate names the first candidate
    /// wins.
    ///
    /// # Errors
    ///
    /// [`Error::SelectionNotFound`] if the answer names no candidate.
    pub fn select<T, F>(
        &mut self,
        mut candidates: Vec<T>,
        name_of: F,
        label: &str,
        provided: Option<&str>,
    ) -> Result<T>
    where
        F: Fn(&T) -> &str,
    {
        writeln!(self.output, "Which {label} are you taking?")?;
        for candidate in &candidates {
            writeln!(self.output, "{}", name_of(candidate))?;
        }

        let choice = match provided {
            Some(answer) => answer.to_string(),
            None => self.read_choice(label)?,
        };

        let Some(index) = candidates.iter().position(|c| name_of(c) == choice) else {
            return Err(Error::SelectionNotFound {
                choice,
                label: label.to_string(),
            });
        };

        writeln!(self.output, "You entered: {choice}\n")?;
        debug!(label, choice = %choice, index, "Selection accepted");

        Ok(candidates.swap_remove(index))
    }

    fn read_choice(&mut self, label: &str) -> Result<String> {
        writeln!(self.output, "Please enter one of the {label}s as a string: ")?;
        self.output.flush()?;

        let mut line = String::new();
        self.input.read_line(&mut line)?;

        // Only the terminator is removed.
        if line.ends_with('\n') {
            line.pop();
            if line.ends_with('\r') {
                line.pop();
            }
        }
        Ok(line)
    }
}
