//! Yes/no confirmation prompts.
//!
//! The organizer and subtitle matcher only see the [`Prompter`] trait, so a
//! run can be driven by a terminal ([`ConsolePrompter`]) or by a fixed list
//! of answers ([`ScriptedPrompter`]).

use std::collections::VecDeque;
use std::io::{self, BufRead, Write};

/// Question asked once per phase to enable batch mode.
pub const BATCH_MODE_QUESTION: &str =
    "Do you want to process all files without individual confirmations? (y/n): ";

/// Asks yes/no questions.
pub trait Prompter {
    /// Asks a question; returns true only for an affirmative answer.
    fn confirm(&mut self, question: &str) -> bool;

    /// Asks whether to skip per-file confirmations for the current phase.
    fn confirm_batch_mode(&mut self) -> bool {
        self.confirm(BATCH_MODE_QUESTION)
    }
}

/// Returns true when an answer means "yes": a lone `y`, any case.
///
/// # Examples
///
/// ```
/// use mediatidy::prompt::is_affirmative;
///
/// assert!(is_affirmative("Y\n"));
/// assert!(!is_affirmative("yes"));
/// ```
pub fn is_affirmative(answer: &str) -> bool {
    answer.trim().eq_ignore_ascii_case("y")
}

/// Prompts on a writer and reads answers line by line from a reader.
///
/// End of input or a read error counts as "no".
pub struct ConsolePrompter<R, W> {
    input: R,
    output: W,
}

impl ConsolePrompter<io::StdinLock<'static>, io::Stdout> {
    /// A prompter bound to the process's stdin and stdout.
    pub fn stdio() -> Self {
        Self::new(io::stdin().lock(), io::stdout())
    }
}

impl<R: BufRead, W: Write> ConsolePrompter<R, W> {
    pub fn new(input: R, output: W) -> Self {
        Self { input, output }
    }
}

impl<R: BufRead, W: Write> Prompter for ConsolePrompter<R, W> {
    fn confirm(&mut self, question: &str) -> bool {
        if write!(self.output, "{}", question)
            .and_then(|_| self.output.flush())
            .is_err()
        {
            return false;
        }

        let mut answer = String::new();
        match self.input.read_line(&mut answer) {
            Ok(0) | Err(_) => false,
            Ok(_) => is_affirmative(&answer),
        }
    }
}

/// Answers questions from a fixed script and records what was asked.
///
/// Once the script runs out every further question is answered "no".
#[derive(Debug, Default)]
pub struct ScriptedPrompter {
    answers: VecDeque<bool>,
    asked: Vec<String>,
}

impl ScriptedPrompter {
    pub fn new(answers: impl IntoIterator<Item = bool>) -> Self {
        Self {
            answers: answers.into_iter().collect(),
            asked: Vec::new(),
        }
    }

    /// Questions asked so far, in order.
    pub fn asked(&self) -> &[String] {
        &self.asked
    }

    /// Answers not consumed yet.
    pub fn remaining(&self) -> usize {
        self.answers.len()
    }
}

impl Prompter for ScriptedPrompter {
    fn confirm(&mut self, question: &str) -> bool {
        self.asked.push(question.to_string());
        self.answers.pop_front().unwrap_or(false)
    }
}
