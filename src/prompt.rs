use anyhow::{bail, Context, Result};
use std::io::{self, BufRead};

use crate::ui;

/// Answer to a two-way disambiguation prompt.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Choice {
    First,
    Second,
}

/// Interactive confirmations, abstracted so installation logic can be
/// driven without a terminal attached.
pub trait Prompt {
    /// Ask a yes/no question. Implementations re-ask until they get an answer.
    fn confirm(&self, message: &str) -> Result<bool>;

    /// Ask the user to pick between two candidates by number.
    fn choose(&self, message: &str, first: &str, second: &str) -> Result<Choice>;
}

/// Prompt implementation that reads answers from standard input.
pub struct TerminalPrompt;

impl Prompt for TerminalPrompt {
    fn confirm(&self, message: &str) -> Result<bool> {
        loop {
            ui::prompt(format!("{message} (y/n):"));
            match read_answer()?.as_str() {
                "y" | "yes" => return Ok(true),
                "n" | "no" => return Ok(false),
                _ => continue,
            }
        }
    }

    fn choose(&self, message: &str, first: &str, second: &str) -> Result<Choice> {
        loop {
            ui::prompt(format!(
                "{message}\n1: {first}\n2: {second}\nWhich do you want to use (1/2):"
            ));
            match read_answer()?.as_str() {
                "1" => return Ok(Choice::First),
                "2" => return Ok(Choice::Second),
                _ => continue,
            }
        }
    }
}

fn read_answer() -> Result<String> {
    let mut line = String::new();
    let read = io::stdin()
        .lock()
        .read_line(&mut line)
        .context("Failed to read from stdin")?;

    if read == 0 {
        bail!("Standard input closed while waiting for an answer");
    }

    Ok(line.trim().to_ascii_lowercase())
}

/// Scripted prompt for tests: answers are consumed in order and running out
/// of answers is an error, so tests catch unexpected prompts.
#[cfg(test)]
pub(crate) struct ScriptedPrompt {
    confirms: std::cell::RefCell<std::collections::VecDeque<bool>>,
    choices: std::cell::RefCell<std::collections::VecDeque<Choice>>,
}

#[cfg(test)]
impl ScriptedPrompt {
    pub fn confirming(answers: &[bool]) -> Self {
        Self {
            confirms: std::cell::RefCell::new(answers.iter().copied().collect()),
            choices: std::cell::RefCell::new(std::collections::VecDeque::new()),
        }
    }

    pub fn choosing(choices: &[Choice]) -> Self {
        Self {
            confirms: std::cell::RefCell::new(std::collections::VecDeque::new()),
            choices: std::cell::RefCell::new(choices.iter().copied().collect()),
        }
    }
}

#[cfg(test)]
impl Prompt for ScriptedPrompt {
    fn confirm(&self, message: &str) -> Result<bool> {
        self.confirms
            .borrow_mut()
            .pop_front()
            .with_context(|| format!("Unexpected confirm prompt: {message}"))
    }

    fn choose(&self, message: &str, _first: &str, _second: &str) -> Result<Choice> {
        self.choices
            .borrow_mut()
            .pop_front()
            .with_context(|| format!("Unexpected choose prompt: {message}"))
    }
}
