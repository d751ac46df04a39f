//! Line-based prompting for the interactive browser.
//!
//! [`TerminalConsole`] reads through `rustyline`, completing on Tab against
//! whichever options the current menu offers.

use rustyline::completion::{Completer, Pair};
use rustyline::config::CompletionType;
use rustyline::error::ReadlineError;
use rustyline::highlight::Highlighter;
use rustyline::hint::Hinter;
use rustyline::history::DefaultHistory;
use rustyline::validate::Validator;
use rustyline::{Config, Editor, Helper};

#[derive(Debug, thiserror::Error)]
pub enum ConsoleError {
    #[error("Console closed")]
    Closed,
    #[error("Failed to read input: {0}")]
    Readline(#[from] ReadlineError),
}

pub trait Console {
    /// Prints one line of output.
    fn say(&mut self, line: &str);

    /// Prompts for one line of input. `options` are the answers the current
    /// menu accepts, offered as completions where the console supports it.
    fn ask(&mut self, prompt: &str, options: &[String]) -> Result<String, ConsoleError>;
}

#[derive(Default)]
struct MenuHelper {
    options: Vec<String>,
}

impl Completer for MenuHelper {
    type Candidate = Pair;

    fn complete(
        &self,
        line: &str,
        pos: usize,
        _ctx: &rustyline::Context<'_>,
    ) -> rustyline::Result<(usize, Vec<Pair>)> {
        // Option names contain spaces, so the whole line is the prefix.
        let input = line[..pos].to_lowercase();
        let matches = self
            .options
            .iter()
            .filter(|option| option.to_lowercase().starts_with(&input))
            .map(|option| Pair {
                display: option.clone(),
                replacement: option.clone(),
            })
            .collect();
        Ok((0, matches))
    }
}

impl Hinter for MenuHelper {
    type Hint = String;
}

impl Highlighter for MenuHelper {}
impl Validator for MenuHelper {}
impl Helper for MenuHelper {}

pub struct TerminalConsole {
    editor: Editor<MenuHelper, DefaultHistory>,
}

impl TerminalConsole {
    pub fn new() -> Result<Self, ConsoleError> {
        let config = Config::builder()
            .auto_add_history(true)
            .completion_type(CompletionType::List)
            .completion_prompt_limit(60)
            .build();

        let mut editor = Editor::with_config(config)?;
        editor.set_helper(Some(MenuHelper::default()));

        Ok(Self { editor })
    }
}

impl Console for TerminalConsole {
    fn say(&mut self, line: &str) {
        println!("{line}");
    }

    fn ask(&mut self, prompt: &str, options: &[String]) -> Result<String, ConsoleError> {
        if let Some(helper) = self.editor.helper_mut() {
            helper.options = options.to_vec();
        }

        match self.editor.readline(prompt) {
            Ok(line) => Ok(line),
            Err(ReadlineError::Interrupted | ReadlineError::Eof) => Err(ConsoleError::Closed),
            Err(e) => Err(e.into()),
        }
    }
}

#[cfg(test)]
pub(crate) mod testing {
    use std::collections::VecDeque;

    use super::{Console, ConsoleError};

    /// Replays canned answers and records everything printed.
    ///
    /// Running out of answers behaves like the user closing the terminal.
    #[derive(Debug, Default)]
    pub(crate) struct ScriptedConsole {
        answers: VecDeque<String>,
        pub(crate) output: Vec<String>,
        pub(crate) prompts: Vec<String>,
    }

    impl ScriptedConsole {
        pub(crate) fn new(answers: &[&str]) -> Self {
            Self {
                answers: answers.iter().map(|a| a.to_string()).collect(),
                ..Self::default()
            }
        }

        pub(crate) fn remaining(&self) -> usize {
            self.answers.len()
        }

        pub(crate) fn printed(&self, needle: &str) -> bool {
            self.output.iter().any(|line| line.contains(needle))
        }

        pub(crate) fn count_printed(&self, needle: &str) -> usize {
            self.output.iter().filter(|line| line.contains(needle)).count()
        }
    }

    impl Console for ScriptedConsole {
        fn say(&mut self, line: &str) {
            self.output.push(line.to_string());
        }

        fn ask(&mut self, prompt: &str, _options: &[String]) -> Result<String, ConsoleError> {
            self.prompts.push(prompt.to_string());
            self.answers.pop_front().ok_or(ConsoleError::Closed)
        }
    }
}
