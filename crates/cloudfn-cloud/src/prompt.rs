//! Interactive prompts

use crate::error::{CloudError, Result};
#[cfg(any(test, feature = "testing"))]
use std::collections::VecDeque;
use std::io::Write;

const YES: &[&str] = &["yes", "y", "ye"];
const NO: &[&str] = &["no", "n"];

/// Source of answers to interactive questions
pub trait Prompter {
    /// Ask a free-form question and return the trimmed answer
    fn input(&mut self, message: &str) -> Result<String>;

    /// Answer every yes/no question with its default
    fn assume_defaults(&self) -> bool {
        false
    }

    /// Ask a yes/no question until the answer is recognised
    ///
    /// An empty answer selects `default`.
    fn confirm(&mut self, message: &str, default: bool) -> Result<bool> {
        if self.assume_defaults() {
            return Ok(default);
        }

        let retry = if default {
            "Please respond with Y/n: "
        } else {
            "Please respond with y/N: "
        };

        let mut answer = self.input(message)?.to_lowercase();
        loop {
            if answer.is_empty() {
                return Ok(default);
            }
            if YES.contains(&answer.as_str()) {
                return Ok(true);
            }
            if NO.contains(&answer.as_str()) {
                return Ok(false);
            }
            answer = self.input(retry)?.to_lowercase();
        }
    }
}

/// Prompts on stdout and reads answers from stdin
#[derive(Debug, Default)]
pub struct StdinPrompter {
    assume_yes: bool,
}

impl StdinPrompter {
    pub fn new(assume_yes: bool) -> Self {
        Self { assume_yes }
    }
}

impl Prompter for StdinPrompter {
    fn input(&mut self, message: &str) -> Result<String> {
        print!("{}", message);
        std::io::stdout().flush()?;

        let mut input = String::new();
        let read = std::io::stdin().read_line(&mut input)?;
        if read == 0 {
            return Err(CloudError::Prompt(format!(
                "stdin closed while waiting for an answer to '{}'",
                message.trim()
            )));
        }
        Ok(input.trim().to_string())
    }

    fn assume_defaults(&self) -> bool {
        self.assume_yes
    }
}

/// Replays canned answers and records every question asked
#[cfg(any(test, feature = "testing"))]
#[derive(Debug, Default)]
pub struct ScriptedPrompter {
    answers: VecDeque<String>,
    asked: Vec<String>,
    assume_yes: bool,
}

#[cfg(any(test, feature = "testing"))]
impl ScriptedPrompter {
    pub fn new<I, S>(answers: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            answers: answers.into_iter().map(Into::into).collect(),
            asked: Vec::new(),
            assume_yes: false,
        }
    }

    pub fn assuming_defaults(mut self) -> Self {
        self.assume_yes = true;
        self
    }

    /// Questions asked so far, in order
    pub fn asked(&self) -> &[String] {
        &self.asked
    }
}

#[cfg(any(test, feature = "testing"))]
impl Prompter for ScriptedPrompter {
    fn input(&mut self, message: &str) -> Result<String> {
        self.asked.push(message.to_string());
        self.answers
            .pop_front()
            .map(|a| a.trim().to_string())
            .ok_or_else(|| CloudError::Prompt(format!("no scripted answer for '{}'", message)))
    }

    fn assume_defaults(&self) -> bool {
        self.assume_yes
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_confirm_answers() {
        let mut prompter = ScriptedPrompter::new(["Y", "ye", "No", "", ""]);
        assert!(prompter.confirm("q1 [Y/n]: ", true).unwrap());
        assert!(prompter.confirm("q2 [Y/n]: ", true).unwrap());
        assert!(!prompter.confirm("q3 [Y/n]: ", true).unwrap());
        assert!(prompter.confirm("q4 [Y/n]: ", true).unwrap());
        assert!(!prompter.confirm("q5 [y/N]: ", false).unwrap());
    }

    #[test]
    fn test_confirm_reprompts_on_invalid_answer() {
        let mut prompter = ScriptedPrompter::new(["maybe", "sure", "y"]);
        assert!(prompter.confirm("Delete? [y/N]: ", false).unwrap());
        assert_eq!(
            prompter.asked(),
            &[
                "Delete? [y/N]: ".to_string(),
                "Please respond with y/N: ".to_string(),
                "Please respond with y/N: ".to_string(),
            ]
        );
    }

    #[test]
    fn test_assume_defaults_skips_questions() {
        let mut prompter = ScriptedPrompter::new(Vec::<String>::new()).assuming_defaults();
        assert!(!prompter.confirm("Delete? [y/N]: ", false).unwrap());
        assert!(prompter.confirm("Use default? [Y/n]: ", true).unwrap());
        assert!(prompter.asked().is_empty());
    }

    #[test]
    fn test_exhausted_script_is_error() {
        let mut prompter = ScriptedPrompter::new(Vec::<String>::new());
        assert!(matches!(prompter.input("name: "), Err(CloudError::Prompt(_))));
    }
}
