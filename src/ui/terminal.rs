//! Line-based terminal interaction
//!
//! `Terminal` reads answers line by line from any `BufRead` and writes to
//! any `Write`, so sessions can be driven from stdin or from a script.

use crate::digest::{Command, DigestedPage, SessionUi};
use crate::output::{format_digest_page, format_link_menu, format_session_help};
use crate::ui::clipboard::copy_to_clipboard;
use std::io::{self, BufRead, Write};

/// Interactive terminal over a reader and a writer
pub struct Terminal<R, W> {
    input: R,
    output: W,
}

impl Terminal<io::StdinLock<'static>, io::Stdout> {
    /// Terminal over the process's stdin and stdout
    pub fn stdio() -> Self {
        Self::new(io::stdin().lock(), io::stdout())
    }
}

impl<R: BufRead, W: Write> Terminal<R, W> {
    pub fn new(input: R, output: W) -> Self {
        Self { input, output }
    }

    pub fn into_output(self) -> W {
        self.output
    }

    /// Writes a line of text
    pub fn say(&mut self, text: &str) -> io::Result<()> {
        writeln!(self.output, "{}", text)
    }

    /// Prints `question` and reads one line; `None` at end of input
    pub fn ask(&mut self, question: &str) -> io::Result<Option<String>> {
        write!(self.output, "{}", question)?;
        self.output.flush()?;

        let mut line = String::new();
        if self.input.read_line(&mut line)? == 0 {
            return Ok(None);
        }
        Ok(Some(line.trim().to_string()))
    }

    /// Asks with a default used for blank answers and end of input
    pub fn ask_with_default(&mut self, question: &str, default: &str) -> io::Result<String> {
        let answer = self.ask(&format!("{} [{}]: ", question, default))?;
        Ok(match answer {
            Some(a) if !a.is_empty() => a,
            _ => default.to_string(),
        })
    }

    /// Asks until a non-blank answer is given; `None` at end of input
    pub fn ask_required(&mut self, question: &str) -> io::Result<Option<String>> {
        loop {
            match self.ask(&format!("{}: ", question))? {
                None => return Ok(None),
                Some(a) if !a.is_empty() => return Ok(Some(a)),
                Some(_) => self.say("A value is required.")?,
            }
        }
    }

    /// Yes/no question
    pub fn confirm(&mut self, question: &str, default: bool) -> io::Result<bool> {
        let hint = if default { "Y/n" } else { "y/N" };
        let answer = self.ask(&format!("{} [{}] ", question, hint))?;
        Ok(match answer.as_deref().map(str::to_ascii_lowercase).as_deref() {
            Some("y") | Some("yes") => true,
            Some("n") | Some("no") => false,
            _ => default,
        })
    }
}

impl<R: BufRead, W: Write> SessionUi for Terminal<R, W> {
    fn show_page(&mut self, page: &DigestedPage, level: usize) -> io::Result<()> {
        self.say(&format_digest_page(page, level))
    }

    fn choose_command(&mut self, commands: &[Command]) -> io::Result<Command> {
        let keys: Vec<String> = commands.iter().map(|c| c.key().to_string()).collect();
        let menu = commands
            .iter()
            .map(|c| format!("  {}) {}", c.key(), c.label()))
            .collect::<Vec<_>>()
            .join("\n");
        self.say(&menu)?;

        loop {
            let answer = self.ask(&format!("Choose an action [{}] (default q): ", keys.join("/")))?;
            let Some(answer) = answer else {
                return Ok(Command::Quit);
            };
            if answer.is_empty() {
                return Ok(Command::Quit);
            }
            match Command::from_key(&answer) {
                Some(command) if commands.contains(&command) => return Ok(command),
                _ => self.say(&format!("'{}' is not an available action.", answer))?,
            }
        }
    }

    fn choose_link(&mut self, links: &[String]) -> io::Result<Option<String>> {
        self.say(&format_link_menu(links))?;

        loop {
            let answer = self.ask(&format!("Link to digest (1-{}, blank to cancel): ", links.len()))?;
            let Some(answer) = answer.filter(|a| !a.is_empty()) else {
                return Ok(None);
            };
            match answer.parse::<usize>() {
                Ok(n) if (1..=links.len()).contains(&n) => return Ok(Some(links[n - 1].clone())),
                _ => self.say("Please enter one of the listed numbers.")?,
            }
        }
    }

    fn show_help(&mut self, commands: &[Command]) -> io::Result<()> {
        self.say(&format_session_help(commands))
    }

    fn copy(&mut self, text: &str) -> io::Result<()> {
        copy_to_clipboard(text)
    }

    fn notify(&mut self, message: &str) -> io::Result<()> {
        self.say(message)
    }

    fn progress(&mut self, message: &str) {
        let _ = writeln!(self.output, "  {}", message);
    }
}
