//! Line-based console interaction.
//!
//! Prompts and menus go through the [`Console`] trait so the interactive
//! flows can be driven by scripted input in tests.

use anyhow::{bail, Context, Result};
use std::io::{self, BufRead, Write};
use std::time::Duration;

/// Source of user answers and sink for menu text.
pub trait Console {
    /// Shows `prompt` and returns the next line of input, trimmed.
    ///
    /// Fails only when input can no longer be read (e.g. stdin closed).
    fn ask(&mut self, prompt: &str) -> Result<String>;

    /// Prints one line of menu or status text.
    fn say(&mut self, line: &str);
}

/// Console backed by the process's stdin/stdout.
pub struct Terminal;

impl Console for Terminal {
    fn ask(&mut self, prompt: &str) -> Result<String> {
        print!("{}", prompt);
        io::stdout().flush().context("Failed to flush stdout")?;

        let mut line = String::new();
        let read = io::stdin()
            .lock()
            .read_line(&mut line)
            .context("Failed to read from stdin")?;
        if read == 0 {
            bail!("Input closed while waiting for an answer");
        }

        Ok(line.trim().to_string())
    }

    fn say(&mut self, line: &str) {
        println!("{}", line);
    }
}

/// Asks repeatedly until `parse` accepts the answer.
///
/// `parse` returns the value or the message to show before asking again.
pub fn ask_until<T>(
    console: &mut dyn Console,
    prompt: &str,
    mut parse: impl FnMut(&str) -> Result<T, String>,
) -> Result<T> {
    loop {
        let answer = console.ask(prompt)?;
        match parse(&answer) {
            Ok(value) => return Ok(value),
            Err(msg) => console.say(&msg),
        }
    }
}

/// Parses a strictly positive integer.
pub fn parse_positive_int(input: &str) -> Result<u32, String> {
    match input.trim().parse::<i64>() {
        Ok(n) if n > 0 => u32::try_from(n).map_err(|_| "Number is too large.".to_string()),
        Ok(_) => Err("Please enter a positive number.".to_string()),
        Err(_) => Err("Please enter a valid number.".to_string()),
    }
}

/// Parses a strictly positive number of seconds, using `default` for blank input.
pub fn parse_positive_secs(input: &str, default: Duration) -> Result<Duration, String> {
    let input = input.trim();
    if input.is_empty() {
        return Ok(default);
    }
    match input.parse::<f64>() {
        Ok(secs) if secs > 0.0 => Duration::try_from_secs_f64(secs)
            .map_err(|_| "Please enter a positive number.".to_string()),
        Ok(_) => Err("Please enter a positive number.".to_string()),
        Err(_) => Err("Please enter a valid number.".to_string()),
    }
}
