use std::io::{self, BufRead, IsTerminal, Write};

use crossterm::event::{self, Event, KeyCode, KeyEventKind, KeyModifiers};
use crossterm::style::Stylize;
use crossterm::terminal::{disable_raw_mode, enable_raw_mode};
use idlecheck_core::CredentialProvider;

/// Reads answers from stdin; secrets are typed without echo when stdin is a tty.
#[derive(Debug, Default)]
pub struct TerminalPrompt;

impl TerminalPrompt {
    pub fn new() -> Self {
        Self
    }

    fn show(prompt: &str) -> io::Result<()> {
        let mut out = io::stdout();
        writeln!(out, "{}", prompt.yellow())?;
        out.flush()
    }
}

impl CredentialProvider for TerminalPrompt {
    fn ask(&mut self, prompt: &str) -> io::Result<String> {
        Self::show(prompt)?;
        read_plain_line()
    }

    fn ask_secret(&mut self, prompt: &str) -> io::Result<String> {
        Self::show(prompt)?;
        if !io::stdin().is_terminal() {
            return read_plain_line();
        }

        enable_raw_mode()?;
        let result = read_hidden_line();
        disable_raw_mode()?;
        println!();
        result
    }
}

fn read_plain_line() -> io::Result<String> {
    let mut line = String::new();
    if io::stdin().lock().read_line(&mut line)? == 0 {
        return Err(io::Error::new(io::ErrorKind::UnexpectedEof, "stdin closed"));
    }
    Ok(line.trim_end_matches(['\r', '\n']).to_string())
}

fn read_hidden_line() -> io::Result<String> {
    let mut line = String::new();
    loop {
        let Event::Key(key) = event::read()? else {
            continue;
        };
        if key.kind != KeyEventKind::Press {
            continue;
        }
        match key.code {
            KeyCode::Enter => return Ok(line),
            KeyCode::Char('c') if key.modifiers.contains(KeyModifiers::CONTROL) => {
                // Raw mode swallows SIGINT.
                return Err(io::Error::new(
                    io::ErrorKind::Interrupted,
                    "password entry cancelled",
                ));
            }
            KeyCode::Char(c) => line.push(c),
            KeyCode::Backspace => {
                line.pop();
            }
            _ => {}
        }
    }
}
