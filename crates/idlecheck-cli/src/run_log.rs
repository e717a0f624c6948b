use std::fs::{self, File, OpenOptions};
use std::io::{self, BufWriter, IsTerminal, Write};
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use chrono::{DateTime, Local};
use crossterm::style::Stylize;
use idlecheck_core::{EventSink, Tone};
use tracing::warn;

const TIMESTAMP: &str = "%Y-%m-%d %H:%M:%S%.6f";

/// Console plus one append-only log file per calendar day.
pub struct RunLog {
    dir: PathBuf,
    current_day: String,
    writer: BufWriter<File>,
    console: Box<dyn Write + Send>,
    colour: bool,
}

impl RunLog {
    pub fn open(dir: &Path) -> Result<Self> {
        let colour = io::stdout().is_terminal();
        Self::with_console(dir, Box::new(io::stdout()), colour, Local::now())
    }

    pub(crate) fn with_console(
        dir: &Path,
        console: Box<dyn Write + Send>,
        colour: bool,
        now: DateTime<Local>,
    ) -> Result<Self> {
        fs::create_dir_all(dir)
            .with_context(|| format!("failed to create log directory {}", dir.display()))?;
        let day = now.format("%Y-%m-%d").to_string();
        let writer = Self::open_writer(dir, &day)?;

        Ok(Self {
            dir: dir.to_path_buf(),
            current_day: day,
            writer,
            console,
            colour,
        })
    }

    pub fn file_path(dir: &Path, day: &str) -> PathBuf {
        dir.join(format!("connecCheckLogs_{day}.log"))
    }

    pub fn current_path(&self) -> PathBuf {
        Self::file_path(&self.dir, &self.current_day)
    }

    fn open_writer(dir: &Path, day: &str) -> Result<BufWriter<File>> {
        let path = Self::file_path(dir, day);
        let file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&path)
            .with_context(|| format!("failed to open log file {}", path.display()))?;
        Ok(BufWriter::new(file))
    }

    fn rotate_if_needed(&mut self, now: DateTime<Local>) -> Result<()> {
        let day = now.format("%Y-%m-%d").to_string();
        if day != self.current_day {
            self.writer.flush()?;
            self.writer = Self::open_writer(&self.dir, &day)?;
            self.current_day = day;
        }
        Ok(())
    }

    pub(crate) fn write_at(
        &mut self,
        now: DateTime<Local>,
        tone: Tone,
        message: &str,
        echo: bool,
    ) -> Result<()> {
        let ts = now.format(TIMESTAMP);
        self.rotate_if_needed(now)?;
        write!(self.writer, "\n{ts}    {message}")?;
        self.writer.flush()?;

        if echo {
            let line = self.paint(tone, message);
            writeln!(self.console, "{ts} {line}")?;
            self.console.flush()?;
        }
        Ok(())
    }

    fn paint(&self, tone: Tone, message: &str) -> String {
        if !self.colour {
            return message.to_string();
        }
        match tone {
            Tone::Success => message.green().to_string(),
            Tone::Failure => message.red().to_string(),
            Tone::Highlight => message.yellow().to_string(),
            Tone::Neutral => message.to_string(),
        }
    }
}

impl EventSink for RunLog {
    fn log(&mut self, tone: Tone, message: &str, echo: bool) {
        if let Err(err) = self.write_at(Local::now(), tone, message, echo) {
            warn!(error = %err, "failed to write run log entry");
        }
    }

    fn progress(&mut self, message: &str) {
        let ts = Local::now().format(TIMESTAMP);
        if let Err(err) = writeln!(self.console, "{ts} {message}") {
            warn!(error = %err, "failed to write progress line");
        }
    }

    fn blank(&mut self) {
        if let Err(err) = writeln!(self.console) {
            warn!(error = %err, "failed to write blank line");
        }
    }
}
