/// Semantic colour of a run-log line.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Tone {
    Success,
    Failure,
    Highlight,
    Neutral,
}

/// Operator-facing run log. One instance per run, passed down explicitly.
pub trait EventSink: Send {
    /// Write `message` to the log file, and to the console when `echo` is set.
    fn log(&mut self, tone: Tone, message: &str, echo: bool);

    /// Console-only progress line.
    fn progress(&mut self, message: &str);

    /// Visual separator between sections.
    fn blank(&mut self);

    fn info(&mut self, message: &str) {
        self.log(Tone::Neutral, message, true);
    }

    fn success(&mut self, message: &str) {
        self.log(Tone::Success, message, true);
    }

    fn failure(&mut self, message: &str) {
        self.log(Tone::Failure, message, true);
    }
}
