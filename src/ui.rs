use anstyle::{AnsiColor, Style};
use is_terminal::IsTerminal;
use std::fmt::Display;
use std::io::{self, Write};
use std::time::{Duration, Instant};

const STATUS_WIDTH: usize = 12;

#[derive(Debug, Clone, Copy)]
enum StatusKind {
    Pending,
    Success,
    Info,
    Warn,
    Error,
}

fn supports_color(stderr: bool) -> bool {
    let tty = if stderr {
        io::stderr().is_terminal()
    } else {
        io::stdout().is_terminal()
    };
    tty && std::env::var_os("NO_COLOR").is_none()
}

fn style_for(kind: StatusKind) -> Style {
    let style = Style::new().bold();
    match kind {
        StatusKind::Pending => style.fg_color(Some(AnsiColor::Cyan.into())),
        StatusKind::Success => style.fg_color(Some(AnsiColor::Green.into())),
        StatusKind::Info => style.fg_color(Some(AnsiColor::Blue.into())),
        StatusKind::Warn => style.fg_color(Some(AnsiColor::Yellow.into())),
        StatusKind::Error => style.fg_color(Some(AnsiColor::Red.into())),
    }
}

fn write_status(kind: StatusKind, label: &str, message: &str) {
    let to_stderr = matches!(kind, StatusKind::Warn | StatusKind::Error);
    let use_color = supports_color(to_stderr);

    let mut handle: Box<dyn Write> = if to_stderr {
        Box::new(io::stderr().lock())
    } else {
        Box::new(io::stdout().lock())
    };

    let padded_label = format!("{:>width$}", label, width = STATUS_WIDTH);

    if use_color {
        let style = style_for(kind);
        let _ = writeln!(
            handle,
            "{}{padded_label}{} {message}",
            style.render(),
            style.render_reset()
        );
    } else {
        let _ = writeln!(handle, "{padded_label} {message}");
    }
    let _ = handle.flush();
}

fn format_duration(duration: Duration) -> String {
    if duration.as_secs() >= 60 {
        let minutes = duration.as_secs() / 60;
        let seconds = duration.as_secs() % 60;
        if seconds == 0 {
            format!("{minutes}m")
        } else {
            format!("{minutes}m {seconds}s")
        }
    } else if duration.as_secs_f64() >= 1.0 {
        format!("{:.2}s", duration.as_secs_f64())
    } else {
        format!("{}ms", duration.as_millis())
    }
}

pub fn status(label: &str, message: impl Display) {
    write_status(StatusKind::Pending, label, &message.to_string());
}

pub fn info(message: impl Display) {
    write_status(StatusKind::Info, "Info", &message.to_string());
}

pub fn warn(message: impl Display) {
    write_status(StatusKind::Warn, "Warning", &message.to_string());
}

pub fn error(message: impl Display) {
    write_status(StatusKind::Error, "Error", &message.to_string());
}

pub fn success(label: &str, message: impl Display) {
    write_status(StatusKind::Success, label, &message.to_string());
}

/// Write an inline question to stderr without a trailing newline.
pub fn prompt(message: impl Display) {
    let use_color = supports_color(true);
    let mut handle = io::stderr().lock();

    if use_color {
        let style = style_for(StatusKind::Warn);
        let _ = write!(handle, "{}{message}{} ", style.render(), style.render_reset());
    } else {
        let _ = write!(handle, "{message} ");
    }
    let _ = handle.flush();
}

/// Long-running operation reporter used for downloads and git clones.
pub struct Progress {
    message: String,
    started: Instant,
    complete: bool,
}

impl Progress {
    pub fn new(label: &str, message: impl Into<String>) -> Self {
        let message = message.into();
        write_status(StatusKind::Pending, label, &message);

        Self {
            message,
            started: Instant::now(),
            complete: false,
        }
    }

    pub fn success(mut self, label: &str) {
        if self.complete {
            return;
        }

        self.complete = true;
        let elapsed = format_duration(self.started.elapsed());
        write_status(
            StatusKind::Success,
            label,
            &format!("{} in {}", self.message, elapsed),
        );
    }

    pub fn fail(mut self, error: impl Display) {
        if self.complete {
            return;
        }

        self.complete = true;
        let elapsed = format_duration(self.started.elapsed());
        write_status(
            StatusKind::Error,
            "Failed",
            &format!("{} after {}: {}", self.message, elapsed, error),
        );
    }
}

impl Drop for Progress {
    fn drop(&mut self) {
        if !self.complete {
            write_status(StatusKind::Warn, "Cancelled", &format!("{} (aborted)", self.message));
            self.complete = true;
        }
    }
}
