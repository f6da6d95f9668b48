//! Status lines and the resolution spinner. Everything goes to stderr so
//! command output on stdout stays clean.

use std::io::Write;
use std::time::Duration;

use console::Style;
use indicatif::{ProgressBar, ProgressStyle};

#[derive(Clone, Copy)]
enum Tone {
    Action,
    Info,
    Warn,
}

impl Tone {
    fn style(self) -> Style {
        match self {
            Tone::Action => Style::new().green().bold(),
            Tone::Info => Style::new().cyan().bold(),
            Tone::Warn => Style::new().yellow().bold(),
        }
    }
}

/// `label` right-aligned to 12 columns, then the message.
fn emit(tone: Tone, label: &str, message: &str) {
    let _ = writeln!(
        std::io::stderr(),
        "{:>12} {message}",
        tone.style().apply_to(label)
    );
}

/// Something was done: `       Wrote deps.dot`
pub fn status(label: &str, message: &str) {
    emit(Tone::Action, label, message);
}

/// A summary or other non-action note.
pub fn status_info(label: &str, message: &str) {
    emit(Tone::Info, label, message);
}

/// Degraded but non-fatal outcome.
pub fn status_warn(label: &str, message: &str) {
    emit(Tone::Warn, label, message);
}

/// Ticking spinner with elapsed time, for a traversal of unknown size.
///
/// Hidden automatically when stderr is not a terminal. Finish it with
/// [`ProgressBar::finish_and_clear`].
pub fn spinner(message: &str) -> ProgressBar {
    let style = ProgressStyle::with_template("{spinner:.green} {msg} ({elapsed})")
        .unwrap_or_else(|_| ProgressStyle::default_spinner());
    let pb = ProgressBar::new_spinner()
        .with_style(style)
        .with_message(message.to_string());
    pb.enable_steady_tick(Duration::from_millis(80));
    pb
}
