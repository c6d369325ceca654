//! Logging utilities with colored output and a progress bar.
//!
//! This module provides:
//! - `log!` macro for formatted terminal output with colored prefixes
//! - `Progress` for displaying a single progress bar during the parallel
//!   parse phase
//!
//! # Example
//!
//! ```ignore
//! log!("corpus"; "found {} posts", count);
//!
//! let progress = Progress::start("corpus", files.len());
//! progress.inc();
//! progress.finish();
//! ```

use colored::{ColoredString, Colorize};
use crossterm::{
    cursor, execute,
    terminal::{Clear, ClearType, size},
};
use std::{
    io::{Write, stdout},
    sync::{
        Mutex, OnceLock,
        atomic::{AtomicBool, AtomicUsize, Ordering},
    },
};

/// Cached terminal width (fetched once on first use)
static TERMINAL_WIDTH: OnceLock<u16> = OnceLock::new();

/// Whether a progress bar currently owns the bottom terminal line
static BAR_ACTIVE: AtomicBool = AtomicBool::new(false);

/// Minimum progress bar width in characters
const MIN_BAR_WIDTH: usize = 10;
/// Maximum progress bar width in characters
const MAX_BAR_WIDTH: usize = 40;

/// Total prefix length for a module name: `[`, name, `]`, trailing space.
#[inline]
const fn calc_prefix_len(module_len: usize) -> usize {
    module_len + 3
}

/// Get terminal width, cached after first call.
/// Falls back to 120 columns if detection fails.
fn get_terminal_width() -> u16 {
    *TERMINAL_WIDTH.get_or_init(|| size().map(|(w, _)| w).unwrap_or(120))
}

// ============================================================================
// Log Macro
// ============================================================================

/// Log a message with a colored module prefix.
///
/// # Usage
/// ```ignore
/// log!("module"; "message with {} formatting", args);
/// ```
#[macro_export]
macro_rules! log {
    ($module:expr; $($arg:tt)*) => {{
        $crate::logger::log($module, &format!($($arg)*))
    }};
}

/// Log a message with a colored module prefix to stderr.
///
/// Used for the per-file failure dump: the index goes to a file, failures
/// go to stderr, so piping stays clean.
#[macro_export]
macro_rules! elog {
    ($module:expr; $($arg:tt)*) => {{
        $crate::logger::elog($module, &format!($($arg)*))
    }};
}

// ============================================================================
// Progress Bar
// ============================================================================

/// A single progress bar pinned to the bottom terminal line.
///
/// Format: `[corpus] [████░░░░] 42/100`. Updates in place using ANSI cursor
/// control; `log` output printed while the bar is active scrolls above it.
///
/// # Thread Safety
/// The counter is atomic and rendering is serialized through a mutex, so
/// rayon workers may call `inc` concurrently.
pub struct Progress {
    prefix: ColoredString,
    prefix_len: usize,
    total: usize,
    current: AtomicUsize,
    lock: Mutex<()>,
}

impl Progress {
    /// Start a progress bar for `total` items.
    ///
    /// Returns `None` when `total <= 1`; a bar for a single item is noise.
    pub fn start(module: &str, total: usize) -> Option<Self> {
        if total <= 1 {
            return None;
        }

        // Reserve the bottom line
        let mut stdout = stdout().lock();
        writeln!(stdout).ok();
        stdout.flush().ok();

        BAR_ACTIVE.store(true, Ordering::SeqCst);

        Some(Self {
            prefix: colorize_prefix(module, &module.to_ascii_lowercase()),
            prefix_len: calc_prefix_len(module.len()),
            total,
            current: AtomicUsize::new(0),
            lock: Mutex::new(()),
        })
    }

    /// Record one finished item and redraw the bar.
    pub fn inc(&self) {
        let current = self.current.fetch_add(1, Ordering::Relaxed) + 1;
        self.display(current);
    }

    /// Render the bar on the reserved line.
    fn display(&self, current: usize) {
        let _guard = self.lock.lock().ok();

        let width = get_terminal_width() as usize;

        let progress_text = format!("{}/{}", current, self.total);
        // " []" around the bar plus the space before the count
        let overhead = self.prefix_len + 3 + 1 + progress_text.len();
        let available = width.saturating_sub(overhead);
        let bar_width = available.clamp(MIN_BAR_WIDTH, MAX_BAR_WIDTH);

        let filled = (current * bar_width) / self.total;
        let empty = bar_width.saturating_sub(filled);
        let bar: String = "█".repeat(filled) + &"░".repeat(empty);

        let mut stdout = stdout().lock();
        execute!(stdout, cursor::MoveUp(1)).ok();
        execute!(stdout, Clear(ClearType::CurrentLine)).ok();
        write!(stdout, "{} [{}] {}", self.prefix, bar, progress_text).ok();
        execute!(stdout, cursor::MoveDown(1)).ok();
        write!(stdout, "\r").ok();
        stdout.flush().ok();
    }

    /// Clear the bar from the terminal.
    pub fn finish(&self) {
        BAR_ACTIVE.store(false, Ordering::SeqCst);
        let _guard = self.lock.lock().ok();

        let mut stdout = stdout().lock();
        execute!(stdout, cursor::MoveUp(1)).ok();
        execute!(stdout, Clear(ClearType::CurrentLine)).ok();
        stdout.flush().ok();
    }
}

impl Drop for Progress {
    fn drop(&mut self) {
        if BAR_ACTIVE.load(Ordering::SeqCst) {
            self.finish();
        }
    }
}

// ============================================================================
// Helper Functions
// ============================================================================

/// Log a message with a colored module prefix.
///
/// Automatically truncates long single-line messages to fit terminal width.
#[inline]
pub fn log(module: &str, message: &str) {
    let module_lower = module.to_ascii_lowercase();
    let prefix = colorize_prefix(module, &module_lower);
    let width = get_terminal_width() as usize;

    let mut stdout = stdout().lock();

    if BAR_ACTIVE.load(Ordering::SeqCst) {
        execute!(stdout, cursor::MoveUp(1)).ok();
        execute!(stdout, Clear(ClearType::FromCursorDown)).ok();
    } else {
        execute!(stdout, Clear(ClearType::UntilNewLine)).ok();
    }

    if message.contains('\n') {
        // Multiline messages are printed whole, never truncated
        writeln!(stdout, "{prefix} {message}").ok();
    } else {
        let prefix_len = calc_prefix_len(module.len());
        let max_msg_len = width.saturating_sub(prefix_len);

        let message = if message.len() > max_msg_len {
            truncate_str(message, max_msg_len)
        } else {
            message
        };

        writeln!(stdout, "{prefix} {message}").ok();
    }

    if BAR_ACTIVE.load(Ordering::SeqCst) {
        writeln!(stdout).ok();
    }

    stdout.flush().ok();
}

/// Log a message to stderr with a colored module prefix.
pub fn elog(module: &str, message: &str) {
    let prefix = colorize_prefix(module, &module.to_ascii_lowercase());
    eprintln!("{prefix} {message}");
}

/// Apply color to a module prefix based on module type.
#[inline]
fn colorize_prefix(module: &str, module_lower: &str) -> ColoredString {
    let prefix = format!("[{module}]");
    match module_lower {
        "check" => prefix.bright_blue().bold(),
        "error" => prefix.bright_red().bold(),
        "warn" => prefix.bright_magenta().bold(),
        _ => prefix.bright_yellow().bold(),
    }
}

/// Truncate a string to fit within `max_len` bytes.
///
/// Ensures the result is valid UTF-8 by finding the nearest character boundary.
#[inline]
fn truncate_str(s: &str, max_len: usize) -> &str {
    if s.len() <= max_len {
        return s;
    }
    let mut end = max_len;
    while end > 0 && !s.is_char_boundary(end) {
        end -= 1;
    }
    &s[..end]
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_calc_prefix_len() {
        // "corpus" -> "[corpus] " = 6 + 3 = 9
        assert_eq!(calc_prefix_len(6), 9);
        assert_eq!(calc_prefix_len(0), 3);
    }

    #[test]
    fn test_truncate_str_short_string() {
        assert_eq!(truncate_str("hello", 10), "hello");
    }

    #[test]
    fn test_truncate_str_exact_length() {
        assert_eq!(truncate_str("hello", 5), "hello");
    }

    #[test]
    fn test_truncate_str_needs_truncation() {
        assert_eq!(truncate_str("hello world", 5), "hello");
    }

    #[test]
    fn test_truncate_str_unicode_boundary() {
        // "€€" is 6 bytes (3 bytes per char); truncating at byte 4 must
        // back off to the boundary at byte 3
        assert_eq!(truncate_str("€€", 4), "€");
        assert_eq!(truncate_str("€€", 3), "€");
        assert_eq!(truncate_str("€€", 6), "€€");
    }

    #[test]
    fn test_truncate_str_empty_and_zero() {
        assert_eq!(truncate_str("", 10), "");
        assert_eq!(truncate_str("hello", 0), "");
    }

    #[test]
    fn test_bar_width_constraints() {
        assert!(MIN_BAR_WIDTH < MAX_BAR_WIDTH);
    }

    #[test]
    fn test_progress_start_skips_trivial_totals() {
        assert!(Progress::start("corpus", 0).is_none());
        assert!(Progress::start("corpus", 1).is_none());
    }
}
