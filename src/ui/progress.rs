//! Per-entry progress for work over a known list of URLs
//!
//! Interactive terminals get a cliclack bar that advances once per entry.
//! Elsewhere each finished entry is printed as a `[n/total]` line so CI
//! logs show what was cached even when the run fails.

use super::context::UiContext;
use console::style;
use std::sync::atomic::{AtomicUsize, Ordering};

/// Progress over a fixed number of entries
pub struct EntryProgress {
    bar: Option<cliclack::ProgressBar>,
    interactive: bool,
    total: AtomicUsize,
    done: AtomicUsize,
}

impl EntryProgress {
    pub fn new(ctx: &UiContext) -> Self {
        Self {
            bar: None,
            interactive: ctx.use_fancy_output(),
            total: AtomicUsize::new(0),
            done: AtomicUsize::new(0),
        }
    }

    /// Show the bar with a label; the length is set by [`Self::expect`]
    pub fn begin(&mut self, label: &str) {
        if self.interactive {
            let bar = cliclack::progress_bar(0);
            bar.start(label);
            self.bar = Some(bar);
        } else {
            println!("{} {}", style("...").dim(), label);
        }
    }

    /// Set how many entries will be reported
    pub fn expect(&self, total: usize) {
        self.total.store(total, Ordering::SeqCst);
        if let Some(bar) = &self.bar {
            bar.set_length(total as u64);
        }
    }

    /// One entry finished
    pub fn advance(&self, entry: &str) {
        let done = self.done.fetch_add(1, Ordering::SeqCst) + 1;
        match &self.bar {
            Some(bar) => {
                bar.inc(1);
                bar.set_message(entry);
            }
            None => println!(
                "  {} {}",
                style(format!("[{}/{}]", done, self.total.load(Ordering::SeqCst))).dim(),
                entry
            ),
        }
    }

    /// Entries reported so far
    pub fn completed(&self) -> usize {
        self.done.load(Ordering::SeqCst)
    }

    pub fn finish(&mut self, message: &str) {
        match self.bar.take() {
            Some(bar) => bar.stop(message),
            None => println!("{} {}", style("[OK]").green(), message),
        }
    }

    /// Stop and report how far the work got
    pub fn fail(&mut self, message: &str) {
        let line = format!(
            "{} ({} of {} entries fetched)",
            message,
            self.completed(),
            self.total.load(Ordering::SeqCst)
        );
        match self.bar.take() {
            Some(bar) => bar.error(line),
            None => println!("{} {}", style("[FAIL]").red(), line),
        }
    }
}
