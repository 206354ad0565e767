//! UI module for consistent CLI output
//!
//! Uses `cliclack` for interactive output and prompts, with automatic
//! fallback to plain output in CI/non-interactive environments.
//!
//! # Example
//!
//! ```rust,ignore
//! use memaster::ui::{self, EntryProgress, Tone, UiContext};
//!
//! let ctx = UiContext::detect();
//!
//! let mut progress = EntryProgress::new(&ctx);
//! progress.begin("Caching app files");
//! progress.expect(6);
//! progress.advance("http://localhost:8080/index.html");
//! // ...
//! progress.finish("6 entries cached");
//!
//! ui::step_with(&ctx, Tone::Warn, "Fallback document not cached", "Run: memaster install");
//! ```

mod context;
mod output;
mod progress;
mod prompts;

pub use context::UiContext;
pub use output::{intro, key_value, outro, remark, section, step, step_with, Tone};
pub use progress::EntryProgress;
pub use prompts::confirm_removal;
