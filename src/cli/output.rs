//! Output formatting and progress indicators
//!
//! This module provides utilities for displaying progress bars,
//! status prefixes, and formatted error messages to the user.

use std::io::IsTerminal;

use indicatif::{ProgressBar, ProgressStyle};

/// Create a progress bar for file uploads
///
/// The length is filled in once the number of files is known. With `quiet`
/// set, or when stderr is not a terminal, the bar is hidden.
pub fn create_upload_bar(quiet: bool) -> ProgressBar {
    if quiet || !std::io::stderr().is_terminal() {
        return ProgressBar::hidden();
    }

    let pb = ProgressBar::new(0);
    pb.set_style(
        ProgressStyle::default_bar()
            .template("{spinner:.green} [{bar:40.cyan/blue}] {pos}/{len} files ({elapsed})")
            .expect("Invalid progress bar template")
            .progress_chars("█▓▒░"),
    );
    pb
}

/// Print an error and its causes to stderr
pub fn display_error(error: &anyhow::Error) {
    eprintln!("{} {error}", status::ERROR);
    for cause in error.chain().skip(1) {
        let text = cause.to_string();
        // Stage errors already embed their source in the message.
        if !error.to_string().contains(&text) {
            eprintln!("  caused by: {text}");
        }
    }
}

/// Status message prefixes
pub mod status {
    /// Success prefix (green checkmark)
    pub const SUCCESS: &str = "✓";

    /// Error prefix (red X)
    pub const ERROR: &str = "✗";
}
