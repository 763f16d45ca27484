//! Progress reporting for runs over many files

use indicatif::{ProgressBar, ProgressStyle};

pub struct ProgressTracker {
    bar: ProgressBar,
}

impl ProgressTracker {
    /// Creates a bar over `total` files
    ///
    /// A single file gets a hidden bar so one-shot output stays clean.
    pub fn new(total: u64, description: &str) -> Self {
        let bar = if total > 1 {
            ProgressBar::new(total)
        } else {
            ProgressBar::hidden()
        };

        if let Ok(style) = ProgressStyle::default_bar()
            .template("{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} ({eta}) {msg}")
        {
            bar.set_style(style.progress_chars("#>-"));
        }
        bar.set_message(description.to_string());

        ProgressTracker { bar }
    }

    pub fn increment(&self, amount: u64) {
        self.bar.inc(amount);
    }

    pub fn finish(&self) {
        self.bar.finish_with_message("Completed");
    }

    pub fn set_message(&self, msg: &str) {
        self.bar.set_message(msg.to_string());
    }

    /// Prints a line above the bar without tearing it
    pub fn println(&self, line: &str) {
        if self.bar.is_hidden() {
            println!("{}", line);
        } else {
            self.bar.println(line);
        }
    }
}
