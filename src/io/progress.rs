//! Progress display for model fitting

use crate::io::configuration::PROGRESS_BAR_WIDTH;
use indicatif::{ProgressBar, ProgressStyle};
use std::sync::LazyLock;

static PROGRESS_STYLE: LazyLock<ProgressStyle> = LazyLock::new(|| {
    let template = format!(
        "{{prefix}} [{{elapsed_precise}}] [{{bar:{PROGRESS_BAR_WIDTH}.cyan/blue}}] {{pos}}/{{len}} {{msg}}"
    );
    ProgressStyle::default_bar()
        .template(&template)
        .unwrap_or_else(|_| ProgressStyle::default_bar())
        .progress_chars("█▉▊▋▌▍▎▏ ")
});

/// Progress bar tracking the tuning and sampling iterations of one model
pub struct SamplingProgress {
    bar: ProgressBar,
    tune: u64,
}

impl SamplingProgress {
    /// Create a visible bar for a fit of `tune + draws` iterations
    pub fn new(model_name: &str, tune: u64, draws: u64) -> Self {
        let bar = ProgressBar::new(tune.saturating_add(draws));
        bar.set_style(PROGRESS_STYLE.clone());
        bar.set_prefix(model_name.to_string());
        Self { bar, tune }
    }

    /// Create a bar that draws nothing
    pub fn hidden(tune: u64, draws: u64) -> Self {
        let bar = ProgressBar::hidden();
        bar.set_length(tune.saturating_add(draws));
        Self { bar, tune }
    }

    /// Status text after `completed` iterations with `divergences` seen so far
    ///
    /// `divergences` counts tuning and sampling together, so the figure keeps
    /// growing after tuning ends.
    pub fn status(&self, completed: u64, divergences: usize) -> String {
        let phase = if completed <= self.tune && self.tune > 0 {
            "tuning"
        } else {
            "sampling"
        };
        if divergences > 0 {
            format!("{phase} ({divergences} divergences)")
        } else {
            phase.to_string()
        }
    }

    /// Report the number of completed iterations and divergences so far
    pub fn update(&self, completed: u64, divergences: usize) {
        self.bar.set_position(completed);
        self.bar.set_message(self.status(completed, divergences));
    }

    /// Remove the bar from the terminal
    pub fn finish(&self) {
        self.bar.finish_and_clear();
    }
}
