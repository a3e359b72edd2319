//! Terminal progress for base image pulls and image builds
//!
//! Spinners and per-layer byte bars are drawn with indicatif. Plain mode
//! draws nothing so callers can echo raw daemon output; hidden mode is
//! silent altogether.

use indicatif::{MultiProgress, ProgressBar, ProgressDrawTarget, ProgressStyle};
use std::collections::HashMap;
use std::time::Duration;

const TICK: Duration = Duration::from_millis(100);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Mode {
    Live,
    Plain,
    Hidden,
}

/// Named spinners and bars sharing one terminal area
///
/// Ids are free-form: `"pull"` and `"build"` for the overall operation,
/// layer digests for pull progress.
pub struct ProgressReporter {
    multi: MultiProgress,
    bars: HashMap<String, ProgressBar>,
    mode: Mode,
}

impl Default for ProgressReporter {
    fn default() -> Self {
        Self::new()
    }
}

impl ProgressReporter {
    /// Reporter drawing to stderr
    pub fn new() -> Self {
        Self::with_mode(Mode::Live)
    }

    /// Draws nothing; the build echoes raw daemon output instead
    pub fn plain() -> Self {
        Self::with_mode(Mode::Plain)
    }

    /// Draws nothing and echoes nothing
    pub fn hidden() -> Self {
        Self::with_mode(Mode::Hidden)
    }

    fn with_mode(mode: Mode) -> Self {
        let multi = match mode {
            Mode::Live => MultiProgress::new(),
            Mode::Plain | Mode::Hidden => {
                MultiProgress::with_draw_target(ProgressDrawTarget::hidden())
            }
        };
        Self {
            multi,
            bars: HashMap::new(),
            mode,
        }
    }

    pub fn is_plain_output(&self) -> bool {
        self.mode == Mode::Plain
    }

    fn track(&mut self, id: &str, bar: ProgressBar) -> &ProgressBar {
        let bar = self.multi.add(bar);
        if self.mode == Mode::Live {
            bar.enable_steady_tick(TICK);
        }
        self.bars.insert(id.to_string(), bar);
        &self.bars[id]
    }

    /// Start (or replace) a spinner for work of unknown length
    pub fn add_spinner(&mut self, id: &str, message: &str) -> &ProgressBar {
        let spinner = ProgressBar::new_spinner();
        if let Ok(style) = ProgressStyle::default_spinner().template("{spinner:.green} {msg}") {
            spinner.set_style(style.tick_chars("⠋⠙⠹⠸⠼⠴⠦⠧⠇⠏"));
        }
        spinner.set_message(message.to_string());
        self.track(id, spinner)
    }

    /// Start (or replace) a byte-count bar of `total` bytes
    pub fn add_bar(&mut self, id: &str, total: u64) -> &ProgressBar {
        let bar = ProgressBar::new(total);
        if let Ok(style) = ProgressStyle::default_bar()
            .template("{spinner:.green} {msg:>11} [{bar:30.cyan/blue}] {bytes}/{total_bytes}")
        {
            bar.set_style(style.progress_chars("=>-"));
        }
        self.track(id, bar)
    }

    /// Move a layer bar, creating it on first sight
    pub fn update_layer(&mut self, layer_id: &str, current: u64, total: u64, status: &str) {
        if !self.bars.contains_key(layer_id) {
            self.add_bar(layer_id, total);
        }
        let bar = &self.bars[layer_id];
        // The daemon may revise a layer's size mid-download
        if total > 0 && bar.length() != Some(total) {
            bar.set_length(total);
        }
        bar.set_position(current);
        bar.set_message(status.to_string());
    }

    /// Change a spinner's message, creating it on first sight
    pub fn update_spinner(&mut self, id: &str, message: &str) {
        match self.bars.get(id) {
            Some(spinner) => spinner.set_message(message.to_string()),
            None => {
                self.add_spinner(id, message);
            }
        }
    }

    pub fn finish(&mut self, id: &str, message: &str) {
        if let Some(bar) = self.bars.get(id) {
            bar.finish_with_message(message.to_string());
        }
    }

    /// Stop everything in place, leaving `message` on each line
    pub fn abandon_all(&self, message: &str) {
        self.bars
            .values()
            .for_each(|bar| bar.abandon_with_message(message.to_string()));
    }
}
