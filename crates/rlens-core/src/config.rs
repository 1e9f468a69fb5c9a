#![forbid(unsafe_code)]

//! Engine configuration.

use crate::time::Duration;

/// Build mode of the host application, as reported by the host adapter.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum HostMode {
    /// Development build: the engine is active by default.
    #[default]
    Development,
    /// Production build: the engine stays inert unless
    /// [`Options::run_in_production`] is set.
    Production,
}

/// Engine options with their documented defaults.
///
/// `play_sound`, `show_toolbar`, and `long_task_threshold` are consumed by
/// outer layers (toolbar chrome, audio feedback, long-task observation) and
/// are carried here so one options object configures the whole stack.
#[derive(Debug, Clone, PartialEq)]
pub struct Options {
    /// Master switch for commit classification.
    pub enabled: bool,
    /// Default `include_children` for allow-list registrations.
    pub include_children: bool,
    /// Keep the engine active in production hosts.
    pub run_in_production: bool,
    /// Audio feedback on renders (outer layer).
    pub play_sound: bool,
    /// Emit a debug log line per render event.
    pub log: bool,
    /// Show the toolbar chrome (outer layer).
    pub show_toolbar: bool,
    /// Long-task observation threshold (outer layer).
    pub long_task_threshold: Duration,
    /// Quiet period after which an outline's repeat streak resets.
    pub reset_count_timeout: Duration,
    /// Render count at which outline color saturates to the end color.
    pub max_renders: u32,
    /// Expose the aggregate report through the reporting UI (outer layer).
    pub report: bool,
}

impl Default for Options {
    fn default() -> Self {
        Self {
            enabled: true,
            include_children: true,
            run_in_production: false,
            play_sound: false,
            log: false,
            show_toolbar: true,
            long_task_threshold: Duration::from_millis(50),
            reset_count_timeout: Duration::from_millis(5000),
            max_renders: 20,
            report: false,
        }
    }
}

impl Options {
    /// Set the master switch (builder).
    #[must_use]
    pub fn enabled(mut self, enabled: bool) -> Self {
        self.enabled = enabled;
        self
    }

    /// Set per-render logging (builder).
    #[must_use]
    pub fn log(mut self, log: bool) -> Self {
        self.log = log;
        self
    }

    /// Set the quiet-period window (builder).
    #[must_use]
    pub fn reset_count_timeout(mut self, window: Duration) -> Self {
        self.reset_count_timeout = window;
        self
    }

    /// Set the color saturation threshold (builder).
    #[must_use]
    pub fn max_renders(mut self, max_renders: u32) -> Self {
        self.max_renders = max_renders;
        self
    }

    /// Keep the engine active in production hosts (builder).
    #[must_use]
    pub fn run_in_production(mut self, run: bool) -> Self {
        self.run_in_production = run;
        self
    }

    /// Whether the engine should classify commits for a host in `mode`.
    #[must_use]
    pub fn active_for(&self, mode: HostMode) -> bool {
        self.enabled && (mode == HostMode::Development || self.run_in_production)
    }
}
