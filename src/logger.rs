//! Verbosity-gated build logging.
//!
//! [`BuildLogger`] forwards progress messages to `tracing` only when the
//! configured [`Verbosity`] allows it, so library users who never install a
//! subscriber pay nothing and binaries can still silence the tree builder
//! independently of their global filter.

/// How much the tree builder reports while it runs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Default)]
pub enum Verbosity {
    /// No output.
    #[default]
    Silent,
    /// Only anomalies (exhausted nodes, early stops).
    Warning,
    /// Batch-level progress.
    Info,
    /// Every applied split.
    Debug,
}

/// Logger for tree construction.
#[derive(Debug, Clone, Copy)]
pub struct BuildLogger {
    verbosity: Verbosity,
}

impl BuildLogger {
    pub fn new(verbosity: Verbosity) -> Self {
        Self { verbosity }
    }

    #[inline]
    pub fn verbosity(&self) -> Verbosity {
        self.verbosity
    }

    #[inline]
    pub fn enabled(&self, level: Verbosity) -> bool {
        level != Verbosity::Silent && self.verbosity >= level
    }

    pub fn warn(&self, msg: &str) {
        if self.enabled(Verbosity::Warning) {
            tracing::warn!(target: "zygote_tree", "{msg}");
        }
    }

    pub fn info(&self, msg: &str) {
        if self.enabled(Verbosity::Info) {
            tracing::info!(target: "zygote_tree", "{msg}");
        }
    }

    pub fn debug(&self, msg: &str) {
        if self.enabled(Verbosity::Debug) {
            tracing::debug!(target: "zygote_tree", "{msg}");
        }
    }

    /// Report one applied split with structured fields.
    pub fn log_split(&self, index: usize, node: u32, package: &str, benefit: f64, root_cost: f64) {
        if self.enabled(Verbosity::Debug) {
            tracing::debug!(
                target: "zygote_tree",
                split = index,
                node,
                package,
                benefit,
                root_cost,
                "applied split"
            );
        }
    }
}
