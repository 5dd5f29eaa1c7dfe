//! Split options with builder pattern.
//!
//! [`SplitOpts`] controls how the tree prices calls and which packages may be
//! split on. It uses the `bon` crate for builder generation and validates on
//! `build()`.
//!
//! # Example
//!
//! ```
//! use zygote_tree::config::SplitOpts;
//!
//! // All defaults: uniform weights, no entropy penalty
//! let opts = SplitOpts::builder().build().unwrap();
//!
//! // Prerequisites first, entropy-adjusted cost
//! let opts = SplitOpts::builder()
//!     .prereq_first(true)
//!     .entropy_penalty(0.5)
//!     .build()
//!     .unwrap();
//! ```

use bon::Builder;

use crate::logger::Verbosity;

// =============================================================================
// ConfigError
// =============================================================================

/// Errors that can occur during option validation.
#[derive(Debug, Clone, PartialEq)]
pub enum ConfigError {
    /// Entropy penalty must be finite and non-negative.
    InvalidEntropyPenalty(f64),
    /// A package weight is negative or not finite.
    InvalidWeight { package: usize, value: f64 },
    /// Minimum split cost must be finite and non-negative.
    InvalidMinSplitCost(f64),
}

impl std::fmt::Display for ConfigError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::InvalidEntropyPenalty(v) => {
                write!(f, "entropy_penalty must be non-negative, got {}", v)
            }
            Self::InvalidWeight { package, value } => {
                write!(f, "weight of package {} must be non-negative, got {}", package, value)
            }
            Self::InvalidMinSplitCost(v) => {
                write!(f, "min_split_cost must be non-negative, got {}", v)
            }
        }
    }
}

impl std::error::Error for ConfigError {}

// =============================================================================
// SplitOpts
// =============================================================================

/// Options for building an import tree.
#[derive(Debug, Clone, PartialEq, Builder)]
#[builder(
    derive(Clone, Debug),
    finish_fn(vis = "", name = __build_internal)
)]
pub struct SplitOpts {
    /// Direct cost of importing each package. `None` means every package costs 1.
    pub weights: Option<Vec<f64>>,

    /// Only split on a package once all its prerequisites are committed on the
    /// path (numpy before pandas, never the reverse). Default: false.
    #[builder(default)]
    pub prereq_first: bool,

    /// Scale each weight by `1 + penalty * H(p)` where `H` is the binary entropy
    /// of the package's inclusion rate at a node. Default: 0 (no scaling).
    #[builder(default = 0.0)]
    pub entropy_penalty: f64,

    /// Spread each package's weight over the package and its prerequisites.
    /// Default: false.
    #[builder(default)]
    pub dist_weights: bool,

    /// Nodes whose own cost is below this are not split further. Default: 0.01.
    #[builder(default = 0.01)]
    pub min_split_cost: f64,

    /// Verbosity level. Default: `Silent`.
    #[builder(default)]
    pub verbosity: Verbosity,
}

impl<S: split_opts_builder::IsComplete> SplitOptsBuilder<S> {
    /// Build and validate the options.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] if the entropy penalty, any weight, or the
    /// minimum split cost is negative or not finite.
    pub fn build(self) -> Result<SplitOpts, ConfigError> {
        let opts = self.__build_internal();
        opts.validate()?;
        Ok(opts)
    }
}

impl SplitOpts {
    /// Validate the options. Weight vector length is checked against the
    /// package count when the tree is built.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !self.entropy_penalty.is_finite() || self.entropy_penalty < 0.0 {
            return Err(ConfigError::InvalidEntropyPenalty(self.entropy_penalty));
        }

        if let Some(weights) = &self.weights {
            if let Some((package, &value)) = weights
                .iter()
                .enumerate()
                .find(|(_, w)| !w.is_finite() || **w < 0.0)
            {
                return Err(ConfigError::InvalidWeight { package, value });
            }
        }

        if !self.min_split_cost.is_finite() || self.min_split_cost < 0.0 {
            return Err(ConfigError::InvalidMinSplitCost(self.min_split_cost));
        }

        Ok(())
    }
}

impl Default for SplitOpts {
    fn default() -> Self {
        Self {
            weights: None,
            prereq_first: false,
            entropy_penalty: 0.0,
            dist_weights: false,
            min_split_cost: 0.01,
            verbosity: Verbosity::Silent,
        }
    }
}

// =============================================================================
// Tests
// =============================================================================
