//! Cost model for groups of calls.
//!
//! The cost of a set of calls is the number of package imports they still
//! need, weighted per package:
//!
//! ```text
//! cost = Σ_p colsum(p) · w(p) · (1 + λ · H(p_rate))
//! ```
//!
//! Where:
//! - `colsum(p)`: how many calls in the set need package `p`
//! - `w(p)`: direct import weight of `p`
//! - `λ`: entropy penalty (0 disables the entropy term)
//! - `H(p_rate)`: binary entropy of the fraction of calls needing `p`
//!
//! Every cost number in the tree comes from [`CostModel::cost`].

use ndarray::{Array1, ArrayView1, ArrayView2, Axis};

use crate::data::DependencyMatrix;

/// Inclusion rates are clipped to `[EPS, 1 - EPS]` to keep entropy finite.
const RATE_EPS: f64 = 1e-15;

/// Binary entropy in bits.
#[inline]
pub fn binary_entropy(p: f64) -> f64 {
    -(p * p.log2() + (1.0 - p) * (1.0 - p).log2())
}

/// Weighted, optionally entropy-adjusted, import cost of a set of calls.
///
/// Holds the weight vector shared read-only by every node of a tree.
#[derive(Debug, Clone, PartialEq)]
pub struct CostModel {
    weights: Array1<f64>,
    entropy_penalty: f64,
}

impl CostModel {
    pub fn new(weights: Array1<f64>, entropy_penalty: f64) -> Self {
        Self {
            weights,
            entropy_penalty,
        }
    }

    /// Uniform weight 1 for every package.
    pub fn uniform(num_packages: usize, entropy_penalty: f64) -> Self {
        Self::new(Array1::ones(num_packages), entropy_penalty)
    }

    #[inline]
    pub fn weights(&self) -> ArrayView1<'_, f64> {
        self.weights.view()
    }

    #[inline]
    pub fn entropy_penalty(&self) -> f64 {
        self.entropy_penalty
    }

    #[inline]
    pub fn num_packages(&self) -> usize {
        self.weights.len()
    }

    /// Cost of a calls × packages matrix. An empty matrix costs 0.
    pub fn cost(&self, calls: ArrayView2<'_, u8>) -> f64 {
        debug_assert_eq!(calls.ncols(), self.weights.len());

        let num_calls = calls.nrows();
        if num_calls == 0 {
            return 0.0;
        }

        let col_sums = calls.fold_axis(Axis(0), 0.0, |acc, &v| acc + f64::from(v));

        if self.entropy_penalty > 0.0 {
            let n = num_calls as f64;
            let scaled = ndarray::Zip::from(&col_sums)
                .and(&self.weights)
                .map_collect(|&sum, &w| {
                    let p = (sum / n).clamp(RATE_EPS, 1.0 - RATE_EPS);
                    w * (1.0 + self.entropy_penalty * binary_entropy(p))
                });
            col_sums.dot(&scaled)
        } else {
            col_sums.dot(&self.weights)
        }
    }
}

/// Spread each package's weight over the package and its prerequisites.
///
/// `w'[i] = Σ_j deps[i, j] / colsum(j) · w[j]`: column `j` of the dependency
/// matrix is normalized to sum to 1 and package `j`'s weight is shared among
/// the packages in that column. A package with an all-zero column (nothing
/// listed as its prerequisite, not even itself) keeps its own weight.
pub fn distribute_weights(deps: &DependencyMatrix, weights: ArrayView1<'_, f64>) -> Array1<f64> {
    let values = deps.values();
    let n = values.nrows();
    debug_assert_eq!(weights.len(), n);

    let mut distributed = Array1::zeros(n);
    for (j, column) in values.axis_iter(Axis(1)).enumerate() {
        let sum: u32 = column.iter().map(|&v| u32::from(v)).sum();
        if sum == 0 {
            distributed[j] += weights[j];
            continue;
        }
        let share = weights[j] / f64::from(sum);
        for (i, &v) in column.iter().enumerate() {
            if v != 0 {
                distributed[i] += share;
            }
        }
    }
    distributed
}

// =============================================================================
// Tests
// =============================================================================
