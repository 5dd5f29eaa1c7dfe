//! Validated wrappers around the calls and dependency matrices.

use ndarray::{Array1, Array2, ArrayView1, ArrayView2, Axis};

use crate::error::DataError;

// =============================================================================
// CallMatrix
// =============================================================================

/// Calls × packages membership matrix with package names.
///
/// Row `c` describes one invocation; column `p` is 1 if that invocation needs
/// package `p` (after dependency resolution). Column order matches `names`.
///
/// # Example
///
/// ```
/// use zygote_tree::data::CallMatrix;
///
/// let calls = CallMatrix::from_rows(
///     vec!["numpy".into(), "pandas".into()],
///     &[vec![1, 0], vec![1, 1]],
/// ).unwrap();
/// assert_eq!(calls.num_calls(), 2);
/// assert_eq!(calls.package_index("pandas"), Some(1));
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct CallMatrix {
    names: Vec<String>,
    values: Array2<u8>,
}

impl CallMatrix {
    /// Wrap an existing calls × packages array.
    pub fn new(names: Vec<String>, values: Array2<u8>) -> Result<Self, DataError> {
        if names.len() != values.ncols() {
            return Err(DataError::PackageNameCount {
                expected: values.ncols(),
                actual: names.len(),
            });
        }
        Ok(Self { names, values })
    }

    /// Build from one row per call. Every row must have one entry per name.
    pub fn from_rows(names: Vec<String>, rows: &[Vec<u8>]) -> Result<Self, DataError> {
        let num_packages = names.len();
        check_rows(rows, num_packages)?;
        let values = Array2::from_shape_fn((rows.len(), num_packages), |(c, p)| rows[c][p]);
        Ok(Self { names, values })
    }

    /// Package names, one per column.
    #[inline]
    pub fn names(&self) -> &[String] {
        &self.names
    }

    #[inline]
    pub fn values(&self) -> ArrayView2<'_, u8> {
        self.values.view()
    }

    #[inline]
    pub fn num_calls(&self) -> usize {
        self.values.nrows()
    }

    #[inline]
    pub fn num_packages(&self) -> usize {
        self.values.ncols()
    }

    /// Column index of a package, if present.
    pub fn package_index(&self, name: &str) -> Option<usize> {
        self.names.iter().position(|n| n == name)
    }

    /// Split into names and the owned array.
    pub fn into_parts(self) -> (Vec<String>, Array2<u8>) {
        (self.names, self.values)
    }
}

// =============================================================================
// DependencyMatrix
// =============================================================================

/// Packages × packages direct-prerequisite matrix.
///
/// Entry `[i, j]` is 1 iff package `i` is a direct prerequisite of package `j`.
/// A 1 on the diagonal (a package listed as its own prerequisite) is accepted
/// but never counts as an outstanding prerequisite.
#[derive(Debug, Clone, PartialEq)]
pub struct DependencyMatrix {
    values: Array2<u8>,
}

impl DependencyMatrix {
    /// Wrap an existing square 0/1 array.
    pub fn new(values: Array2<u8>) -> Result<Self, DataError> {
        let (rows, cols) = values.dim();
        if rows != cols {
            return Err(DataError::NotSquare { rows, cols });
        }
        if let Some(((row, col), &value)) = values.indexed_iter().find(|(_, v)| **v > 1) {
            return Err(DataError::InvalidDependencyEntry { row, col, value });
        }
        Ok(Self { values })
    }

    /// Build from one row per package.
    pub fn from_rows(rows: &[Vec<u8>]) -> Result<Self, DataError> {
        let n = rows.len();
        check_rows(rows, n)?;
        Self::new(Array2::from_shape_fn((n, n), |(i, j)| rows[i][j]))
    }

    /// A matrix with no dependencies at all.
    pub fn independent(num_packages: usize) -> Self {
        Self {
            values: Array2::zeros((num_packages, num_packages)),
        }
    }

    #[inline]
    pub fn values(&self) -> ArrayView2<'_, u8> {
        self.values.view()
    }

    #[inline]
    pub fn num_packages(&self) -> usize {
        self.values.nrows()
    }

    /// Number of direct prerequisites of each package, excluding itself.
    pub fn prerequisite_counts(&self) -> Array1<u32> {
        let mut counts = self.values.map(|&v| u32::from(v)).sum_axis(Axis(0));
        for (p, count) in counts.iter_mut().enumerate() {
            *count -= u32::from(self.values[[p, p]]);
        }
        counts
    }

    /// Row `package`: 1 for every package that lists `package` as a prerequisite.
    #[inline]
    pub fn dependents(&self, package: usize) -> ArrayView1<'_, u8> {
        self.values.row(package)
    }
}

fn check_rows(rows: &[Vec<u8>], expected: usize) -> Result<(), DataError> {
    match rows.iter().position(|r| r.len() != expected) {
        Some(row) => Err(DataError::RaggedRow {
            row,
            expected,
            actual: rows[row].len(),
        }),
        None => Ok(()),
    }
}
