//! Simulated path storage.

/// Row-major matrix of simulated values.
///
/// Row `i` is path `i`; column `t` is day offset `t`. Every row has
/// `horizon_days + 1` points.
#[derive(Clone, Debug, PartialEq)]
pub struct PathMatrix {
    values: Vec<f64>,
    path_count: usize,
    points_per_path: usize,
}

impl PathMatrix {
    /// Wraps a row-major buffer of `path_count` rows.
    ///
    /// Returns `None` when the buffer length does not match the shape.
    pub fn from_rows(
        values: Vec<f64>,
        path_count: usize,
        points_per_path: usize,
    ) -> Option<Self> {
        if path_count.checked_mul(points_per_path) != Some(values.len()) {
            return None;
        }
        Some(Self {
            values,
            path_count,
            points_per_path,
        })
    }

    /// Allocates a zeroed matrix.
    pub(crate) fn zeroed(path_count: usize, points_per_path: usize) -> Self {
        Self {
            values: vec![0.0; path_count * points_per_path],
            path_count,
            points_per_path,
        }
    }

    /// Mutable access to the row-major buffer.
    pub(crate) fn as_mut_slice(&mut self) -> &mut [f64] {
        &mut self.values
    }

    /// Number of paths.
    #[inline]
    pub fn path_count(&self) -> usize {
        self.path_count
    }

    /// Points per path (`horizon_days + 1`).
    #[inline]
    pub fn points_per_path(&self) -> usize {
        self.points_per_path
    }

    /// Horizon in days, or `None` for a matrix without points.
    #[inline]
    pub fn horizon_days(&self) -> Option<usize> {
        self.points_per_path.checked_sub(1)
    }

    /// Whether the matrix holds no paths.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.path_count == 0
    }

    /// Returns path `index`.
    pub fn path(&self, index: usize) -> Option<&[f64]> {
        if index >= self.path_count {
            return None;
        }
        let start = index * self.points_per_path;
        Some(&self.values[start..start + self.points_per_path])
    }

    /// Iterates over paths in order.
    pub fn paths(&self) -> impl Iterator<Item = &[f64]> + '_ {
        self.values.chunks_exact(self.points_per_path.max(1))
    }

    /// Collects the values of every path at day offset `day`.
    pub fn day_values(&self, day: usize) -> Vec<f64> {
        if day >= self.points_per_path {
            return Vec::new();
        }
        self.paths().map(|path| path[day]).collect()
    }

    /// Collects the terminal value of every path.
    pub fn terminal_values(&self) -> Vec<f64> {
        match self.horizon_days() {
            Some(last) => self.day_values(last),
            None => Vec::new(),
        }
    }
}
