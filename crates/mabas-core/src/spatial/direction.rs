//! Direction cosine matrices.

use nalgebra::SMatrix;
use super::Vector;

/// Orientation of the image axes in physical space.
///
/// Column `i` is the physical direction of index axis `i`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Direction<const D: usize>(pub SMatrix<f64, D, D>);

impl<const D: usize> Direction<D> {
    pub fn identity() -> Self {
        Self(SMatrix::identity())
    }

    /// Build from row-major values.
    pub fn from_rows(rows: [[f64; D]; D]) -> Self {
        Self(SMatrix::from_fn(|r, c| rows[r][c]))
    }

    pub fn try_inverse(&self) -> Option<Self> {
        self.0.try_inverse().map(Self)
    }

    pub fn approx_eq(&self, other: &Self, tolerance: f64) -> bool {
        (0..D).all(|r| (0..D).all(|c| (self[(r, c)] - other[(r, c)]).abs() <= tolerance))
    }
}

impl<const D: usize> std::ops::Index<(usize, usize)> for Direction<D> {
    type Output = f64;

    fn index(&self, index: (usize, usize)) -> &f64 {
        &self.0[index]
    }
}

impl<const D: usize> std::ops::IndexMut<(usize, usize)> for Direction<D> {
    fn index_mut(&mut self, index: (usize, usize)) -> &mut f64 {
        &mut self.0[index]
    }
}

impl<const D: usize> std::ops::Mul<Vector<D>> for Direction<D> {
    type Output = Vector<D>;

    fn mul(self, vector: Vector<D>) -> Vector<D> {
        Vector(self.0 * vector.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_rows_is_row_major() {
        let d = Direction::from_rows([[0.0, -1.0, 0.0], [1.0, 0.0, 0.0], [0.0, 0.0, 1.0]]);
        assert_eq!(d[(0, 1)], -1.0);
        assert_eq!(d[(1, 0)], 1.0);
        let rotated = d * Vector::new([1.0, 0.0, 0.0]);
        assert_eq!(rotated, Vector::new([0.0, 1.0, 0.0]));
    }

    #[test]
    fn test_inverse_of_rotation_is_transpose() {
        let d = Direction::from_rows([[0.0, -1.0, 0.0], [1.0, 0.0, 0.0], [0.0, 0.0, 1.0]]);
        let inv = d.try_inverse().unwrap();
        assert!(inv.approx_eq(&Direction(d.0.transpose()), 1e-12));
    }
}
