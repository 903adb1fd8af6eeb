//! Image geometry.
//!
//! [`ImageMetadata`] maps continuous voxel indices to physical points:
//! `point = origin + Direction * (index * spacing)`.

use burn::tensor::backend::Backend;
use burn::tensor::{Shape, Tensor, TensorData};
use crate::spatial::{Direction, Point, Spacing, Vector, GEOMETRY_TOLERANCE};

/// Origin, spacing and direction of an image grid.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ImageMetadata<const D: usize> {
    /// Physical coordinate of voxel index 0.
    origin: Point<D>,
    /// Physical distance between voxels along each axis.
    spacing: Spacing<D>,
    /// Orientation of the index axes.
    direction: Direction<D>,
}

impl<const D: usize> ImageMetadata<D> {
    pub fn new(origin: Point<D>, spacing: Spacing<D>, direction: Direction<D>) -> Self {
        Self {
            origin,
            spacing,
            direction,
        }
    }

    pub fn origin(&self) -> &Point<D> {
        &self.origin
    }

    pub fn spacing(&self) -> &Spacing<D> {
        &self.spacing
    }

    pub fn direction(&self) -> &Direction<D> {
        &self.direction
    }

    /// Geometry equality within the precision NIfTI can store.
    pub fn approx_eq(&self, other: &Self) -> bool {
        self.origin.approx_eq(&other.origin, GEOMETRY_TOLERANCE)
            && self.spacing.approx_eq(&other.spacing, GEOMETRY_TOLERANCE)
            && self.direction.approx_eq(&other.direction, GEOMETRY_TOLERANCE)
    }

    /// `index = (Direction^-1 * (point - origin)) / spacing`
    pub fn physical_to_continuous_index(&self, point: &Point<D>) -> Point<D> {
        let inv_dir = self.inverse_direction();
        let rotated = inv_dir * (*point - self.origin);
        let mut index = Point::<D>::origin();
        for i in 0..D {
            index[i] = rotated[i] / self.spacing[i];
        }
        index
    }

    pub fn continuous_index_to_physical(&self, index: &Point<D>) -> Point<D> {
        let mut scaled = Vector::<D>::zeros();
        for i in 0..D {
            scaled[i] = index[i] * self.spacing[i];
        }
        self.origin + self.direction * scaled
    }

    /// Batch version of [`Self::physical_to_continuous_index`] for `[N, D]` tensors.
    pub fn world_to_index_tensor<B: Backend>(&self, points: Tensor<B, 2>) -> Tensor<B, 2> {
        let device = points.device();
        let origin = self.origin_tensor::<B>(&device);

        // I = (P - O) @ T with T[r, c] = inv_dir[c, r] / spacing[c]
        let inv_dir = self.inverse_direction();
        let mut t_data = Vec::with_capacity(D * D);
        for r in 0..D {
            for c in 0..D {
                t_data.push((inv_dir[(c, r)] / self.spacing[c]) as f32);
            }
        }
        let t = Tensor::<B, 2>::from_data(TensorData::new(t_data, Shape::new([D, D])), &device);

        (points - origin).matmul(t)
    }

    /// Batch version of [`Self::continuous_index_to_physical`] for `[N, D]` tensors.
    pub fn index_to_world_tensor<B: Backend>(&self, indices: Tensor<B, 2>) -> Tensor<B, 2> {
        let device = indices.device();
        let origin = self.origin_tensor::<B>(&device);

        // P = O + I @ M with M[r, c] = spacing[r] * dir[c, r]
        let mut m_data = Vec::with_capacity(D * D);
        for r in 0..D {
            for c in 0..D {
                m_data.push((self.spacing[r] * self.direction[(c, r)]) as f32);
            }
        }
        let m = Tensor::<B, 2>::from_data(TensorData::new(m_data, Shape::new([D, D])), &device);

        indices.matmul(m) + origin
    }

    fn origin_tensor<B: Backend>(&self, device: &B::Device) -> Tensor<B, 2> {
        let origin: Vec<f32> = (0..D).map(|i| self.origin[i] as f32).collect();
        Tensor::<B, 1>::from_data(TensorData::new(origin, Shape::new([D])), device).reshape([1, D])
    }

    // Singular directions fall back to the identity.
    fn inverse_direction(&self) -> Direction<D> {
        self.direction.try_inverse().unwrap_or_else(|| {
            tracing::warn!("singular direction matrix, using identity for index mapping");
            Direction::identity()
        })
    }
}

impl<const D: usize> Default for ImageMetadata<D> {
    fn default() -> Self {
        Self {
            origin: Point::origin(),
            spacing: Spacing::uniform(1.0),
            direction: Direction::identity(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use burn_ndarray::NdArray;

    type TestBackend = NdArray<f32>;

    fn oblique() -> ImageMetadata<3> {
        ImageMetadata::new(
            Point::new([10.0, -20.0, 30.0]),
            Spacing::new([0.5, 2.0, 3.0]),
            Direction::from_rows([[0.0, -1.0, 0.0], [1.0, 0.0, 0.0], [0.0, 0.0, 1.0]]),
        )
    }

    #[test]
    fn test_point_roundtrip_through_index_space() {
        let meta = oblique();
        let p = Point::new([3.5, 4.5, 5.5]);
        let back = meta.continuous_index_to_physical(&meta.physical_to_continuous_index(&p));
        assert!(p.approx_eq(&back, 1e-9));
    }

    #[test]
    fn test_tensor_mapping_matches_scalar_mapping() {
        let device = Default::default();
        let meta = oblique();
        let index = Point::new([1.0, 2.0, 3.0]);
        let expected = meta.continuous_index_to_physical(&index);

        let indices = Tensor::<TestBackend, 2>::from_floats([[1.0, 2.0, 3.0]], &device);
        let world = meta.index_to_world_tensor(indices);
        let values = world.clone().into_data();
        let values = values.as_slice::<f32>().unwrap();
        for i in 0..3 {
            assert!((values[i] as f64 - expected[i]).abs() < 1e-4);
        }

        let back = meta.world_to_index_tensor(world).into_data();
        let back = back.as_slice::<f32>().unwrap();
        assert!((back[0] - 1.0).abs() < 1e-4);
        assert!((back[1] - 2.0).abs() < 1e-4);
        assert!((back[2] - 3.0).abs() < 1e-4);
    }

    #[test]
    fn test_approx_eq_tolerates_single_precision_noise() {
        let a = oblique();
        let b = ImageMetadata::new(
            Point::new([10.00001, -20.0, 30.0]),
            *a.spacing(),
            *a.direction(),
        );
        assert!(a.approx_eq(&b));
        assert!(!a.approx_eq(&ImageMetadata::default()));
    }
}
