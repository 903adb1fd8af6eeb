use burn::tensor::backend::Backend;
use burn::tensor::{Int, Tensor};

/// Continuous indices of every voxel of a `[Z, Y, X]` grid.
///
/// Returns a `[N, 3]` tensor of `(x, y, z)` rows in tensor order, so row `n`
/// is the voxel at flat offset `n`.
pub fn generate_grid_3d<B: Backend>(shape: [usize; 3], device: &B::Device) -> Tensor<B, 2> {
    let [d, h, w] = shape;
    let n = d * h * w;

    let z = Tensor::<B, 1, Int>::arange(0..d as i64, device)
        .reshape([d, 1, 1])
        .repeat(&[1, h, w])
        .reshape([n]);
    let y = Tensor::<B, 1, Int>::arange(0..h as i64, device)
        .reshape([1, h, 1])
        .repeat(&[d, 1, w])
        .reshape([n]);
    let x = Tensor::<B, 1, Int>::arange(0..w as i64, device)
        .reshape([1, 1, w])
        .repeat(&[d, h, 1])
        .reshape([n]);

    Tensor::cat(
        vec![
            x.float().unsqueeze_dim(1),
            y.float().unsqueeze_dim(1),
            z.float().unsqueeze_dim(1),
        ],
        1,
    )
}

/// 1.0 where a continuous index lies inside a `[Z, Y, X]` buffer, 0.0 elsewhere.
///
/// A sample is inside when every component lies in `[-0.5, size - 0.5)`,
/// i.e. within half a voxel of the first and last voxel centres.
pub fn inside_buffer_mask<B: Backend>(indices: &Tensor<B, 2>, shape: [usize; 3]) -> Tensor<B, 1> {
    let n = indices.dims()[0];
    // (x, y, z) columns against (X, Y, Z) extents
    let extents = [shape[2], shape[1], shape[0]];

    let mut mask = Tensor::<B, 1>::ones([n], &indices.device());
    for (axis, extent) in extents.into_iter().enumerate() {
        let component = indices.clone().narrow(1, axis, 1).squeeze::<1>(1);
        let above = component.clone().greater_equal_elem(-0.5).float();
        let below = component.lower_elem(extent as f64 - 0.5).float();
        mask = mask * above * below;
    }
    mask
}

#[cfg(test)]
mod tests {
    use super::*;
    use burn_ndarray::NdArray;

    type TestBackend = NdArray<f32>;

    #[test]
    fn test_grid_rows_follow_tensor_order() {
        let device = Default::default();
        let grid = generate_grid_3d::<TestBackend>([2, 3, 4], &device);
        assert_eq!(grid.dims(), [24, 3]);

        let data = grid.into_data();
        let values = data.as_slice::<f32>().unwrap();
        // Flat offset 1 is x = 1.
        assert_eq!(&values[3..6], &[1.0, 0.0, 0.0]);
        // Flat offset 4 is the first voxel of row y = 1.
        assert_eq!(&values[12..15], &[0.0, 1.0, 0.0]);
        // Flat offset 12 starts slice z = 1.
        assert_eq!(&values[36..39], &[0.0, 0.0, 1.0]);
    }

    #[test]
    fn test_inside_mask_uses_half_voxel_margin() {
        let device = Default::default();
        let indices = Tensor::<TestBackend, 2>::from_floats(
            [
                [0.0, 0.0, 0.0],
                [-0.5, 0.0, 0.0],
                [-0.6, 0.0, 0.0],
                [3.4, 2.0, 1.0],
                [3.5, 2.0, 1.0],
                [0.0, 0.0, 1.6],
            ],
            &device,
        );
        let mask = inside_buffer_mask(&indices, [2, 3, 4]).into_data();
        assert_eq!(mask.as_slice::<f32>().unwrap(), &[1.0, 1.0, 0.0, 1.0, 0.0, 0.0]);
    }
}
