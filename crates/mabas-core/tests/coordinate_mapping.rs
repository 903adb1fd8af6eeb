use std::f64::consts::PI;
use burn::tensor::Tensor;
use burn_ndarray::NdArray;
use nalgebra::{Rotation3, Vector3};
use proptest::prelude::*;
use mabas_core::image::ImageMetadata;
use mabas_core::spatial::{Direction, Point, Spacing};

type Backend = NdArray<f32>;

fn rotation(ax: f64, ay: f64, az: f64) -> Direction<3> {
    let r = Rotation3::from_axis_angle(&Vector3::x_axis(), ax)
        * Rotation3::from_axis_angle(&Vector3::y_axis(), ay)
        * Rotation3::from_axis_angle(&Vector3::z_axis(), az);
    Direction(r.into_inner())
}

#[test]
fn test_rotated_grid_index() {
    let meta = ImageMetadata::new(Point::new([0.0, 0.0, 0.0]), Spacing::uniform(1.0), rotation(0.0, 0.0, PI / 2.0));

    // Index axis x points along physical y.
    let index = meta.physical_to_continuous_index(&Point::new([1.0, 0.0, 0.0]));
    assert!((index[0] - 0.0).abs() < 1e-9);
    assert!((index[1] + 1.0).abs() < 1e-9);
    assert!((index[2] - 0.0).abs() < 1e-9);

    let indices = meta.world_to_index_tensor(Tensor::<Backend, 2>::from_floats([[1.0, 0.0, 0.0]], &Default::default()));
    let data = indices.into_data();
    let values = data.as_slice::<f32>().unwrap();
    assert!((values[0] - 0.0).abs() < 1e-5);
    assert!((values[1] + 1.0).abs() < 1e-5);
    assert!((values[2] - 0.0).abs() < 1e-5);
}

proptest! {
    #[test]
    fn test_coordinate_roundtrip(
        ox in -100.0f64..100.0, oy in -100.0f64..100.0, oz in -100.0f64..100.0,
        sx in 0.1f64..5.0, sy in 0.1f64..5.0, sz in 0.1f64..5.0,
        ax in -3.1f64..3.1, ay in -3.1f64..3.1, az in -3.1f64..3.1,
        px in -50.0f64..50.0, py in -50.0f64..50.0, pz in -50.0f64..50.0
    ) {
        let meta = ImageMetadata::new(
            Point::new([ox, oy, oz]),
            Spacing::new([sx, sy, sz]),
            rotation(ax, ay, az),
        );
        let point = Point::new([px, py, pz]);
        let recovered = meta.continuous_index_to_physical(&meta.physical_to_continuous_index(&point));
        prop_assert!(point.approx_eq(&recovered, 1e-6), "{:?} vs {:?}", point, recovered);
    }

    #[test]
    fn test_tensor_batch_matches_scalar(
        ox in -10.0f64..10.0,
        sx in 0.5f64..2.0,
        az in -3.1f64..3.1,
        px in -10.0f64..10.0, py in -10.0f64..10.0
    ) {
        let meta = ImageMetadata::new(
            Point::new([ox, -ox, 0.5 * ox]),
            Spacing::new([sx, 2.0 * sx, 1.0]),
            rotation(0.0, 0.0, az),
        );
        let expected = meta.physical_to_continuous_index(&Point::new([px, py, 1.0]));

        let points = Tensor::<Backend, 2>::from_floats([[px as f32, py as f32, 1.0]], &Default::default());
        let data = meta.world_to_index_tensor(points).into_data();
        let values = data.as_slice::<f32>().unwrap();
        for axis in 0..3 {
            prop_assert!((values[axis] as f64 - expected[axis]).abs() < 1e-3);
        }
    }
}
