//! NIfTI header geometry.
//!
//! NIfTI stores an RAS+ affine; images in memory use LPS+ like ITK and
//! elastix. Reading and writing flip the sign of the first two rows.

use nalgebra::{Matrix3, Rotation3, SMatrix, UnitQuaternion, Vector3};
use nifti::NiftiHeader;
use mabas_core::image::ImageMetadata;
use mabas_core::spatial::{Direction, Point, Spacing};

/// `NIFTI_XFORM_SCANNER_ANAT`
const XFORM_SCANNER_ANAT: i16 = 1;
/// Millimetre spatial units.
const UNITS_MM: u8 = 2;

const RAS_TO_LPS: [f64; 3] = [-1.0, -1.0, 1.0];

/// The header's 3x4 RAS affine, preferring sform over qform over pixdim.
fn ras_affine(header: &NiftiHeader) -> [[f64; 4]; 3] {
    let widen = |row: [f32; 4]| row.map(f64::from);

    if header.sform_code > 0 {
        return [widen(header.srow_x), widen(header.srow_y), widen(header.srow_z)];
    }

    let dx = f64::from(header.pixdim[1]);
    let dy = f64::from(header.pixdim[2]);
    let dz = f64::from(header.pixdim[3]);

    if header.qform_code > 0 {
        let b = f64::from(header.quatern_b);
        let c = f64::from(header.quatern_c);
        let d = f64::from(header.quatern_d);
        let a = (1.0 - (b * b + c * c + d * d).min(1.0)).sqrt();
        let qfac = if header.pixdim[0] < 0.0 { -1.0 } else { 1.0 };
        let dz = dz * qfac;

        let r = [
            [a * a + b * b - c * c - d * d, 2.0 * (b * c - a * d), 2.0 * (b * d + a * c)],
            [2.0 * (b * c + a * d), a * a + c * c - b * b - d * d, 2.0 * (c * d - a * b)],
            [2.0 * (b * d - a * c), 2.0 * (c * d + a * b), a * a + d * d - b * b - c * c],
        ];
        let t = [
            f64::from(header.quatern_x),
            f64::from(header.quatern_y),
            f64::from(header.quatern_z),
        ];
        return [0, 1, 2].map(|i| [r[i][0] * dx, r[i][1] * dy, r[i][2] * dz, t[i]]);
    }

    [
        [dx, 0.0, 0.0, 0.0],
        [0.0, dy, 0.0, 0.0],
        [0.0, 0.0, dz, 0.0],
    ]
}

/// LPS geometry of a NIfTI header.
pub fn metadata_from_header(header: &NiftiHeader) -> ImageMetadata<3> {
    let affine = ras_affine(header);
    let m = SMatrix::<f64, 3, 3>::from_fn(|r, c| RAS_TO_LPS[r] * affine[r][c]);
    let origin = Point::new([0, 1, 2].map(|r| RAS_TO_LPS[r] * affine[r][3]));

    let axes = [Vector3::x(), Vector3::y(), Vector3::z()];
    let mut spacing = [1.0; 3];
    let mut columns = axes;
    for i in 0..3 {
        let column = m.column(i).into_owned();
        let norm = column.norm();
        if norm > 1e-9 {
            spacing[i] = norm;
            columns[i] = column / norm;
        } else {
            let pixdim = f64::from(header.pixdim[i + 1]);
            spacing[i] = if pixdim > 0.0 { pixdim } else { 1.0 };
        }
    }

    ImageMetadata::new(
        origin,
        Spacing::new(spacing),
        Direction(Matrix3::from_columns(&columns)),
    )
}

/// Write LPS geometry into both the sform and the qform of `header`.
pub fn apply_metadata(header: &mut NiftiHeader, metadata: &ImageMetadata<3>) {
    let direction = metadata.direction().0;
    let spacing = metadata.spacing();
    let origin = metadata.origin();

    let ras_dir = SMatrix::<f64, 3, 3>::from_fn(|r, c| RAS_TO_LPS[r] * direction[(r, c)]);
    let ras_origin = [0, 1, 2].map(|r| RAS_TO_LPS[r] * origin[r]);

    let row = |r: usize| -> [f32; 4] {
        [
            (ras_dir[(r, 0)] * spacing[0]) as f32,
            (ras_dir[(r, 1)] * spacing[1]) as f32,
            (ras_dir[(r, 2)] * spacing[2]) as f32,
            ras_origin[r] as f32,
        ]
    };
    header.srow_x = row(0);
    header.srow_y = row(1);
    header.srow_z = row(2);
    header.sform_code = XFORM_SCANNER_ANAT;

    // qform needs a proper rotation; a reflection moves into qfac.
    let mut rotation = ras_dir;
    let qfac = if rotation.determinant() < 0.0 {
        let flipped = -rotation.column(2);
        rotation.set_column(2, &flipped);
        -1.0
    } else {
        1.0
    };
    let q = UnitQuaternion::from_rotation_matrix(&Rotation3::from_matrix(&rotation));
    let q = if q.w < 0.0 { -q.into_inner() } else { q.into_inner() };
    header.quatern_b = q.i as f32;
    header.quatern_c = q.j as f32;
    header.quatern_d = q.k as f32;
    header.quatern_x = ras_origin[0] as f32;
    header.quatern_y = ras_origin[1] as f32;
    header.quatern_z = ras_origin[2] as f32;
    header.qform_code = XFORM_SCANNER_ANAT;

    header.pixdim[0] = qfac;
    header.pixdim[1] = spacing[0] as f32;
    header.pixdim[2] = spacing[1] as f32;
    header.pixdim[3] = spacing[2] as f32;
    header.xyzt_units = UNITS_MM;
}
