//! NIfTI-1 volumes: scalar images and displacement fields.
//!
//! Files are indexed `[x, y, z]`; images in memory are `[Z, Y, X]` tensors.
//! Gzip compression follows the file extension.

use std::path::Path;
use anyhow::{bail, Context, Result};
use burn::tensor::backend::Backend;
use burn::tensor::{Shape, Tensor, TensorData};
use ndarray::{Array, Array3, ArrayD, Axis, Ix3};
use nifti::writer::WriterOptions;
use nifti::{IntoNdArray, NiftiHeader, NiftiObject, NiftiType, ReaderOptions};
use mabas_core::image::{Image, ImageMetadata, PixelType};
use mabas_core::transform::DisplacementField;
use crate::affine::{apply_metadata, metadata_from_header};

/// `NIFTI_INTENT_DISPVECT`: vectors are displacements.
pub const INTENT_DISPVECT: i16 = 1006;
/// `NIFTI_INTENT_VECTOR`
pub const INTENT_VECTOR: i16 = 1007;

/// Pixel type recorded in a header.
pub fn pixel_type_of(header: &NiftiHeader) -> Result<PixelType> {
    let datatype = header
        .data_type()
        .with_context(|| format!("unknown NIfTI datatype code {}", header.datatype))?;
    let pixel_type = match datatype {
        NiftiType::Uint8 => PixelType::UInt8,
        NiftiType::Int8 => PixelType::Int8,
        NiftiType::Uint16 => PixelType::UInt16,
        NiftiType::Int16 => PixelType::Int16,
        NiftiType::Uint32 => PixelType::UInt32,
        NiftiType::Int32 => PixelType::Int32,
        NiftiType::Uint64 => PixelType::UInt64,
        NiftiType::Int64 => PixelType::Int64,
        NiftiType::Float32 => PixelType::Float32,
        NiftiType::Float64 => PixelType::Float64,
        other => bail!("unsupported NIfTI datatype {:?}", other),
    };
    Ok(pixel_type)
}

/// `[Z, Y, X]` tensor-order values of an `[x, y, z]` volume.
fn tensor_order(volume: ndarray::ArrayView3<'_, f32>) -> Vec<f32> {
    volume.permuted_axes([2, 1, 0]).iter().copied().collect()
}

/// Drop trailing singleton axes (and pad 2-D slices) down to `[x, y, z]`.
fn into_volume3(mut array: ArrayD<f32>, path: &Path) -> Result<Array3<f32>> {
    while array.ndim() < 3 {
        let axis = array.ndim();
        array = array.insert_axis(Axis(axis));
    }
    while array.ndim() > 3 {
        let last = array.ndim() - 1;
        if array.len_of(Axis(last)) != 1 {
            bail!(
                "{} is not a scalar 3-D volume (shape {:?})",
                path.display(),
                array.shape()
            );
        }
        array = array.index_axis_move(Axis(last), 0);
    }
    array
        .into_dimensionality::<Ix3>()
        .context("volume is not three-dimensional")
}

/// Read a scalar NIfTI volume.
///
/// Values are scaled by `scl_slope`/`scl_inter` when the header sets them.
/// The returned image keeps the file's datatype as its pixel type.
pub fn read_image<B: Backend, P: AsRef<Path>>(path: P, device: &B::Device) -> Result<Image<B, 3>> {
    let path = path.as_ref();
    let obj = ReaderOptions::new()
        .read_file(path)
        .with_context(|| format!("failed to read NIfTI file {}", path.display()))?;
    let header = obj.header().clone();
    let pixel_type = pixel_type_of(&header)?;
    let metadata = metadata_from_header(&header);

    let array = obj
        .into_volume()
        .into_ndarray::<f32>()
        .with_context(|| format!("failed to decode voxels of {}", path.display()))?;
    let volume = into_volume3(array, path)?;
    let (nx, ny, nz) = volume.dim();

    let values = tensor_order(volume.view());
    tracing::debug!(path = %path.display(), size = ?[nx, ny, nz], %pixel_type, "read image");
    if pixel_type.may_lose_precision(&values) {
        tracing::warn!(
            "{} is stored as {}; values are held in 32-bit float and may be rounded",
            path.display(),
            pixel_type
        );
    }

    Ok(Image::from_values(values, [nz, ny, nx], metadata, pixel_type, device))
}

fn base_header(metadata: &ImageMetadata<3>) -> NiftiHeader {
    let mut header = NiftiHeader::default();
    apply_metadata(&mut header, metadata);
    header.scl_slope = 1.0;
    header.scl_inter = 0.0;
    header
}

/// Write a scalar image in its pixel type.
pub fn write_image<B: Backend, P: AsRef<Path>>(path: P, image: &Image<B, 3>) -> Result<()> {
    let path = path.as_ref();
    let header = base_header(image.metadata());
    let [nx, ny, nz] = image.size();
    let values = image.to_vec();
    let pixel_type = image.pixel_type();
    let writer = WriterOptions::new(path).reference_header(&header);

    macro_rules! write_as {
        ($t:ty) => {{
            let array = Array3::<$t>::from_shape_fn((nx, ny, nz), |(x, y, z)| {
                pixel_type.convert(values[(z * ny + y) * nx + x]) as $t
            });
            writer.write_nifti(&array)
        }};
    }

    let written = match pixel_type {
        PixelType::UInt8 => write_as!(u8),
        PixelType::Int8 => write_as!(i8),
        PixelType::UInt16 => write_as!(u16),
        PixelType::Int16 => write_as!(i16),
        PixelType::UInt32 => write_as!(u32),
        PixelType::Int32 => write_as!(i32),
        PixelType::UInt64 => write_as!(u64),
        PixelType::Int64 => write_as!(i64),
        PixelType::Float32 => write_as!(f32),
        PixelType::Float64 => write_as!(f64),
    };
    written.with_context(|| format!("failed to write NIfTI file {}", path.display()))?;

    tracing::debug!(path = %path.display(), %pixel_type, "wrote image");
    Ok(())
}

/// Read a dense displacement field stored as `[x, y, z, 1, 3]`.
///
/// A `[x, y, z, 3]` layout is accepted as well. With the DISPVECT intent the
/// x and y components are RAS offsets and are negated into LPS.
pub fn read_displacement_field<B: Backend, P: AsRef<Path>>(
    path: P,
    device: &B::Device,
) -> Result<DisplacementField<B>> {
    let path = path.as_ref();
    let obj = ReaderOptions::new()
        .read_file(path)
        .with_context(|| format!("failed to read displacement field {}", path.display()))?;
    let header = obj.header().clone();
    let metadata = metadata_from_header(&header);

    let mut array = obj
        .into_volume()
        .into_ndarray::<f32>()
        .with_context(|| format!("failed to decode displacement field {}", path.display()))?;

    if array.ndim() == 5 && array.len_of(Axis(3)) == 1 {
        array = array.index_axis_move(Axis(3), 0);
    }
    if array.ndim() != 4 || array.len_of(Axis(3)) != 3 {
        bail!(
            "{} is not a 3-D displacement field (shape {:?})",
            path.display(),
            array.shape()
        );
    }

    let flip = header.intent_code == INTENT_DISPVECT;
    let (nx, ny, nz) = (array.shape()[0], array.shape()[1], array.shape()[2]);
    let component = |c: usize| -> Result<Tensor<B, 3>> {
        let view = array
            .index_axis(Axis(3), c)
            .into_dimensionality::<Ix3>()
            .context("displacement component is not three-dimensional")?;
        let mut values = tensor_order(view);
        if flip && c < 2 {
            values.iter_mut().for_each(|v| *v = -*v);
        }
        Ok(Tensor::from_data(TensorData::new(values, Shape::new([nz, ny, nx])), device))
    };
    let (x, y, z) = (component(0)?, component(1)?, component(2)?);
    tracing::debug!(path = %path.display(), size = ?[nx, ny, nz], intent = header.intent_code, "read displacement field");

    Ok(DisplacementField::new([x, y, z], metadata))
}

/// Write a displacement field as `[x, y, z, 1, 3]` float32 with the DISPVECT intent.
pub fn write_displacement_field<B: Backend, P: AsRef<Path>>(path: P, field: &DisplacementField<B>) -> Result<()> {
    let path = path.as_ref();
    let mut header = base_header(field.metadata());
    header.intent_code = INTENT_DISPVECT;

    let [nz, ny, nx] = field.shape();
    let components: Vec<Vec<f32>> = field
        .components()
        .iter()
        .map(|c| c.clone().into_data().iter::<f32>().collect())
        .collect();

    let array = Array::from_shape_fn((nx, ny, nz, 1, 3), |(x, y, z, _, c)| {
        let value = components[c][(z * ny + y) * nx + x];
        if c < 2 {
            -value
        } else {
            value
        }
    });

    WriterOptions::new(path)
        .reference_header(&header)
        .write_nifti(&array)
        .with_context(|| format!("failed to write displacement field {}", path.display()))?;
    Ok(())
}
