//! Image type with physical metadata and a storage pixel type.

use burn::tensor::backend::Backend;
use burn::tensor::{ElementConversion, Shape, Tensor, TensorData};
use crate::spatial::{Direction, Point, Spacing};
use super::metadata::ImageMetadata;
use super::pixel::PixelType;

/// Medical image: voxel tensor, geometry, and storage pixel type.
///
/// Voxels are held as a float tensor in `[Z, Y, X]` layout for 3-D data.
/// `pixel_type` records what the values are on disk; [`Image::cast`] moves the
/// values into that type's value set.
///
/// # Examples
/// ```rust
/// use mabas_core::image::{Image, ImageMetadata, PixelType};
/// use burn::tensor::Tensor;
/// use burn_ndarray::NdArray;
///
/// type Backend = NdArray<f32>;
///
/// let device = Default::default();
/// let data = Tensor::<Backend, 3>::zeros([4, 8, 8], &device);
/// let image = Image::new(data, ImageMetadata::default(), PixelType::Int16);
/// assert_eq!(image.size(), [8, 8, 4]);
/// ```
#[derive(Debug, Clone)]
pub struct Image<B: Backend, const D: usize> {
    data: Tensor<B, D>,
    metadata: ImageMetadata<D>,
    pixel_type: PixelType,
}

impl<B: Backend, const D: usize> Image<B, D> {
    pub fn new(data: Tensor<B, D>, metadata: ImageMetadata<D>, pixel_type: PixelType) -> Self {
        Self {
            data,
            metadata,
            pixel_type,
        }
    }

    /// Build an image from flat values in tensor (row-major) order.
    pub fn from_values(
        values: Vec<f32>,
        shape: [usize; D],
        metadata: ImageMetadata<D>,
        pixel_type: PixelType,
        device: &B::Device,
    ) -> Self {
        let data = Tensor::<B, D>::from_data(TensorData::new(values, Shape::new(shape)), device);
        Self::new(data, metadata, pixel_type)
    }

    pub fn data(&self) -> &Tensor<B, D> {
        &self.data
    }

    pub fn metadata(&self) -> &ImageMetadata<D> {
        &self.metadata
    }

    pub fn origin(&self) -> &Point<D> {
        self.metadata.origin()
    }

    pub fn spacing(&self) -> &Spacing<D> {
        self.metadata.spacing()
    }

    pub fn direction(&self) -> &Direction<D> {
        self.metadata.direction()
    }

    pub fn pixel_type(&self) -> PixelType {
        self.pixel_type
    }

    /// Tensor shape, slowest axis first (`[Z, Y, X]`).
    pub fn shape(&self) -> [usize; D] {
        self.data.dims()
    }

    /// Voxel counts in index-axis order (`[X, Y, Z]`).
    pub fn size(&self) -> [usize; D] {
        let mut size = self.shape();
        size.reverse();
        size
    }

    pub fn num_voxels(&self) -> usize {
        self.shape().iter().product()
    }

    /// Replace this image's geometry with the reference image's.
    ///
    /// Voxel data is untouched; only origin, spacing and direction change.
    pub fn copy_information(&mut self, reference: &Image<B, D>) {
        self.metadata = reference.metadata;
    }

    pub fn with_metadata(mut self, metadata: ImageMetadata<D>) -> Self {
        self.metadata = metadata;
        self
    }

    /// Voxel values in tensor order.
    pub fn to_vec(&self) -> Vec<f32> {
        self.data.clone().into_data().iter::<f32>().collect()
    }

    /// Apply `f` to every voxel, keeping geometry and pixel type.
    pub fn map_values<F>(&self, f: F) -> Self
    where
        F: Fn(f32) -> f32,
    {
        let values = self.to_vec().into_iter().map(f).collect();
        Self::from_values(values, self.shape(), self.metadata, self.pixel_type, &self.data.device())
    }

    /// Convert values into `pixel_type` and retag the image.
    ///
    /// Integer targets truncate toward zero and saturate at the type range.
    pub fn cast(&self, pixel_type: PixelType) -> Self {
        let mut cast = if pixel_type.is_integer() {
            self.map_values(|v| pixel_type.convert(v))
        } else {
            self.clone()
        };
        cast.pixel_type = pixel_type;
        cast
    }

    pub fn max_value(&self) -> f32 {
        self.data.clone().max().into_scalar().elem::<f32>()
    }
}
