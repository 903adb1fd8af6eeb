//! Structure versus intensity classification.

/// Hounsfield value of air, the background for CT-like intensity images.
pub const AIR_HOUNSFIELD: f64 = -1024.0;

/// What the voxel values of an image mean.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ImageKind {
    /// Categorical labels or binary masks.
    Structure,
    /// Continuous intensities (CT, MR).
    Intensity,
}

impl ImageKind {
    /// Command-line convention: `0` is a structure, `1` an intensity image.
    pub fn from_flag(flag: u8) -> Self {
        if flag == 0 {
            ImageKind::Structure
        } else {
            ImageKind::Intensity
        }
    }

    /// Value used for samples that fall outside the input image.
    pub fn default_pixel_value(self) -> f64 {
        match self {
            ImageKind::Structure => 0.0,
            ImageKind::Intensity => AIR_HOUNSFIELD,
        }
    }
}
