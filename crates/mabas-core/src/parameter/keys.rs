//! Parameter names the workflows read or override.

pub const DEFAULT_PIXEL_VALUE: &str = "DefaultPixelValue";
pub const FINAL_BSPLINE_INTERPOLATION_ORDER: &str = "FinalBSplineInterpolationOrder";
pub const RESAMPLE_INTERPOLATOR: &str = "ResampleInterpolator";
pub const RESULT_IMAGE_FORMAT: &str = "ResultImageFormat";
pub const RESULT_IMAGE_PIXEL_TYPE: &str = "ResultImagePixelType";
pub const WRITE_RESULT_IMAGE: &str = "WriteResultImage";
pub const TRANSFORM: &str = "Transform";

pub const FINAL_BSPLINE_INTERPOLATOR: &str = "FinalBSplineInterpolator";
