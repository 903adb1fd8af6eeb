//! Storage pixel types.
//!
//! Voxel data is always held as `f32` tensors; the pixel type records what the
//! values mean on disk and drives casting on output.

use std::fmt;

/// Integers up to this magnitude are exact in `f32`.
pub const F32_EXACT_INTEGER_LIMIT: f32 = 16_777_216.0;

/// Scalar pixel type of an image as stored in a file.
///
/// Values are held as `f32` whatever the type. 8- and 16-bit integers and
/// Float32 round-trip exactly. 32- and 64-bit integers are exact only up to
/// magnitude 2^24, and Float64 keeps only `f32` precision; such inputs are
/// written back with the rounded values.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PixelType {
    UInt8,
    Int8,
    UInt16,
    Int16,
    UInt32,
    Int32,
    UInt64,
    Int64,
    Float32,
    Float64,
}

impl PixelType {
    pub fn is_integer(self) -> bool {
        !matches!(self, PixelType::Float32 | PixelType::Float64)
    }

    /// Every value of the type survives the trip through `f32`.
    pub fn is_exact_in_f32(self) -> bool {
        matches!(
            self,
            PixelType::UInt8 | PixelType::Int8 | PixelType::UInt16 | PixelType::Int16 | PixelType::Float32
        )
    }

    /// Whether `values`, read as this type, may have been rounded by `f32` storage.
    pub fn may_lose_precision(self, values: &[f32]) -> bool {
        if self.is_exact_in_f32() {
            return false;
        }
        self == PixelType::Float64 || values.iter().any(|v| v.abs() > F32_EXACT_INTEGER_LIMIT)
    }

    /// Representable range of the type, as `f64`.
    pub fn range(self) -> (f64, f64) {
        match self {
            PixelType::UInt8 => (u8::MIN as f64, u8::MAX as f64),
            PixelType::Int8 => (i8::MIN as f64, i8::MAX as f64),
            PixelType::UInt16 => (u16::MIN as f64, u16::MAX as f64),
            PixelType::Int16 => (i16::MIN as f64, i16::MAX as f64),
            PixelType::UInt32 => (u32::MIN as f64, u32::MAX as f64),
            PixelType::Int32 => (i32::MIN as f64, i32::MAX as f64),
            PixelType::UInt64 => (u64::MIN as f64, u64::MAX as f64),
            PixelType::Int64 => (i64::MIN as f64, i64::MAX as f64),
            PixelType::Float32 => (f32::MIN as f64, f32::MAX as f64),
            PixelType::Float64 => (f64::MIN, f64::MAX),
        }
    }

    /// Convert one value into this type's value set.
    ///
    /// Integer targets truncate toward zero and saturate at the type bounds,
    /// NaN maps to zero.
    pub fn convert(self, value: f32) -> f32 {
        if !self.is_integer() {
            return value;
        }
        if value.is_nan() {
            return 0.0;
        }
        let (lo, hi) = self.range();
        (value as f64).trunc().clamp(lo, hi) as f32
    }
}

impl fmt::Display for PixelType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            PixelType::UInt8 => "uint8",
            PixelType::Int8 => "int8",
            PixelType::UInt16 => "uint16",
            PixelType::Int16 => "int16",
            PixelType::UInt32 => "uint32",
            PixelType::Int32 => "int32",
            PixelType::UInt64 => "uint64",
            PixelType::Int64 => "int64",
            PixelType::Float32 => "float32",
            PixelType::Float64 => "float64",
        };
        f.write_str(name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_integer_conversion_truncates_and_saturates() {
        assert_eq!(PixelType::UInt8.convert(0.99), 0.0);
        assert_eq!(PixelType::UInt8.convert(300.0), 255.0);
        assert_eq!(PixelType::UInt8.convert(-4.0), 0.0);
        assert_eq!(PixelType::Int16.convert(-1024.7), -1024.0);
        assert_eq!(PixelType::Int32.convert(f32::NAN), 0.0);
    }

    #[test]
    fn test_precision_loss_is_flagged_for_wide_types() {
        assert!(PixelType::Int16.is_exact_in_f32());
        assert!(!PixelType::Int32.is_exact_in_f32());
        assert!(!PixelType::Int16.may_lose_precision(&[32767.0]));
        assert!(!PixelType::Int32.may_lose_precision(&[-5.0, 16_777_216.0]));
        assert!(PixelType::Int32.may_lose_precision(&[0.0, 16_777_218.0]));
        assert!(PixelType::UInt64.may_lose_precision(&[-3.0e7]));
        assert!(PixelType::Float64.may_lose_precision(&[0.5]));
        assert!(!PixelType::Float32.may_lose_precision(&[1.0e30]));
    }

    #[test]
    fn test_float_conversion_is_identity() {
        assert_eq!(PixelType::Float32.convert(0.125), 0.125);
        assert!(PixelType::Float64.convert(f32::NAN).is_nan());
    }
}
