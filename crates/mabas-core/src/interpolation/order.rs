//! Interpolation order and runtime interpolator selection.

use std::fmt;
use std::str::FromStr;
use burn::tensor::backend::Backend;
use burn::tensor::Tensor;
use thiserror::Error;
use super::{BSplineInterpolator, Interpolator, LinearInterpolator, NearestNeighborInterpolator};

/// Highest B-spline order elastix accepts for `FinalBSplineInterpolationOrder`.
pub const MAX_ORDER: u8 = 5;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("interpolation order must be an integer in 0..={}, got `{}`", MAX_ORDER, .0)]
pub struct InvalidOrder(pub String);

/// Resampling interpolation order.
///
/// 0 is nearest neighbour, 1 is linear, 2 to 5 are B-spline orders. Anything
/// above 1 is "higher order": not label-safe when written back as integers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct InterpolationOrder(u8);

impl InterpolationOrder {
    pub const NEAREST: Self = Self(0);
    pub const LINEAR: Self = Self(1);
    pub const CUBIC: Self = Self(3);

    pub fn new(order: u8) -> Result<Self, InvalidOrder> {
        if order > MAX_ORDER {
            return Err(InvalidOrder(order.to_string()));
        }
        Ok(Self(order))
    }

    pub fn value(self) -> u8 {
        self.0
    }

    pub fn is_higher_order(self) -> bool {
        self.0 > 1
    }

    pub fn interpolator(self) -> InterpolatorKind {
        match self.0 {
            0 => InterpolatorKind::Nearest(NearestNeighborInterpolator),
            1 => InterpolatorKind::Linear(LinearInterpolator),
            _ => InterpolatorKind::BSpline(BSplineInterpolator),
        }
    }
}

impl FromStr for InterpolationOrder {
    type Err = InvalidOrder;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let order = s.trim().parse::<u8>().map_err(|_| InvalidOrder(s.to_string()))?;
        Self::new(order).map_err(|_| InvalidOrder(s.to_string()))
    }
}

impl fmt::Display for InterpolationOrder {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Interpolator chosen at runtime from an [`InterpolationOrder`].
#[derive(Debug, Clone, Copy)]
pub enum InterpolatorKind {
    Nearest(NearestNeighborInterpolator),
    Linear(LinearInterpolator),
    BSpline(BSplineInterpolator),
}

impl InterpolatorKind {
    pub fn name(&self) -> &'static str {
        match self {
            InterpolatorKind::Nearest(_) => "nearest neighbour",
            InterpolatorKind::Linear(_) => "linear",
            InterpolatorKind::BSpline(_) => "cubic B-spline",
        }
    }
}

impl<B: Backend> Interpolator<B> for InterpolatorKind {
    fn interpolate(&self, data: &Tensor<B, 3>, indices: Tensor<B, 2>) -> Tensor<B, 1> {
        match self {
            InterpolatorKind::Nearest(i) => i.interpolate(data, indices),
            InterpolatorKind::Linear(i) => i.interpolate(data, indices),
            InterpolatorKind::BSpline(i) => i.interpolate(data, indices),
        }
    }

    fn coefficients(&self, data: &Tensor<B, 3>) -> Tensor<B, 3> {
        match self {
            InterpolatorKind::BSpline(i) => i.coefficients(data),
            InterpolatorKind::Nearest(_) | InterpolatorKind::Linear(_) => data.clone(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_and_classify() {
        let nn: InterpolationOrder = "0".parse().unwrap();
        let linear: InterpolationOrder = " 1".parse().unwrap();
        let cubic: InterpolationOrder = "3".parse().unwrap();
        assert!(!nn.is_higher_order());
        assert!(!linear.is_higher_order());
        assert!(cubic.is_higher_order());
        assert_eq!(cubic.interpolator().name(), "cubic B-spline");
        assert_eq!(linear.interpolator().name(), "linear");
    }

    #[test]
    fn test_rejects_out_of_range_and_garbage() {
        assert!("6".parse::<InterpolationOrder>().is_err());
        assert!("-1".parse::<InterpolationOrder>().is_err());
        assert!("linear".parse::<InterpolationOrder>().is_err());
    }
}
