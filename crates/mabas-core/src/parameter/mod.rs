//! Elastix-style parameter maps.
//!
//! A [`ParameterMap`] is an ordered `key -> [value, ...]` table read from and
//! written to elastix's text format. Workflows never edit a loaded map in
//! place; they describe changes as [`ParameterOverrides`] and apply them.

pub mod map;
pub mod overrides;
pub mod keys;

pub use map::{ParameterMap, ParameterParseError};
pub use overrides::ParameterOverrides;
