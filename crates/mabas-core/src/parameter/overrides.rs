//! Parameter overlays applied before an engine call.

use super::map::ParameterMap;

/// Ordered set of parameter replacements.
///
/// Applying overrides never touches the source map; it returns a copy where
/// each overridden key holds the new values (existing keys keep their
/// position, new keys are appended).
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ParameterOverrides {
    entries: Vec<(String, Vec<String>)>,
}

impl ParameterOverrides {
    pub fn new() -> Self {
        Self::default()
    }

    /// Override `key` with a single value.
    pub fn set(self, key: impl Into<String>, value: impl ToString) -> Self {
        self.set_values(key, [value.to_string()])
    }

    /// Override `key` with several values. A later override of the same key wins.
    pub fn set_values<I, V>(mut self, key: impl Into<String>, values: I) -> Self
    where
        I: IntoIterator<Item = V>,
        V: Into<String>,
    {
        let key = key.into();
        let values: Vec<String> = values.into_iter().map(Into::into).collect();
        match self.entries.iter_mut().find(|(k, _)| *k == key) {
            Some((_, existing)) => *existing = values,
            None => self.entries.push((key, values)),
        }
        self
    }

    pub fn get(&self, key: &str) -> Option<&[String]> {
        self.entries
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.as_slice())
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn apply(&self, map: &ParameterMap) -> ParameterMap {
        let mut out = map.clone();
        for (key, values) in &self.entries {
            tracing::debug!(key = %key, values = ?values, "overriding parameter");
            out.insert(key.clone(), values.clone());
        }
        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parameter::keys;

    #[test]
    fn test_apply_returns_new_map() {
        let base = ParameterMap::parse("(DefaultPixelValue -1024)\n(Transform \"EulerTransform\")\n").unwrap();
        let overrides = ParameterOverrides::new()
            .set(keys::DEFAULT_PIXEL_VALUE, 0)
            .set(keys::FINAL_BSPLINE_INTERPOLATION_ORDER, 3);

        let out = overrides.apply(&base);
        assert_eq!(base.get_first(keys::DEFAULT_PIXEL_VALUE), Some("-1024"));
        assert_eq!(out.get_first(keys::DEFAULT_PIXEL_VALUE), Some("0"));
        assert_eq!(out.get_first(keys::FINAL_BSPLINE_INTERPOLATION_ORDER), Some("3"));
        assert_eq!(
            out.keys().collect::<Vec<_>>(),
            vec!["DefaultPixelValue", "Transform", "FinalBSplineInterpolationOrder"]
        );
    }

    #[test]
    fn test_later_override_wins() {
        let overrides = ParameterOverrides::new().set("A", 1).set("A", 2);
        assert_eq!(overrides.len(), 1);
        assert_eq!(overrides.get("A").unwrap(), &["2".to_string()]);
    }

    #[test]
    fn test_empty_overrides_are_identity() {
        let base = ParameterMap::new().with("X", ["1"]);
        assert!(ParameterOverrides::new().is_empty());
        assert_eq!(ParameterOverrides::new().apply(&base), base);
    }
}
