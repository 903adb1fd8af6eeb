//! Elastix parameter files on disk.

use std::fs;
use std::path::Path;
use anyhow::{Context, Result};
use mabas_core::parameter::ParameterMap;

/// Load and parse a parameter file. Any failure is an error.
pub fn read_parameter_file<P: AsRef<Path>>(path: P) -> Result<ParameterMap> {
    let path = path.as_ref();
    let text = fs::read_to_string(path)
        .with_context(|| format!("failed to read parameter file {}", path.display()))?;
    let map = ParameterMap::parse(&text)
        .with_context(|| format!("failed to parse parameter file {}", path.display()))?;
    tracing::debug!(path = %path.display(), entries = map.len(), "read parameter file");
    Ok(map)
}

pub fn write_parameter_file<P: AsRef<Path>>(path: P, map: &ParameterMap) -> Result<()> {
    let path = path.as_ref();
    fs::write(path, map.to_text())
        .with_context(|| format!("failed to write parameter file {}", path.display()))?;
    tracing::debug!(path = %path.display(), entries = map.len(), "wrote parameter file");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn test_missing_file_names_the_path() {
        let err = read_parameter_file("/definitely/not/here.txt").unwrap_err();
        assert!(format!("{err:#}").contains("/definitely/not/here.txt"));
    }

    #[test]
    fn test_parse_error_is_reported_with_line() -> Result<()> {
        let dir = tempdir()?;
        let path = dir.path().join("bad.txt");
        fs::write(&path, "(Transform \"EulerTransform\")\nMetric \"AdvancedMattesMutualInformation\"\n")?;
        let err = read_parameter_file(&path).unwrap_err();
        assert!(format!("{err:#}").contains("line 2"));
        Ok(())
    }
}
