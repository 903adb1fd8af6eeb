//! Fusing propagated atlas labels with a local weighted vote.

use std::fs;
use std::path::{Path, PathBuf};
use anyhow::{bail, ensure, Context, Result};
use burn::tensor::backend::Backend;
use glob::glob;
use mabas_core::filter::{clean_probability_map, LocalWeightedVote};
use mabas_core::image::Image;
use mabas_io::{read_image, write_image};
use super::deformation::expand_template;

/// Probability above which a fused voxel belongs to the structure.
pub const PROCESSED_THRESHOLD: f32 = 0.5;

#[derive(Debug, Clone, PartialEq)]
pub struct WeightedVote {
    /// Image the atlases were registered to.
    pub target: PathBuf,
    /// Glob matching the registered atlas intensity images.
    pub atlases: String,
    /// Glob of the propagated label images; `{0}` becomes the structure name.
    pub labels: String,
    /// Text file with one structure name per line.
    pub structures: PathBuf,
    /// Output file template; `{0}` becomes `<structure>_probability` or `<structure>_processed`.
    pub output: String,
}

/// Files written for one structure.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FusedStructure {
    pub structure: String,
    pub probability: PathBuf,
    pub processed: PathBuf,
}

/// Non-empty lines of a structure list, trimmed.
pub fn read_structure_list(path: &Path) -> Result<Vec<String>> {
    let text = fs::read_to_string(path).with_context(|| format!("failed to read structure list {}", path.display()))?;
    Ok(text
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .map(String::from)
        .collect())
}

/// Every existing path matching `pattern`, sorted.
pub fn glob_sorted(pattern: &str) -> Result<Vec<PathBuf>> {
    let mut paths: Vec<PathBuf> = glob(pattern)
        .with_context(|| format!("invalid file pattern `{pattern}`"))?
        .filter_map(|entry| match entry {
            Ok(path) => Some(path),
            Err(err) => {
                tracing::warn!("Skipping unreadable match: {}", err);
                None
            }
        })
        .collect();
    paths.sort();
    Ok(paths)
}

fn read_all<B: Backend>(paths: &[PathBuf], device: &B::Device) -> Result<Vec<Image<B, 3>>> {
    paths
        .iter()
        .map(|path| {
            tracing::info!("Reading {}", path.display());
            read_image::<B, _>(path, device)
        })
        .collect()
}

/// Weight every atlas once, then fuse and clean each listed structure.
///
/// Label files are paired with atlases by sorted path order. A structure
/// whose label count differs from the atlas count stops the run; structures
/// before it keep their outputs.
pub fn run_local_weighted_vote<B: Backend>(request: &WeightedVote, device: &B::Device) -> Result<Vec<FusedStructure>> {
    if expand_template(&request.output, "") == request.output {
        bail!("output template `{}` needs a {{0}} placeholder", request.output);
    }
    let structures = read_structure_list(&request.structures)?;
    if structures.is_empty() {
        bail!("no structures listed in {}", request.structures.display());
    }

    let atlas_paths = glob_sorted(&request.atlases)?;
    if atlas_paths.is_empty() {
        bail!("no atlas images match `{}`", request.atlases);
    }
    tracing::info!("Atlas images: {}. Generating weight maps", atlas_paths.len());

    let vote = LocalWeightedVote::default();
    let target = read_image::<B, _>(&request.target, device)?;
    let weights = read_all::<B>(&atlas_paths, device)?
        .iter()
        .zip(&atlas_paths)
        .map(|(atlas, path)| {
            vote.weight(&target, atlas)
                .with_context(|| format!("cannot weight {}", path.display()))
        })
        .collect::<Result<Vec<_>>>()?;

    let mut fused = Vec::with_capacity(structures.len());
    for structure in structures {
        tracing::info!("Processing structure: {}", structure);
        let pattern = expand_template(&request.labels, &structure);
        let label_paths = glob_sorted(&pattern)?;
        ensure!(
            label_paths.len() == atlas_paths.len(),
            "{} label images match `{}` but there are {} atlases",
            label_paths.len(),
            pattern,
            atlas_paths.len()
        );
        let labels = read_all::<B>(&label_paths, device)?;

        let probability = vote
            .fuse(&weights, &labels)
            .with_context(|| format!("cannot fuse labels of {structure}"))?;
        let probability_path = PathBuf::from(expand_template(&request.output, &format!("{structure}_probability")));
        tracing::info!("Saving image to {}", probability_path.display());
        write_image(&probability_path, &probability)?;

        let processed = clean_probability_map(&probability, PROCESSED_THRESHOLD);
        let processed_path = PathBuf::from(expand_template(&request.output, &format!("{structure}_processed")));
        tracing::info!("Saving image to {}", processed_path.display());
        write_image(&processed_path, &processed)?;

        fused.push(FusedStructure {
            structure,
            probability: probability_path,
            processed: processed_path,
        });
    }
    Ok(fused)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn test_structure_list_skips_blank_lines() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("structures.txt");
        fs::write(&path, "HEART\n\n  LUNG_L \r\nLUNG_R\n").unwrap();
        assert_eq!(read_structure_list(&path).unwrap(), vec!["HEART", "LUNG_L", "LUNG_R"]);
    }

    #[test]
    fn test_glob_is_sorted() {
        let dir = tempdir().unwrap();
        for name in ["Case_03.nii.gz", "Case_01.nii.gz", "Case_02.nii.gz", "other.txt"] {
            fs::write(dir.path().join(name), b"").unwrap();
        }
        let pattern = format!("{}/Case_*.nii.gz", dir.path().display());
        let names: Vec<_> = glob_sorted(&pattern)
            .unwrap()
            .iter()
            .map(|p| p.file_name().unwrap().to_string_lossy().into_owned())
            .collect();
        assert_eq!(names, vec!["Case_01.nii.gz", "Case_02.nii.gz", "Case_03.nii.gz"]);
    }

    #[test]
    fn test_invalid_pattern_is_an_error() {
        assert!(glob_sorted("[").is_err());
    }
}
