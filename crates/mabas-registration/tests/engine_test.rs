#![cfg(unix)]

use std::fs;
use std::os::unix::fs::PermissionsExt;
use std::path::{Path, PathBuf};
use burn_ndarray::NdArray;
use tempfile::tempdir;
use mabas_core::image::{Image, ImageMetadata, PixelType};
use mabas_core::parameter::ParameterMap;
use mabas_registration::engine::{RegistrationEngine, TransformEngine};
use mabas_registration::{ElastixConfig, ElastixEngine, EngineError, TransformixEngine};

type B = NdArray<f32>;

/// Stand-in elastix: copies the moving image to the result and writes a transform.
const FAKE_ELASTIX: &str = r#"#!/bin/sh
while [ $# -gt 0 ]; do
  case "$1" in
    -m) moving="$2"; shift ;;
    -p) params="$2"; shift ;;
    -out) out="$2"; shift ;;
  esac
  shift
done
cp "$moving" "$out/result.0.nii.gz"
cp "$params" "$out/TransformParameters.0.txt"
echo "Total time elapsed: 0.1s"
"#;

/// Stand-in transformix that logs and exits cleanly without producing a result.
const SILENT_TRANSFORMIX: &str = "#!/bin/sh\necho \"transformix has finished\"\n";

fn script(dir: &Path, name: &str, body: &str) -> PathBuf {
    let path = dir.join(name);
    fs::write(&path, body).unwrap();
    fs::set_permissions(&path, fs::Permissions::from_mode(0o755)).unwrap();
    path
}

fn image() -> Image<B, 3> {
    let values = (0..24).map(|v| v as f32).collect();
    Image::from_values(values, [2, 3, 4], ImageMetadata::default(), PixelType::Float32, &Default::default())
}

#[test]
fn test_elastix_round_trip_through_workspace() {
    let dir = tempdir().unwrap();
    let config = ElastixConfig::new().with_elastix(script(dir.path(), "elastix", FAKE_ELASTIX));
    let engine = ElastixEngine::<B>::new(config);
    let parameters = ParameterMap::parse("(Transform \"EulerTransform\")\n").unwrap();

    let registration = engine.register(&image(), &image(), &parameters).unwrap();

    assert_eq!(registration.image.to_vec(), image().to_vec());
    assert_eq!(registration.transform.get_first("Transform"), Some("EulerTransform"));
    assert_eq!(registration.transform.get_first("WriteResultImage"), Some("true"));
    assert_eq!(registration.transform.get_first("ResultImageFormat"), Some("nii.gz"));
}

#[test]
fn test_transformix_without_result_is_missing_output() {
    let dir = tempdir().unwrap();
    let config = ElastixConfig::new().with_transformix(script(dir.path(), "transformix", SILENT_TRANSFORMIX));
    let engine = TransformixEngine::<B>::new(config);

    let err = engine.transform(&image(), &ParameterMap::new(), false).unwrap_err();
    assert!(matches!(err, EngineError::MissingOutput { .. }), "{err:?}");
}

#[test]
fn test_missing_executable_is_spawn_error() {
    let dir = tempdir().unwrap();
    let config = ElastixConfig::new().with_elastix(dir.path().join("not-installed"));
    let engine = ElastixEngine::<B>::new(config);

    let err = engine.register(&image(), &image(), &ParameterMap::new()).unwrap_err();
    assert!(matches!(err, EngineError::Spawn { .. }), "{err:?}");
}
