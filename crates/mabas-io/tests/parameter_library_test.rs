use std::fs;
use std::path::Path;
use proptest::prelude::*;
use tempfile::tempdir;
use mabas_io::parameter_library::{LibraryError, ParameterLibrary, DEFAULT_RIGID_PARAMETERS};
use mabas_io::{read_parameter_file, write_parameter_file};
use mabas_core::parameter::ParameterMap;

const LIBRARY_RIGID: &str = "(Transform \"EulerTransform\")\n(NumberOfResolutions 4)\n";
const LIBRARY_NAMED: &str = "(Transform \"EulerTransform\")\n(NumberOfResolutions 2)\n";
const LOCAL: &str = "(Transform \"EulerTransform\")\n(NumberOfResolutions 1)\n";

fn library(dir: &Path) -> ParameterLibrary {
    let lib = dir.join("lib");
    fs::create_dir_all(&lib).unwrap();
    fs::write(lib.join(DEFAULT_RIGID_PARAMETERS), LIBRARY_RIGID).unwrap();
    fs::write(lib.join("Named.txt"), LIBRARY_NAMED).unwrap();
    ParameterLibrary::at(lib)
}

fn resolutions(map: &ParameterMap) -> &str {
    map.get_first("NumberOfResolutions").unwrap()
}

#[test]
fn test_given_path_wins() {
    let dir = tempdir().unwrap();
    let lib = library(dir.path());
    let local = dir.path().join("Named.txt");
    fs::write(&local, LOCAL).unwrap();

    let resolved = lib.resolve(&local).unwrap();
    assert_eq!(resolved.path, local);
    assert_eq!(resolutions(&resolved.map), "1");
}

#[test]
fn test_library_name_resolves_inside_library() {
    let dir = tempdir().unwrap();
    let lib = library(dir.path());

    let resolved = lib.resolve("Named.txt").unwrap();
    assert_eq!(resolved.path, lib.dir().unwrap().join("Named.txt"));
    assert_eq!(resolutions(&resolved.map), "2");
}

#[test]
fn test_unknown_name_falls_back_to_default() {
    let dir = tempdir().unwrap();
    let lib = library(dir.path());

    let resolved = lib.resolve("NoSuchFile.txt").unwrap();
    assert_eq!(resolved.path, lib.dir().unwrap().join(DEFAULT_RIGID_PARAMETERS));
    assert_eq!(resolutions(&resolved.map), "4");
}

#[test]
fn test_malformed_candidate_is_fatal() {
    let dir = tempdir().unwrap();
    let lib = library(dir.path());
    let local = dir.path().join("Broken.txt");
    fs::write(&local, "(Transform \"EulerTransform\"\n").unwrap();

    let err = lib.resolve(&local).unwrap_err();
    match err {
        LibraryError::Malformed { path, .. } => assert_eq!(path, local),
        other => panic!("expected a malformed-file error, got {other:?}"),
    }
}

#[test]
fn test_directory_candidate_is_unreadable_not_missing() {
    let dir = tempdir().unwrap();
    let lib = library(dir.path());
    let err = lib.resolve(dir.path()).unwrap_err();
    assert!(matches!(err, LibraryError::Unreadable { .. }), "{err:?}");
}

#[test]
fn test_without_library_only_given_path_is_tried() {
    let err = ParameterLibrary::default().resolve("NoSuchFile.txt").unwrap_err();
    match err {
        LibraryError::NotFound { tried } => assert_eq!(tried.len(), 1),
        other => panic!("expected not-found, got {other:?}"),
    }
}

fn value() -> impl Strategy<Value = String> {
    prop_oneof![
        "[A-Za-z][A-Za-z0-9_.]{0,12}",
        "[A-Za-z0-9 _./-]{0,16}",
        (-1.0e6f64..1.0e6).prop_map(|v| v.to_string()),
        any::<i32>().prop_map(|v| v.to_string()),
    ]
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(64))]

    #[test]
    fn test_parameter_file_write_then_read(
        entries in prop::collection::vec(("[A-Z][A-Za-z0-9]{0,20}", prop::collection::vec(value(), 1..5)), 0..12)
    ) {
        let map: ParameterMap = entries.into_iter().collect();
        let dir = tempdir().unwrap();
        let path = dir.path().join("TransformParameters.0.txt");
        write_parameter_file(&path, &map).unwrap();
        let read = read_parameter_file(&path).unwrap();
        prop_assert_eq!(read, map);
    }
}
