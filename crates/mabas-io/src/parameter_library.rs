//! Parameter-file lookup with a library fallback.
//!
//! Rigid registration accepts a bare parameter-file name and searches, in
//! order: the name as given, the name inside the library directory, and the
//! library's default rigid file. Only a missing file moves the search on.

use std::fmt;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use thiserror::Error;
use mabas_core::parameter::{ParameterMap, ParameterParseError};

/// File tried last when nothing more specific exists.
pub const DEFAULT_RIGID_PARAMETERS: &str = "RigidTransformParameters.txt";

/// Environment variable naming the library directory.
pub const PARAMETER_DIR_ENV: &str = "MABAS_PARAMETER_DIR";

#[derive(Debug, Error)]
pub enum LibraryError {
    #[error("cannot read parameter file {}: {source}", .path.display())]
    Unreadable {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("malformed parameter file {}: {source}", .path.display())]
    Malformed {
        path: PathBuf,
        #[source]
        source: ParameterParseError,
    },
    #[error("no parameter file found, tried: {}", TriedPaths(.tried))]
    NotFound { tried: Vec<PathBuf> },
}

struct TriedPaths<'a>(&'a [PathBuf]);

impl fmt::Display for TriedPaths<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, path) in self.0.iter().enumerate() {
            if i > 0 {
                f.write_str(", ")?;
            }
            write!(f, "{}", path.display())?;
        }
        Ok(())
    }
}

/// Result of trying one candidate path.
#[derive(Debug)]
pub enum Attempt {
    Loaded(ParameterMap),
    NotFound,
    Unreadable(io::Error),
    Malformed(ParameterParseError),
}

impl Attempt {
    pub fn at(path: &Path) -> Self {
        let text = match fs::read_to_string(path) {
            Ok(text) => text,
            Err(e) if e.kind() == io::ErrorKind::NotFound => return Attempt::NotFound,
            Err(e) => return Attempt::Unreadable(e),
        };
        match ParameterMap::parse(&text) {
            Ok(map) => Attempt::Loaded(map),
            Err(e) => Attempt::Malformed(e),
        }
    }
}

/// A parameter map and the file it came from.
#[derive(Debug, Clone, PartialEq)]
pub struct Resolved {
    pub path: PathBuf,
    pub map: ParameterMap,
}

/// Directory of stock parameter files.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ParameterLibrary {
    dir: Option<PathBuf>,
}

impl ParameterLibrary {
    pub fn new(dir: Option<PathBuf>) -> Self {
        Self { dir }
    }

    /// Library rooted at `dir`.
    pub fn at<P: Into<PathBuf>>(dir: P) -> Self {
        Self::new(Some(dir.into()))
    }

    pub fn dir(&self) -> Option<&Path> {
        self.dir.as_deref()
    }

    /// Paths tried for `name`, in order.
    pub fn candidates(&self, name: &Path) -> Vec<PathBuf> {
        let mut candidates = vec![name.to_path_buf()];
        if let Some(dir) = &self.dir {
            candidates.push(dir.join(name));
            candidates.push(dir.join(DEFAULT_RIGID_PARAMETERS));
        }
        candidates.dedup();
        candidates
    }

    /// Load the first candidate that exists.
    ///
    /// A candidate that exists but cannot be read or parsed ends the search
    /// with an error instead of falling through to the next one.
    pub fn resolve<P: AsRef<Path>>(&self, name: P) -> Result<Resolved, LibraryError> {
        let candidates = self.candidates(name.as_ref());
        for path in &candidates {
            match Attempt::at(path) {
                Attempt::Loaded(map) => {
                    tracing::info!(path = %path.display(), "using parameter file");
                    return Ok(Resolved {
                        path: path.clone(),
                        map,
                    });
                }
                Attempt::NotFound => {
                    tracing::info!(path = %path.display(), "parameter file not found, trying next candidate");
                }
                Attempt::Unreadable(source) => {
                    return Err(LibraryError::Unreadable {
                        path: path.clone(),
                        source,
                    })
                }
                Attempt::Malformed(source) => {
                    return Err(LibraryError::Malformed {
                        path: path.clone(),
                        source,
                    })
                }
            }
        }
        Err(LibraryError::NotFound { tried: candidates })
    }
}
