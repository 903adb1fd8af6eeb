//! Engine executable configuration.

use std::path::PathBuf;

/// Environment variable naming the elastix executable.
pub const ELASTIX_ENV: &str = "MABAS_ELASTIX";
/// Environment variable naming the transformix executable.
pub const TRANSFORMIX_ENV: &str = "MABAS_TRANSFORMIX";
/// Environment variable with the engine thread count.
pub const THREADS_ENV: &str = "MABAS_THREADS";

/// Where to find elastix and transformix, and how many threads they may use.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ElastixConfig {
    /// elastix executable, looked up on `PATH` when not absolute.
    pub elastix: PathBuf,
    /// transformix executable, looked up on `PATH` when not absolute.
    pub transformix: PathBuf,
    /// Passed as `-threads`; the engines pick their own default otherwise.
    pub threads: Option<usize>,
}

impl Default for ElastixConfig {
    fn default() -> Self {
        Self {
            elastix: PathBuf::from("elastix"),
            transformix: PathBuf::from("transformix"),
            threads: None,
        }
    }
}

impl ElastixConfig {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_elastix(mut self, path: impl Into<PathBuf>) -> Self {
        self.elastix = path.into();
        self
    }

    pub fn with_transformix(mut self, path: impl Into<PathBuf>) -> Self {
        self.transformix = path.into();
        self
    }

    pub fn with_threads(mut self, threads: Option<usize>) -> Self {
        self.threads = threads;
        self
    }

    /// `-threads <n>` when a thread count is set.
    pub(crate) fn thread_args(&self) -> Vec<String> {
        match self.threads {
            Some(n) => vec!["-threads".to_string(), n.to_string()],
            None => Vec::new(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_use_path_lookup() {
        let config = ElastixConfig::default();
        assert_eq!(config.elastix, PathBuf::from("elastix"));
        assert_eq!(config.transformix, PathBuf::from("transformix"));
        assert!(config.thread_args().is_empty());
    }

    #[test]
    fn test_thread_args() {
        let config = ElastixConfig::new().with_threads(Some(4));
        assert_eq!(config.thread_args(), vec!["-threads", "4"]);
    }
}
