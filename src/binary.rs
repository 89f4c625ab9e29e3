use crate::error::RunnerError;
use log::{debug, info};
use std::path::{Path, PathBuf};

pub const DEFAULT_ROOT_DIR: &str = "/usr";
pub const DEFAULT_CHILD_DIR: &str = "bin/cmake";
pub const DEFAULT_BUILD_DIR: &str = "target";

const PROVISIONED_PATH: &str = "dependency/cmake/bin/cmake";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BinarySource {
    Provisioned { build_directory: PathBuf },
    Native { root_dir: String, child_dir: String },
    Explicit(PathBuf),
    Search(String),
}

impl Default for BinarySource {
    fn default() -> Self {
        BinarySource::Provisioned {
            build_directory: PathBuf::from(DEFAULT_BUILD_DIR),
        }
    }
}

impl BinarySource {
    pub fn native_default() -> Self {
        BinarySource::Native {
            root_dir: DEFAULT_ROOT_DIR.to_string(),
            child_dir: DEFAULT_CHILD_DIR.to_string(),
        }
    }

    // Only `Search` checks that the binary exists.
    pub fn resolve(&self) -> Result<PathBuf, RunnerError> {
        match self {
            BinarySource::Provisioned { build_directory } => {
                Ok(absolute(&build_directory.join(PROVISIONED_PATH))?)
            }
            BinarySource::Native { root_dir, child_dir } => {
                info!("Configured to use native CMake");
                Ok(absolute(&PathBuf::from(format!("{}/{}", root_dir, child_dir)))?)
            }
            BinarySource::Explicit(path) => Ok(path.clone()),
            BinarySource::Search(name) => {
                let found = which::which(name).map_err(|e| RunnerError::LaunchFailure {
                    binary: PathBuf::from(name),
                    source: std::io::Error::new(std::io::ErrorKind::NotFound, e),
                })?;
                debug!("Found {} on PATH at {}", name, found.display());
                Ok(found)
            }
        }
    }
}

fn absolute(path: &Path) -> std::io::Result<PathBuf> {
    if path.is_absolute() {
        Ok(path.to_path_buf())
    } else {
        Ok(std::env::current_dir()?.join(path))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_provisioned_path() {
        let source = BinarySource::Provisioned {
            build_directory: PathBuf::from("/work/target"),
        };
        assert_eq!(
            source.resolve().unwrap(),
            PathBuf::from("/work/target/dependency/cmake/bin/cmake")
        );
    }

    #[test]
    fn test_provisioned_relative_build_directory_is_made_absolute() {
        let resolved = BinarySource::default().resolve().unwrap();
        assert!(resolved.is_absolute());
        assert!(resolved.ends_with("target/dependency/cmake/bin/cmake"));
    }

    #[test]
    fn test_native_default_path() {
        assert_eq!(
            BinarySource::native_default().resolve().unwrap(),
            PathBuf::from("/usr/bin/cmake")
        );
    }

    #[test]
    fn test_native_custom_root() {
        let source = BinarySource::Native {
            root_dir: "/opt/cmake-3.28".to_string(),
            child_dir: "bin/cmake".to_string(),
        };
        assert_eq!(source.resolve().unwrap(), PathBuf::from("/opt/cmake-3.28/bin/cmake"));
    }

    #[test]
    fn test_explicit_path_is_untouched() {
        let source = BinarySource::Explicit(PathBuf::from("tools/cmake"));
        assert_eq!(source.resolve().unwrap(), PathBuf::from("tools/cmake"));
    }

    #[test]
    fn test_search_missing_binary_is_launch_failure() {
        let source = BinarySource::Search("cmake-runner-no-such-binary".to_string());
        assert!(matches!(source.resolve(), Err(RunnerError::LaunchFailure { .. })));
    }

    #[cfg(unix)]
    #[test]
    fn test_search_finds_binary_on_path() {
        let found = BinarySource::Search("sh".to_string()).resolve().unwrap();
        assert!(found.is_absolute());
        assert!(found.ends_with("sh"));
    }
}
