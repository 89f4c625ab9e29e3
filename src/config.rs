use crate::binary::{BinarySource, DEFAULT_BUILD_DIR, DEFAULT_CHILD_DIR, DEFAULT_ROOT_DIR};
use crate::error::RunnerError;
use log::info;
use serde::Deserialize;
use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InvocationConfig {
    pub project_directory: PathBuf,
    pub target: Option<String>,
    pub build_config: Option<String>,
    pub extra_options: Vec<String>,
    pub environment_overrides: BTreeMap<String, String>,
    pub binary: BinarySource,
}

impl InvocationConfig {
    pub fn new<P>(project_directory: P) -> Self
    where
        P: Into<PathBuf>,
    {
        Self {
            project_directory: project_directory.into(),
            target: None,
            build_config: None,
            extra_options: Vec::new(),
            environment_overrides: BTreeMap::new(),
            binary: BinarySource::default(),
        }
    }

    pub fn target<T: Into<String>>(mut self, target: T) -> Self {
        self.target = Some(target.into());
        self
    }

    pub fn build_config<T: Into<String>>(mut self, config: T) -> Self {
        self.build_config = Some(config.into());
        self
    }

    pub fn option<T: Into<String>>(mut self, option: T) -> Self {
        self.extra_options.push(option.into());
        self
    }

    pub fn env<K: Into<String>, V: Into<String>>(mut self, key: K, value: V) -> Self {
        self.environment_overrides.insert(key.into(), value.into());
        self
    }

    pub fn binary(mut self, binary: BinarySource) -> Self {
        self.binary = binary;
        self
    }

    pub fn from_file(path: &Path) -> Result<Self, RunnerError> {
        ConfigFile::load(path)?.into_config()
    }
}

/// On-disk form. Field names match the parameter names the build plugin
/// has always accepted.
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase", default, deny_unknown_fields)]
pub struct ConfigFile {
    pub project_directory: Option<PathBuf>,
    pub target: Option<String>,
    pub config: Option<String>,
    pub options: Vec<String>,
    pub environment_variables: BTreeMap<String, String>,
    pub download_binaries: Option<bool>,
    pub build_directory: Option<PathBuf>,
    pub cmake_root_dir: Option<String>,
    pub cmake_child_dir: Option<String>,
    pub cmake_binary: Option<PathBuf>,
}

impl ConfigFile {
    pub fn load(path: &Path) -> Result<Self, RunnerError> {
        info!("Reading config file: {}", path.display());
        let content = fs::read_to_string(path)
            .map_err(|e| RunnerError::ConfigRead(path.to_path_buf(), e))?;
        serde_json::from_str(&content).map_err(|e| RunnerError::ConfigParse(path.to_path_buf(), e))
    }

    pub fn into_config(self) -> Result<InvocationConfig, RunnerError> {
        let project_directory = self
            .project_directory
            .ok_or(RunnerError::MissingProjectDirectory)?;

        let binary = if let Some(path) = self.cmake_binary {
            BinarySource::Explicit(path)
        } else if self.download_binaries.unwrap_or(true) {
            BinarySource::Provisioned {
                build_directory: self
                    .build_directory
                    .unwrap_or_else(|| PathBuf::from(DEFAULT_BUILD_DIR)),
            }
        } else {
            BinarySource::Native {
                root_dir: self.cmake_root_dir.unwrap_or_else(|| DEFAULT_ROOT_DIR.to_string()),
                child_dir: self.cmake_child_dir.unwrap_or_else(|| DEFAULT_CHILD_DIR.to_string()),
            }
        };

        Ok(InvocationConfig {
            project_directory,
            target: self.target,
            build_config: self.config,
            extra_options: self.options,
            environment_overrides: self.environment_variables,
            binary,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn test_builder_defaults() {
        let config = InvocationConfig::new("/tmp/proj");
        assert_eq!(config.project_directory, PathBuf::from("/tmp/proj"));
        assert!(config.target.is_none());
        assert!(config.build_config.is_none());
        assert!(config.extra_options.is_empty());
        assert!(config.environment_overrides.is_empty());
        assert_eq!(config.binary, BinarySource::default());
    }

    #[test]
    fn test_builder_keeps_option_order() {
        let config = InvocationConfig::new("p").option("--clean-first").option("-j").option("4");
        assert_eq!(config.extra_options, vec!["--clean-first", "-j", "4"]);
    }

    #[test]
    fn test_from_file_full() {
        let temp_dir = tempdir().unwrap();
        let path = temp_dir.path().join("cmake.json");
        fs::write(
            &path,
            r#"{
                "projectDirectory": "build/native",
                "target": "install",
                "config": "Release",
                "options": ["--parallel", "8"],
                "environmentVariables": {"CC": "clang"},
                "downloadBinaries": false,
                "cmakeRootDir": "/opt/cmake"
            }"#,
        )
        .unwrap();

        let config = InvocationConfig::from_file(&path).unwrap();
        assert_eq!(config.project_directory, PathBuf::from("build/native"));
        assert_eq!(config.target.as_deref(), Some("install"));
        assert_eq!(config.build_config.as_deref(), Some("Release"));
        assert_eq!(config.extra_options, vec!["--parallel", "8"]);
        assert_eq!(config.environment_overrides.get("CC").map(String::as_str), Some("clang"));
        assert_eq!(
            config.binary,
            BinarySource::Native {
                root_dir: "/opt/cmake".to_string(),
                child_dir: "bin/cmake".to_string(),
            }
        );
    }

    #[test]
    fn test_from_file_defaults_to_provisioned_binary() {
        let temp_dir = tempdir().unwrap();
        let path = temp_dir.path().join("cmake.json");
        fs::write(&path, r#"{"projectDirectory": "p", "buildDirectory": "out"}"#).unwrap();

        let config = InvocationConfig::from_file(&path).unwrap();
        assert_eq!(
            config.binary,
            BinarySource::Provisioned { build_directory: PathBuf::from("out") }
        );
    }

    #[test]
    fn test_from_file_explicit_binary_wins_over_download_flag() {
        let temp_dir = tempdir().unwrap();
        let path = temp_dir.path().join("cmake.json");
        fs::write(
            &path,
            r#"{"projectDirectory": "p", "downloadBinaries": false, "cmakeBinary": "/tools/cmake"}"#,
        )
        .unwrap();

        let config = InvocationConfig::from_file(&path).unwrap();
        assert_eq!(config.binary, BinarySource::Explicit(PathBuf::from("/tools/cmake")));
    }

    #[test]
    fn test_from_file_missing_project_directory() {
        let temp_dir = tempdir().unwrap();
        let path = temp_dir.path().join("cmake.json");
        fs::write(&path, r#"{"target": "all"}"#).unwrap();

        let result = InvocationConfig::from_file(&path);
        assert!(matches!(result, Err(RunnerError::MissingProjectDirectory)));
    }

    #[test]
    fn test_from_file_unreadable() {
        let temp_dir = tempdir().unwrap();
        let result = InvocationConfig::from_file(&temp_dir.path().join("missing.json"));
        assert!(matches!(result, Err(RunnerError::ConfigRead(..))));
    }

    #[test]
    fn test_from_file_rejects_unknown_fields() {
        let temp_dir = tempdir().unwrap();
        let path = temp_dir.path().join("cmake.json");
        fs::write(&path, r#"{"projectDirectory": "p", "generator": "Ninja"}"#).unwrap();

        let result = InvocationConfig::from_file(&path);
        assert!(matches!(result, Err(RunnerError::ConfigParse(..))));
    }
}
