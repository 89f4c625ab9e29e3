use std::path::PathBuf;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum RunnerError {
    #[error("I/O error")]
    Io(#[from] std::io::Error),

    #[error("{0} {1}")]
    InvalidDirectory(PathBuf, &'static str),

    #[error("Failed to launch '{binary}': {source}")]
    LaunchFailure {
        binary: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Return code: {0}")]
    NonZeroExit(i32),

    #[error("Interrupted while waiting for the build to finish")]
    Interrupted,

    #[error("Build process terminated by signal {}", .signal.map_or("?".to_string(), |s| s.to_string()))]
    Terminated { signal: Option<i32> },

    #[error("No project directory configured")]
    MissingProjectDirectory,

    #[error("Could not read config file '{0}': {1}")]
    ConfigRead(PathBuf, std::io::Error),

    #[error("Could not parse config file '{0}': {1}")]
    ConfigParse(PathBuf, serde_json::Error),
}

impl RunnerError {
    /// Exit code to report to the caller. The child's own code for
    /// `NonZeroExit`, a shell-style synthesized code for everything else.
    pub fn exit_code(&self) -> i32 {
        match self {
            RunnerError::NonZeroExit(code) => *code,
            RunnerError::LaunchFailure { .. } => 127,
            RunnerError::Interrupted => 130,
            RunnerError::Terminated { signal } => 128 + signal.unwrap_or(0),
            RunnerError::InvalidDirectory(..)
            | RunnerError::MissingProjectDirectory
            | RunnerError::ConfigRead(..)
            | RunnerError::ConfigParse(..) => 2,
            RunnerError::Io(_) => 1,
        }
    }
}
