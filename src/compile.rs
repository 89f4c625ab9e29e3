use crate::command::CommandRunner;
use crate::config::InvocationConfig;
use crate::error::RunnerError;
use crate::invocation::Invocation;
use log::{debug, info, log_enabled, Level};
use std::path::Path;

/// Runs `cmake --build` for the configured project and waits for it.
pub fn compile(config: &InvocationConfig, runner: &dyn CommandRunner) -> Result<(), RunnerError> {
    check_project_directory(&config.project_directory)?;

    let binary = config.binary.resolve()?;
    let invocation = Invocation::new(config, binary);

    debug!("projectDirectory: {}", config.project_directory.display());
    debug!("target: {}", or_none(&config.target));
    debug!("config: {}", or_none(&config.build_config));
    if log_enabled!(Level::Debug) {
        debug!("environment: {:?}", invocation.environment());
    }
    debug!("command-line: {}", invocation);

    info!("Building {}", config.project_directory.display());
    runner.run(&invocation)
}

fn or_none(value: &Option<String>) -> &str {
    value.as_deref().unwrap_or("<none>")
}

fn check_project_directory(dir: &Path) -> Result<(), RunnerError> {
    if !dir.exists() {
        return Err(RunnerError::InvalidDirectory(absolute_for_display(dir), "does not exist"));
    }
    if !dir.is_dir() {
        return Err(RunnerError::InvalidDirectory(
            absolute_for_display(dir),
            "must be a directory",
        ));
    }
    Ok(())
}

fn absolute_for_display(dir: &Path) -> std::path::PathBuf {
    std::env::current_dir()
        .map(|cwd| cwd.join(dir))
        .unwrap_or_else(|_| dir.to_path_buf())
}
