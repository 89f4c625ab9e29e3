use anyhow::Result;
use clap::Parser;
use cmake_runner::binary::BinarySource;
use cmake_runner::command::SystemCommandRunner;
use cmake_runner::compile::compile;
use cmake_runner::config::{ConfigFile, InvocationConfig};
use cmake_runner::error::RunnerError;
use env_logger::Env;
use log::{error, info};
use std::path::PathBuf;
use std::process::ExitCode;

#[derive(Parser)]
#[command(author, version, about, long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Enable verbose logging.
    #[arg(short, long, default_value_t = false)]
    verbose: bool,
}

#[derive(clap::Subcommand)]
enum Commands {
    /// Builds a project previously generated by CMake.
    Compile(CompileArgs),
}

#[derive(clap::Args)]
struct CompileArgs {
    /// JSON file with build parameters. Command-line flags take precedence.
    #[arg(long)]
    config_file: Option<PathBuf>,

    /// Directory containing the generated project files.
    #[arg(long)]
    project_directory: Option<PathBuf>,

    /// The target to build.
    #[arg(long)]
    target: Option<String>,

    /// The build configuration (e.g. "Release").
    #[arg(long)]
    build_config: Option<String>,

    /// Extra option passed to cmake, may be repeated.
    #[arg(long = "option", allow_hyphen_values = true)]
    options: Vec<String>,

    /// Environment variable for the build, as KEY=VALUE. May be repeated.
    #[arg(long = "env", value_parser = parse_key_val)]
    env: Vec<(String, String)>,

    /// Use a natively installed cmake instead of the provisioned one.
    #[arg(long)]
    native: bool,

    /// Build directory holding the provisioned cmake.
    #[arg(long)]
    build_directory: Option<PathBuf>,

    /// Root of the native cmake installation.
    #[arg(long)]
    cmake_root_dir: Option<String>,

    /// Path of the cmake executable below the root directory.
    #[arg(long)]
    cmake_child_dir: Option<String>,

    /// Run this cmake executable directly.
    #[arg(long, conflicts_with_all = ["native", "search_path"])]
    cmake: Option<PathBuf>,

    /// Look up cmake on PATH.
    #[arg(long, conflicts_with = "native")]
    search_path: bool,
}

fn parse_key_val(s: &str) -> Result<(String, String), String> {
    let (key, value) = s
        .split_once('=')
        .ok_or_else(|| format!("expected KEY=VALUE, got '{}'", s))?;
    if key.is_empty() {
        return Err(format!("empty variable name in '{}'", s));
    }
    Ok((key.to_string(), value.to_string()))
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    let log_level = if cli.verbose { "debug" } else { "info" };
    env_logger::Builder::from_env(Env::default().default_filter_or(log_level)).init();

    match run(cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            error!("{:#}", e);
            let code = e
                .downcast_ref::<RunnerError>()
                .map_or(1, RunnerError::exit_code);
            // Exit codes outside 1..=255 cannot be reported as-is.
            ExitCode::from(u8::try_from(code).ok().filter(|c| *c != 0).unwrap_or(1))
        }
    }
}

fn run(cli: Cli) -> Result<()> {
    match cli.command {
        Commands::Compile(args) => {
            let file = match &args.config_file {
                Some(path) => ConfigFile::load(path)?,
                None => ConfigFile::default(),
            };
            let config = merge(file, args)?;

            info!(
                "Compile running. Project Dir: {}, Target: {}, Config: {}",
                config.project_directory.display(),
                config.target.as_deref().unwrap_or("<default>"),
                config.build_config.as_deref().unwrap_or("<default>")
            );
            compile(&config, &SystemCommandRunner)?;
        }
    }

    Ok(())
}

/// Applies command-line flags on top of the config file.
fn merge(mut file: ConfigFile, args: CompileArgs) -> Result<InvocationConfig, RunnerError> {
    if args.project_directory.is_some() {
        file.project_directory = args.project_directory;
    }
    if args.target.is_some() {
        file.target = args.target;
    }
    if args.build_config.is_some() {
        file.config = args.build_config;
    }
    file.options.extend(args.options);
    file.environment_variables.extend(args.env);
    if args.build_directory.is_some() {
        file.build_directory = args.build_directory;
    }
    if args.cmake_root_dir.is_some() {
        file.cmake_root_dir = args.cmake_root_dir;
    }
    if args.cmake_child_dir.is_some() {
        file.cmake_child_dir = args.cmake_child_dir;
    }
    // A binary chosen on the command line replaces whatever the file selected.
    if args.native {
        file.download_binaries = Some(false);
        file.cmake_binary = None;
    }
    if args.cmake.is_some() {
        file.cmake_binary = args.cmake;
    }

    let config = file.into_config()?;
    if args.search_path {
        return Ok(config.binary(BinarySource::Search("cmake".to_string())));
    }
    Ok(config)
}
