use crate::config::InvocationConfig;
use std::collections::BTreeMap;
use std::ffi::{OsStr, OsString};
use std::path::{Path, PathBuf};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Invocation {
    program: PathBuf,
    args: Vec<OsString>,
    env: BTreeMap<String, String>,
}

impl Invocation {
    // --build <dir> [--target <t>] [--config <c>] [<options>...]
    pub fn new(config: &InvocationConfig, program: PathBuf) -> Self {
        let mut args: Vec<OsString> = vec![
            "--build".into(),
            config.project_directory.as_os_str().to_os_string(),
        ];
        if let Some(target) = &config.target {
            args.push("--target".into());
            args.push(target.into());
        }
        if let Some(build_config) = &config.build_config {
            args.push("--config".into());
            args.push(build_config.into());
        }
        args.extend(config.extra_options.iter().map(OsString::from));

        Invocation {
            program,
            args,
            env: config.environment_overrides.clone(),
        }
    }

    pub fn program(&self) -> &Path {
        &self.program
    }

    pub fn args(&self) -> &[OsString] {
        &self.args
    }

    pub fn env_overrides(&self) -> &BTreeMap<String, String> {
        &self.env
    }

    pub fn command_line(&self) -> Vec<&OsStr> {
        std::iter::once(self.program.as_os_str())
            .chain(self.args.iter().map(OsString::as_os_str))
            .collect()
    }

    pub fn environment(&self) -> BTreeMap<OsString, OsString> {
        merge_environment(std::env::vars_os(), &self.env)
    }
}

impl std::fmt::Display for Invocation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let command_line = self.command_line();
        let parts: Vec<_> = command_line.iter().map(|s| s.to_string_lossy()).collect();
        write!(f, "{}", parts.join(" "))
    }
}

pub fn merge_environment<I>(
    inherited: I,
    overrides: &BTreeMap<String, String>,
) -> BTreeMap<OsString, OsString>
where
    I: IntoIterator<Item = (OsString, OsString)>,
{
    let mut env: BTreeMap<OsString, OsString> = inherited.into_iter().collect();
    for (key, value) in overrides {
        env.insert(key.into(), value.into());
    }
    env
}
