use anyhow::Result;

use super::config::Config;
use crate::runtime::Runtime;

/// Uninstall packages with pip, returning pip's exit code.
#[tracing::instrument(skip(config))]
pub fn uninstall<R: Runtime>(config: &Config<R>, mut args: Vec<String>, yes: bool) -> Result<i32> {
    if yes && !args.iter().any(|arg| arg == "-y" || arg == "--yes") {
        args.push("-y".to_string());
    }
    config.python.pip(&config.runtime, "uninstall", &args)
}
