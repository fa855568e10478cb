use anyhow::{Result, bail};
use log::{debug, info};
use std::path::{Path, PathBuf};

use super::probe::{ProbeReport, probe};
use crate::runtime::Runtime;

/// Names tried on `PATH` when no interpreter is given explicitly.
const INTERPRETER_NAMES: &[&str] = &["python3", "python"];

/// The Python interpreter whose environment `pip` operates on.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Interpreter {
    path: PathBuf,
}

impl Interpreter {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Use `explicit` when given, otherwise the first interpreter found on `PATH`.
    pub fn resolve<R: Runtime>(runtime: &R, explicit: Option<PathBuf>) -> Result<Self> {
        if let Some(path) = explicit {
            debug!("Using interpreter {:?}", path);
            return Ok(Self::new(path));
        }

        for name in INTERPRETER_NAMES {
            if let Some(path) = runtime.find_executable(name) {
                debug!("Found interpreter {:?} on PATH", path);
                return Ok(Self::new(path));
            }
        }

        bail!("No Python interpreter found on PATH; pass --python or set MIM_PYTHON")
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Run `python -m pip <subcommand> <args>` and return pip's exit code.
    #[tracing::instrument(skip(self, runtime))]
    pub fn pip<R: Runtime>(&self, runtime: &R, subcommand: &str, args: &[String]) -> Result<i32> {
        let mut pip_args = vec!["-m".to_string(), "pip".to_string(), subcommand.to_string()];
        pip_args.extend(args.iter().cloned());

        info!("Running {} {}", self.path.display(), pip_args.join(" "));
        runtime.run(&self.path, &pip_args)
    }

    pub fn probe<R: Runtime>(&self, runtime: &R, with_torch: bool) -> Result<ProbeReport> {
        let report = probe(runtime, &self.path, with_torch)?;
        debug!("Python {} at {}", report.python, self.path.display());
        Ok(report)
    }
}
