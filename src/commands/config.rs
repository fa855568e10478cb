use anyhow::Result;
use std::path::PathBuf;

use crate::{python::Interpreter, runtime::Runtime};

/// Everything a command needs: system access and the interpreter pip runs in.
pub struct Config<R: Runtime> {
    pub runtime: R,
    pub python: Interpreter,
}

impl<R: Runtime> Config<R> {
    pub fn new(runtime: R, python: Option<PathBuf>) -> Result<Self> {
        let python = Interpreter::resolve(&runtime, python)?;
        Ok(Self { runtime, python })
    }
}
