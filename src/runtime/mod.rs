//! Runtime abstraction for system operations.
//!
//! This module provides a trait-based abstraction over system operations,
//! enabling dependency injection and testability.
//!
//! # Structure
//!
//! - `env` - Environment variables and executable lookup
//! - `fs` - File system probes (exists, read, directory listing)
//! - `process` - Subprocess execution (pass-through and captured)

mod env;
mod fs;
mod process;

use anyhow::Result;
use std::env as std_env;
use std::path::{Path, PathBuf};

#[cfg_attr(test, mockall::automock)]
pub trait Runtime {
    // Environment
    fn env_var(&self, key: &str) -> Result<String, std_env::VarError>;

    /// Locate an executable on `PATH`.
    fn find_executable(&self, name: &str) -> Option<PathBuf>;

    // File System
    fn exists(&self, path: &Path) -> bool;
    fn is_dir(&self, path: &Path) -> bool;
    fn read_to_string(&self, path: &Path) -> Result<String>;
    fn read_dir(&self, path: &Path) -> Result<Vec<PathBuf>>;

    // Processes
    /// Run a program with inherited stdio and wait for it. Returns the exit code.
    fn run(&self, program: &Path, args: &[String]) -> Result<i32>;

    /// Run a program and capture its stdout. Fails when the program exits non-zero.
    fn capture(&self, program: &Path, args: &[String]) -> Result<String>;
}

pub struct RealRuntime;

impl Runtime for RealRuntime {
    fn env_var(&self, key: &str) -> Result<String, std_env::VarError> {
        self.env_var_impl(key)
    }

    fn find_executable(&self, name: &str) -> Option<PathBuf> {
        self.find_executable_impl(name)
    }

    fn exists(&self, path: &Path) -> bool {
        self.exists_impl(path)
    }

    fn is_dir(&self, path: &Path) -> bool {
        self.is_dir_impl(path)
    }

    fn read_to_string(&self, path: &Path) -> Result<String> {
        self.read_to_string_impl(path)
    }

    fn read_dir(&self, path: &Path) -> Result<Vec<PathBuf>> {
        self.read_dir_impl(path)
    }

    fn run(&self, program: &Path, args: &[String]) -> Result<i32> {
        self.run_impl(program, args)
    }

    fn capture(&self, program: &Path, args: &[String]) -> Result<String> {
        self.capture_impl(program, args)
    }
}
