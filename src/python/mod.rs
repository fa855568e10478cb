//! The Python side of an install: which interpreter runs pip, what torch
//! build it has, and which distributions are installed into it.

mod distribution;
mod interpreter;
mod probe;

pub use distribution::{Distribution, Metadata, find_distributions};
pub use interpreter::Interpreter;
pub use probe::{Device, DeviceKind, ProbeReport, TorchEnvironment, probe};
