pub mod commands;
pub mod index;
pub mod package;
pub mod python;
pub mod runtime;
