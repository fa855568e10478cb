//! Package naming module
//!
//! This module knows which packages belong to the project family and how
//! their install specifiers are rewritten to pull in bundled requirements.

mod spec;
mod table;

pub use spec::{MMINSTALL_EXTRA, add_mminstall_extras, package_name};
pub use table::{COMPANION_PACKAGE, PKG2PROJECT, is_project_package, normalize_name, project_of};
