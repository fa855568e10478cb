//! Command implementations behind the CLI subcommands.

pub mod config;
mod install;
mod list;
mod resources;
mod uninstall;

pub use install::{InstallRequest, build_install_args, install};
pub use list::{PackageInfo, list, list_packages};
pub use resources::{MIM_RESOURCE_DIR, check_mim_resources, locate_install_dir};
pub use uninstall::uninstall;
