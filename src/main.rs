use anyhow::Result;
use clap::Parser;
use mim::commands::{self, InstallRequest, config::Config};
use std::path::PathBuf;

/// mim - pip with batteries for OpenMMLab packages
///
/// Installs packages through pip of the selected Python interpreter, adding
/// the `mminstall` extra to project packages and the find links for the
/// onedl-mmcv build matching the installed PyTorch.
///
/// Set MMCV_BASE_URL to use a different onedl-mmcv wheel index.
///
/// Examples:
///   mim install mmdet onedl-mmpretrain
///   mim install -e ./local-repo
///   mim install mmdet -i <url> -f <url>
#[derive(Parser, Debug)]
#[command(author, version = env!("MIM_VERSION"), about)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Python interpreter whose pip is used (defaults to python3/python on PATH)
    #[arg(long = "python", env = "MIM_PYTHON", value_name = "PATH", global = true)]
    pub python: Option<PathBuf>,
}

#[derive(clap::Subcommand, Debug)]
enum Commands {
    /// Install packages, the same way as `pip install`
    Install(InstallArgs),

    /// Uninstall packages, the same way as `pip uninstall`
    Uninstall(UninstallArgs),

    /// List installed OpenMMLab packages
    List(ListArgs),
}

#[derive(clap::Args, Debug)]
pub struct InstallArgs {
    /// Base URL of the Python Package Index
    #[arg(short = 'i', long = "index-url", visible_alias = "pypi-url", value_name = "URL")]
    pub index_url: Option<String>,

    /// Deprecated, has no effect
    #[arg(short = 'y', long = "yes")]
    pub yes: bool,

    /// Packages and options passed through to `pip install`
    #[arg(trailing_var_arg = true, allow_hyphen_values = true, value_name = "ARGS")]
    pub args: Vec<String>,
}

#[derive(clap::Args, Debug)]
pub struct UninstallArgs {
    /// Don't ask for confirmation of uninstall deletions
    #[arg(short = 'y', long = "yes")]
    pub yes: bool,

    /// Packages and options passed through to `pip uninstall`
    #[arg(trailing_var_arg = true, allow_hyphen_values = true, value_name = "ARGS")]
    pub args: Vec<String>,
}

#[derive(clap::Args, Debug)]
pub struct ListArgs {
    /// List all installed packages, not only OpenMMLab ones
    #[arg(long)]
    pub all: bool,
}

fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).init();
    let cli = Cli::parse();
    let config = Config::new(mim::runtime::RealRuntime, cli.python)?;

    let exit_code = match cli.command {
        Commands::Install(args) => {
            let request = InstallRequest::new(args.args, args.index_url, args.yes)?;
            commands::install(&config, request)?
        }
        Commands::Uninstall(args) => commands::uninstall(&config, args.args, args.yes)?,
        Commands::List(args) => {
            commands::list(&config, args.all)?;
            0
        }
    };

    std::process::exit(exit_code)
}
