use anyhow::Result;
use clap::{Parser, Subcommand};

pub mod commands;

#[derive(Parser, Debug)]
#[command(
    name = "sprig",
    version,
    about = "Small npm-compatible package manager with reproducible installs"
)]
pub struct SprigCli {
    #[command(subcommand)]
    pub(crate) command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Create a new package.json
    Init {
        #[arg(long)]
        name: Option<String>,
        #[arg(long)]
        version: Option<String>,
    },
    /// Install every dependency declared in package.json
    #[command(alias = "i")]
    Install {
        #[arg(long)]
        registry: Option<String>,
    },
    /// Reproduce the exact state recorded in sprig-lock.json
    Ci {
        #[arg(long)]
        registry: Option<String>,
    },
    /// Add one or more dependencies and install them
    Add {
        /// Package specs: name or name@requirement
        #[arg(required = true)]
        packages: Vec<String>,
        #[arg(long, short = 'D')]
        dev: bool,
        #[arg(long)]
        registry: Option<String>,
    },
    /// Remove one or more dependencies
    Remove {
        #[arg(required = true)]
        packages: Vec<String>,
    },
    /// Run a script from package.json with node_modules/.bin on PATH
    Run {
        /// Script name; remaining args are passed through
        #[arg(trailing_var_arg = true, required = true)]
        args: Vec<String>,
    },
}

impl SprigCli {
    pub fn parse() -> Self {
        <Self as Parser>::parse()
    }

    pub fn run(&self) -> Result<()> {
        match &self.command {
            Commands::Init { name, version } => commands::cmd_init(name.clone(), version.clone()),
            Commands::Install { registry } => commands::cmd_install(registry.clone()),
            Commands::Ci { registry } => commands::cmd_ci(registry.clone()),
            Commands::Add { packages, dev, registry } => {
                commands::cmd_add(packages.clone(), *dev, registry.clone())
            }
            Commands::Remove { packages } => commands::cmd_remove(packages.clone()),
            Commands::Run { args } => commands::cmd_run(args.clone()),
        }
    }
}
