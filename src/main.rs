use crate::{
    addon::install::InstallArgs,
    error::InstallError,
    utils::{
        logger::{LogLevel, Logger},
        signature::get_signature,
        version::get_version,
    },
};
use clap::CommandFactory;
use clap::FromArgMatches;
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use std::process::ExitCode;

mod addon;
mod error;
mod installer;
mod types;
mod utils;

#[derive(Parser)]
#[command(name = "wowpack")]
#[command(author = "Wowpack")]
#[command(about = "Resolve and install World of Warcraft addons from CurseForge and WowAce")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Install addons, replacing the content of the installation directory
    #[command(visible_alias = "i")]
    Install {
        /// Addons as <name> or <name>:<provider> (curse | wowace). Provider defaults to curse.
        #[arg(required = true)]
        addons: Vec<String>,
        /// Install into this directory instead of the configured one
        #[arg(long)]
        path: Option<PathBuf>,
        /// Timeout in seconds for each HTTP request
        #[arg(long)]
        timeout: Option<u64>,
    },

    /// List the addons recorded for the installation directory
    #[command(visible_alias = "ls")]
    List {},

    /// Show the installation directory, or set it
    Path {
        /// New installation directory
        dir: Option<PathBuf>,
    },

    #[command(external_subcommand)]
    External(Vec<String>),
}

#[tokio::main]
async fn main() -> ExitCode {
    let version = get_version();
    let signature = get_signature(&version);

    let version_static: &'static str = Box::leak(format!("v{}", version).into_boxed_str());
    let signature_static: &'static str = Box::leak(signature.into_boxed_str());

    let mut cmd = Cli::command();
    cmd = cmd.version(version_static).before_help(signature_static);

    let raw_args: Vec<String> = std::env::args().collect();
    if raw_args.iter().any(|a| a == "--version" || a == "-V") {
        println!("{}", signature_static);
        return ExitCode::SUCCESS;
    }

    let matches = cmd.get_matches();
    let cli: Cli = match Cli::from_arg_matches(&matches) {
        Ok(cli) => cli,
        Err(e) => e.exit(),
    };

    let result = match cli.command {
        Commands::Install {
            addons,
            path,
            timeout,
        } => {
            addon::install::install_addons(InstallArgs {
                addons,
                path,
                timeout,
            })
            .await
        }

        Commands::List {} => addon::manage::list_installation(),

        Commands::Path { dir } => addon::manage::manage_path(dir),

        Commands::External(args) => {
            Logger::new().log_message(
                LogLevel::Debug,
                &format!("Ignoring unknown command: {}", args.join(" ")),
            );
            Ok(())
        }
    };

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => report(&e),
    }
}

fn report(err: &InstallError) -> ExitCode {
    let logger = Logger::new();
    match err {
        InstallError::AddonsFailed(failures) => {
            let lines: Vec<String> = failures
                .iter()
                .map(|f| format!("{}: {}", f.addon, f.error))
                .collect();
            logger.log_message_with_trace(
                LogLevel::Error,
                &format!(
                    "{} addon(s) failed, nothing was installed",
                    failures.len()
                ),
                lines.iter().map(|s| s.as_str()).collect(),
            );
        }
        other => logger.log_message(LogLevel::Error, &other.to_string()),
    }

    ExitCode::from(u8::try_from(err.exit_code()).unwrap_or(1))
}
