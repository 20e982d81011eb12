//! Subcommand dispatch and execution.
//!
//! The [`dispatch`] function routes the parsed CLI to the appropriate
//! subcommand handler: [`run`], [`init`], [`validate`], [`health`], or
//! [`resolve`]. Each handler lives in its own submodule.

pub mod health;
pub mod init;
pub mod resolve;
pub mod run;
pub mod validate;

use crate::cli::{Cli, Commands};
use crate::error::RegionNearbyError;

pub async fn dispatch(cli: Cli) -> Result<(), RegionNearbyError> {
    match cli.command {
        Some(Commands::Run(args)) => run::execute(*args).await,
        Some(Commands::Init(ref args)) => init::execute(args),
        Some(Commands::Validate(ref args)) => validate::execute(args),
        Some(Commands::Health(args)) => health::execute(args).await,
        Some(Commands::Resolve(ref args)) => resolve::execute(args),
        None => {
            print_welcome();
            Ok(())
        }
    }
}

fn print_welcome() {
    let version = env!("CARGO_PKG_VERSION");
    println!(
        "\n  region-nearby v{version}: forward requests with the caller's address\n\n  \
         No command provided. To get started:\n\n    \
         region-nearby init                    Generate a starter config\n    \
         region-nearby run                     Start the server (auto-detects ./region-nearby.yaml)\n    \
         region-nearby resolve 53.48 -2.24     Nearest AWS region to a point\n    \
         region-nearby --help                  See all commands and options\n"
    );
}
