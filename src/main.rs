//! # tc-trigger
//!
//! Triggers builds on TeamCity from the command line. Each sub command maps to a build
//! configuration on the server; specify `-h` with a sub command for more specific help.
//!
//! ## Usage
//!
//! ```sh
//! # Custom Neo4j build of a branch on your own fork, using Oracle's JDK
//! tc linux -u jonas -p hunter2 -b 3.5-fix -r git@github.com:jonas/neo4j.git --jdk oracle-jdk-8
//!
//! # HA robustness build
//! tc har -u jonas -p hunter2 -b 3.5-fix --personal
//! ```
//!
//! On success the URL of the queued build is printed. If TeamCity refuses the build, the status
//! code and response body are printed instead and `tc` exits with status 1.
//!
//! ## Configuration
//!
//! Shared options can be kept in a TOML file passed with `--config`:
//!
//! ```toml
//! user = "jonas"
//! password = "hunter2"
//! # Public remote repo where branches exist
//! remote = "origin"
//! teamcity = "https://build.neohq.net"
//! personal = false
//! ```
//!
//! All fields are optional. Options given on the command line take precedence.

use clap::Parser;
use log::*;
use simple_logger::SimpleLogger;
use std::process::ExitCode;
use tc_trigger::cli::{self, Cli};

#[tokio::main(flavor = "current_thread")]
#[doc(hidden)]
async fn main() -> ExitCode {
    let cli = match Cli::try_parse() {
        Ok(cli) => cli,
        Err(e) => {
            let code = cli::usage_exit_code(&e);
            e.print().ok();
            return ExitCode::from(code);
        }
    };

    if let Err(e) = SimpleLogger::new().with_level(cli.log_level()).init() {
        eprintln!("Could not set up logging: {}", e);
    }

    match tc_trigger::run(&cli).await {
        Ok(outcome) => {
            if outcome.is_queued() {
                println!("{}", outcome);
            } else {
                eprintln!("{}", outcome);
            }
            ExitCode::from(outcome.exit_code())
        }
        Err(e) => {
            debug!("{:?}", e);
            eprintln!("error: {:#}", e);
            ExitCode::FAILURE
        }
    }
}
