//! Command line surface of `tc`

use clap::{error::ErrorKind, Args, Parser, Subcommand, ValueEnum};
use std::path::PathBuf;
use url::Url;

/// Trigger personal builds on TeamCity. Specify `-h` with a specific sub command for more
/// specific help.
#[derive(Debug, Parser)]
#[command(name = "tc", version, arg_required_else_help = true)]
pub struct Cli {
    /// Print debug output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Command,
}

impl Cli {
    pub fn log_level(&self) -> log::LevelFilter {
        if self.verbose {
            log::LevelFilter::Debug
        } else {
            log::LevelFilter::Warn
        }
    }
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Neo4j Linux
    Linux(LinuxArgs),
    /// HA robustness with branch artifacts
    Har(HarArgs),
}

impl Command {
    pub fn common(&self) -> &CommonArgs {
        match self {
            Command::Linux(args) => &args.common,
            Command::Har(args) => &args.common,
        }
    }
}

/// Arguments shared by every build type
#[derive(Debug, Clone, Args)]
pub struct CommonArgs {
    /// TeamCity username
    #[arg(short, long, value_name = "USERNAME", required_unless_present = "config")]
    pub user: Option<String>,

    /// TeamCity password
    #[arg(short, long, required_unless_present = "config")]
    pub password: Option<String>,

    /// Public remote repo where branch exists [default: origin]
    #[arg(short, long, value_name = "URL")]
    pub remote: Option<String>,

    /// Url to TeamCity [default: https://build.neohq.net]
    #[arg(long, value_name = "URL", value_parser = parse_base_url)]
    pub teamcity: Option<Url>,

    /// Start a personal build
    #[arg(long, conflicts_with = "no_personal")]
    pub personal: bool,

    /// Start a regular (non-personal) build
    #[arg(long = "no-personal")]
    pub no_personal: bool,

    /// TOML file with defaults for user, password, remote, teamcity and personal
    #[arg(long, value_name = "FILE")]
    pub config: Option<PathBuf>,
}

impl CommonArgs {
    /// The personal toggle as given on the command line, if it was given at all
    pub fn personal_flag(&self) -> Option<bool> {
        match (self.personal, self.no_personal) {
            (true, _) => Some(true),
            (_, true) => Some(false),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Args)]
pub struct LinuxArgs {
    #[command(flatten)]
    pub common: CommonArgs,

    /// Branch on remote to checkout
    #[arg(short, long)]
    pub branch: String,

    /// Maven goal(s) to invoke
    #[arg(long, value_name = "GOALS", default_value = "clean verify")]
    pub maven_goals: String,

    /// Additional Maven arguments
    #[arg(
        long,
        value_name = "ARGS",
        default_value = "-DrunITs -DskipBrowser",
        allow_hyphen_values = true
    )]
    pub maven_args: String,

    /// JDK to build with
    #[arg(long, value_enum, default_value_t = Jdk::OpenJdk8)]
    pub jdk: Jdk,
}

#[derive(Debug, Clone, Args)]
pub struct HarArgs {
    #[command(flatten)]
    pub common: CommonArgs,

    /// Branch on remote to checkout
    #[arg(short, long)]
    pub branch: String,
}

/// JDKs available on the Linux build agents
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum Jdk {
    #[value(name = "openjdk-8")]
    OpenJdk8,
    #[value(name = "openjdk-7")]
    OpenJdk7,
    #[value(name = "oracle-jdk-8")]
    OracleJdk8,
    #[value(name = "oracle-jdk-7")]
    OracleJdk7,
    #[value(name = "ibmjdk-8")]
    IbmJdk8,
    #[value(name = "ibmjdk-7")]
    IbmJdk7,
}

impl Jdk {
    pub fn as_str(&self) -> &'static str {
        match self {
            Jdk::OpenJdk8 => "openjdk-8",
            Jdk::OpenJdk7 => "openjdk-7",
            Jdk::OracleJdk8 => "oracle-jdk-8",
            Jdk::OracleJdk7 => "oracle-jdk-7",
            Jdk::IbmJdk8 => "ibmjdk-8",
            Jdk::IbmJdk7 => "ibmjdk-7",
        }
    }
}

/// Parse a URL that TeamCity endpoints can be joined onto
pub fn parse_base_url(s: &str) -> Result<Url, String> {
    let url = Url::parse(s).map_err(|e| format!("invalid URL {:?}: {}", s, e))?;
    if !matches!(url.scheme(), "http" | "https") || url.cannot_be_a_base() {
        return Err(format!("{:?} is not an http(s) base URL", s));
    }
    Ok(url)
}

/// Exit status for a command line that clap refused to parse
///
/// Help and version output are successful exits, as is running without a command, which prints
/// the help text.
pub fn usage_exit_code(err: &clap::Error) -> u8 {
    match err.kind() {
        ErrorKind::DisplayHelp
        | ErrorKind::DisplayVersion
        | ErrorKind::DisplayHelpOnMissingArgumentOrSubcommand => 0,
        _ => 1,
    }
}
