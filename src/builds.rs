use crate::cli::{Command, HarArgs, LinuxArgs};
use crate::request::BuildRequest;
use crate::Settings;
use anyhow::Result;

/// Maven arguments every TeamCity build needs, prepended to the user's own
const TC_MAVEN_ARGS: &str = "-DfailIfNoTests=false -Dmaven.test.failure.ignore=true --show-version";

/// Build configurations that can be triggered, one per sub command
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BuildType {
    Linux,
    Har,
}

impl BuildType {
    /// TeamCity build type id
    pub fn id(&self) -> &'static str {
        match self {
            BuildType::Linux => "JonasHaRequests_Neo4jCustom",
            BuildType::Har => "JonasHaRequests_HarBranchArtifacts",
        }
    }

    pub fn command_name(&self) -> &'static str {
        match self {
            BuildType::Linux => "linux",
            BuildType::Har => "har",
        }
    }
}

pub fn tc_maven_args(original: &str) -> String {
    format!("{} {}", TC_MAVEN_ARGS, original)
}

/// Custom Neo4j build on Linux
pub fn linux_request(args: &LinuxArgs, settings: &Settings) -> BuildRequest {
    BuildRequest::new(
        BuildType::Linux,
        settings.personal,
        &args.branch,
        &settings.remote,
    )
    .with_property("project-default-jdk", format!("%{}%", args.jdk.as_str()))
    .with_property("maven-goals", args.maven_goals.as_str())
    .with_property("maven-args", tc_maven_args(&args.maven_args))
}

/// HA robustness build, which takes no properties beyond the branch
pub fn har_request(args: &HarArgs, settings: &Settings) -> BuildRequest {
    BuildRequest::new(BuildType::Har, settings.personal, &args.branch, &settings.remote)
}

/// Resolve the settings for `command` and build the request it asks for
pub fn dispatch(command: &Command) -> Result<(Settings, BuildRequest)> {
    let settings = Settings::resolve(command.common())?;
    let request = match command {
        Command::Linux(args) => linux_request(args, &settings),
        Command::Har(args) => har_request(args, &settings),
    };
    Ok((settings, request))
}
