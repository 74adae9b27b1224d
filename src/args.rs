use crate::api::DEFAULT_URL;
use crate::model::VulnerableField;
use clap::{ArgAction, Parser, Subcommand};
use clap_complete::Shell;

#[derive(Debug, Parser)]
#[command(name = "glvdctl", version, about = "Query the Garden Linux Vulnerability Database")]
pub struct Args {
    /// Turn debugging information on
    #[arg(short, long, global = true, action(ArgAction::Count))]
    pub verbose: u8,
    /// Less verbose output
    #[arg(short, long, global = true, action(ArgAction::Count))]
    pub quiet: u8,
    /// Disable colored output (also respects NO_COLOR)
    #[arg(long, global = true)]
    pub no_color: bool,
    /// Base url of the GLVD service
    #[arg(long, global = true, env = "GLVD_URL", default_value = DEFAULT_URL)]
    pub url: String,
    /// JSON field that holds the vulnerability flag of a cve list entry
    #[arg(
        long,
        global = true,
        env = "GLVD_VULNERABLE_FIELD",
        value_enum,
        default_value_t = VulnerableField::Vulnerable
    )]
    pub vulnerable_field: VulnerableField,
    #[command(subcommand)]
    pub subcommand: SubCommand,
}

impl Args {
    pub fn log_level(&self) -> &'static str {
        match (self.verbose, self.quiet) {
            (0, 0) => "warn",
            (0, 1) => "error",
            (0, _) => "off",
            (1, _) => "info",
            (2, _) => "debug",
            _ => "trace",
        }
    }
}

#[derive(Debug, Subcommand)]
pub enum SubCommand {
    /// List Garden Linux releases known in GLVD
    #[command(alias = "versions")]
    Version {
        #[command(subcommand)]
        subcommand: Version,
    },
    /// Inspect CVEs known to GLVD
    #[command(alias = "cves")]
    Cve {
        #[command(subcommand)]
        subcommand: Cve,
    },
    /// Browse releases, their CVEs and CVE details in a terminal UI
    Browse,
    /// Generate shell completions
    Completions(Completions),
}

#[derive(Debug, Subcommand)]
pub enum Version {
    /// List Garden Linux releases known in GLVD
    #[command(alias = "ls")]
    List,
}

#[derive(Debug, Subcommand)]
pub enum Cve {
    /// List known CVEs for this Garden Linux version
    #[command(alias = "ls")]
    List {
        /// Garden Linux version, eg. 1443.3
        version: String,
    },
    /// Show details about this CVE
    Show {
        /// CVE id, eg. CVE-2024-1086
        cve_id: String,
    },
}

#[derive(Debug, Parser)]
pub struct Completions {
    pub shell: Shell,
}
