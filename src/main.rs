use clap::{CommandFactory, Parser};
use env_logger::Env;
use glvdctl::api::{self, Client, Glvd};
use glvdctl::args::{Args, Cve, SubCommand, Version};
use glvdctl::browse;
use glvdctl::errors::*;
use glvdctl::format;
use glvdctl::style::Presenter;
use std::io::{self, Write};

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<()> {
    let args = Args::parse();
    env_logger::init_from_env(Env::default().default_filter_or(args.log_level()));

    let client = Client::new(&args.url, args.vulnerable_field)?;
    let presenter = Presenter::detect(args.no_color);
    let stdout = io::stdout();
    let mut stdout = stdout.lock();

    match args.subcommand {
        SubCommand::Version { subcommand } => match subcommand {
            Version::List => {
                let versions = client.fetch_versions().await?;
                format::write_versions(&mut stdout, presenter, &versions)?;
            }
        },
        SubCommand::Cve { subcommand } => match subcommand {
            Cve::List { version } => {
                let summaries = client.fetch_summaries(&version).await?;
                format::write_summaries(&mut stdout, presenter, &summaries)?;
            }
            Cve::Show { cve_id } => {
                let cve_id = api::parse_cve_id(&cve_id)?;
                let detail = client.fetch_detail(&cve_id).await?;
                format::write_detail(&mut stdout, presenter, &detail)?;
            }
        },
        SubCommand::Browse => browse::run(&client).await?,
        SubCommand::Completions(completions) => {
            let mut cmd = Args::command();
            clap_complete::generate(completions.shell, &mut cmd, "glvdctl", &mut stdout);
        }
    }

    stdout.flush()?;
    Ok(())
}
