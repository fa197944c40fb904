//! `tocnav` command-line entry point

use anyhow::{bail, Context};
use clap::{value_parser, Arg, ArgMatches, Command};
use std::io::Write;
use std::num::NonZeroUsize;
use std::path::PathBuf;
use std::sync::Arc;
use tocnav_cli::{navigate, repl, resolve_config, LocalDirectoryFetcher};
use tocnav_core::{DirPath, TocController};
use tracing_subscriber::EnvFilter;

fn dir_arg() -> Arg {
    Arg::new("dir")
        .required(true)
        .value_parser(value_parser!(PathBuf))
        .help("Directory to browse")
}

fn tuning_args(cmd: Command) -> Command {
    cmd.arg(
        Arg::new("config")
            .long("config")
            .value_parser(value_parser!(PathBuf))
            .help("TOML configuration file"),
    )
    .arg(
        Arg::new("per-page")
            .long("per-page")
            .value_parser(value_parser!(NonZeroUsize))
            .help("Entries per page"),
    )
    .arg(
        Arg::new("cache-capacity")
            .long("cache-capacity")
            .value_parser(value_parser!(NonZeroUsize))
            .help("Number of cached directory listings"),
    )
}

fn cli() -> Command {
    Command::new("tocnav")
        .version(tocnav_core::VERSION)
        .about("Browse a directory tree page by page")
        .subcommand_required(true)
        .arg_required_else_help(true)
        .subcommand(tuning_args(
            Command::new("browse")
                .about("Interactive browser")
                .arg(dir_arg()),
        ))
        .subcommand(tuning_args(
            Command::new("list")
                .about("Print one page of a directory")
                .arg(dir_arg())
                .arg(
                    Arg::new("path")
                        .long("path")
                        .default_value("/")
                        .value_parser(value_parser!(DirPath))
                        .help("Directory below the root, e.g. runs/fio"),
                )
                .arg(
                    Arg::new("page")
                        .long("page")
                        .value_parser(value_parser!(NonZeroUsize))
                        .help("Page number (1-based)"),
                )
                .arg(
                    Arg::new("search")
                        .long("search")
                        .help("Only show entries containing this text"),
                )
                .arg(
                    Arg::new("json")
                        .long("json")
                        .action(clap::ArgAction::SetTrue)
                        .help("Output as JSON"),
                ),
        ))
}

fn controller(args: &ArgMatches) -> anyhow::Result<TocController> {
    let dir = args
        .get_one::<PathBuf>("dir")
        .context("missing directory argument")?;
    if !dir.is_dir() {
        bail!("{} is not a directory", dir.display());
    }
    let config = resolve_config(
        args.get_one::<PathBuf>("config").map(PathBuf::as_path),
        args.get_one::<NonZeroUsize>("per-page").copied(),
        args.get_one::<NonZeroUsize>("cache-capacity").copied(),
    )?;
    tracing::info!(dir = %dir.display(), ?config, "starting");
    Ok(TocController::new(
        config,
        Arc::new(LocalDirectoryFetcher::new(dir.clone())),
    ))
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .init();

    let matches = cli().get_matches();

    match matches.subcommand() {
        Some(("browse", args)) => {
            let toc = controller(args)?;
            let stdin = tokio::io::BufReader::new(tokio::io::stdin());
            let mut stdout = std::io::stdout();
            repl::run(&toc, stdin, &mut stdout).await?;
        }
        Some(("list", args)) => {
            let toc = controller(args)?;
            let path = args
                .get_one::<DirPath>("path")
                .cloned()
                .unwrap_or_else(DirPath::root);
            let page = args
                .get_one::<NonZeroUsize>("page")
                .map(|n| n.get() - 1);
            let search = args.get_one::<String>("search").cloned();

            let transition = navigate(&toc, &path, search, page).await;
            let mut stdout = std::io::stdout().lock();
            if args.get_flag("json") {
                serde_json::to_writer_pretty(&mut stdout, &transition.view)?;
                writeln!(stdout)?;
            } else {
                write!(stdout, "{}", repl::render_view(&transition.view))?;
            }
            if let Some(error) = transition.error {
                bail!(error);
            }
        }
        _ => unreachable!("subcommand required"),
    }
    Ok(())
}
