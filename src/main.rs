use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand, ValueEnum};
use iocraft::prelude::*;

use fw_board::app::App;
use fw_board::catalog::Catalog;
use fw_board::config::loader;
use fw_board::config::types::AppConfig;
use fw_board::engine::http::fetch_catalog;
use fw_board::engine::{Engine, Event, HttpEngine};
use fw_board::filter::FilterColumn;
use fw_board::listing;
use fw_board::sort::{SortDirection, SortKey, SortOrder, SortState};
use fw_board::theme::ResolvedTheme;

#[derive(Parser)]
#[command(name = "fw-board", version, about = "Firmware release catalog browser")]
struct Cli {
    /// Path to config file.
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Enable debug logging to debug.log.
    #[arg(long)]
    debug: bool,

    /// Catalog URL, overriding the config file.
    #[arg(long, global = true)]
    endpoint: Option<String>,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Fetch the catalog once and print the matching releases.
    List {
        /// Only files whose download link contains this text.
        #[arg(long = "type")]
        file_type: Option<String>,
        /// Case-insensitive substring of the firmware version.
        #[arg(long)]
        version: Option<String>,
        /// Prefix of the security version.
        #[arg(long)]
        sec_version: Option<String>,
        /// Case-insensitive substring of the signature.
        #[arg(long)]
        signature: Option<String>,
        #[arg(long, value_enum)]
        sort: Option<SortArg>,
        /// Ascending order (default is descending).
        #[arg(long, requires = "sort")]
        asc: bool,
    },
}

#[derive(Clone, Copy, ValueEnum)]
enum SortArg {
    Date,
    Sec,
}

struct ListArgs {
    filters: Vec<(FilterColumn, String)>,
    sort: SortState,
}

fn run_list(config: &AppConfig, args: ListArgs) -> Result<()> {
    let mut catalog = Catalog::new();
    let ticket = catalog
        .request(config.endpoint.to_request())
        .context("no catalog request issued")?;

    let rt = tokio::runtime::Runtime::new().context("starting tokio runtime")?;
    let outcome = rt.block_on(async {
        let client = reqwest::Client::builder()
            .timeout(config.endpoint.timeout())
            .build()
            .unwrap_or_else(|_| reqwest::Client::new());
        fetch_catalog(&client, &ticket.request).await
    });

    if let Some(err) = catalog.apply_event(Event::from_outcome(ticket.generation, outcome)) {
        anyhow::bail!("fetching {}: {err}", config.endpoint.url);
    }
    for (column, query) in &args.filters {
        catalog.set_filter(*column, query);
    }
    catalog.set_sort(args.sort);

    for line in listing::format_rows(&catalog, &config.defaults.date_format) {
        println!("{line}");
    }
    Ok(())
}

fn main() -> Result<()> {
    // Install a panic hook that writes to a file, since the fullscreen TUI
    // swallows stderr.
    std::panic::set_hook(Box::new(|info| {
        let backtrace = std::backtrace::Backtrace::force_capture();
        let msg = format!("{info}\n\n{backtrace}");
        let _ = std::fs::write("panic.log", &msg);
        eprintln!("{msg}");
    }));

    let cli = Cli::parse();

    // Set up tracing.
    if cli.debug {
        let file = std::fs::File::create("debug.log")?;
        tracing_subscriber::fmt()
            .with_writer(file)
            .with_ansi(false)
            .with_env_filter(
                tracing_subscriber::EnvFilter::try_from_env("RUST_LOG")
                    .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("debug")),
            )
            .init();
    }

    // Load config.
    let mut config = loader::load_config(cli.config.as_deref())?;
    if let Some(url) = cli.endpoint {
        config.endpoint.url = url;
    }

    if let Some(Commands::List {
        file_type,
        version,
        sec_version,
        signature,
        sort,
        asc,
    }) = cli.command
    {
        let filters = [
            (FilterColumn::Version, version),
            (FilterColumn::SecVersion, sec_version),
            (FilterColumn::Signature, signature),
            (FilterColumn::Type, file_type),
        ]
        .into_iter()
        .filter_map(|(column, query)| query.map(|q| (column, q)))
        .collect();
        let sort = sort.map_or_else(SortState::default, |s| {
            SortState::chosen(SortOrder {
                key: match s {
                    SortArg::Date => SortKey::FirmwareDate,
                    SortArg::Sec => SortKey::SecVersion,
                },
                direction: if asc {
                    SortDirection::Ascending
                } else {
                    SortDirection::Descending
                },
            })
        });
        return run_list(&config, ListArgs { filters, sort });
    }

    let theme = ResolvedTheme::resolve(&config.theme);

    // Start the fetch engine in a dedicated OS thread (owns its own Tokio
    // runtime). Dropping `engine_handle` at the end of `main` closes the
    // sender channel, signalling the engine to shut down.
    let engine_handle = HttpEngine::new(config.endpoint.timeout()).start();

    tracing::info!("fw-board starting against {}", config.endpoint.url);

    // Enter fullscreen TUI (iocraft uses smol internally).
    smol::block_on(
        element! {
            App(
                config: &config,
                engine: &engine_handle,
                theme: &theme,
            )
        }
        .fullscreen(),
    )?;

    Ok(())
}
