//! ScanLite CLI - queue and review simulated web application security scans

use clap::{CommandFactory, Parser};

mod cli;
mod config;
mod error;
mod models;
mod output;
mod scanner;

use cli::args::GlobalOptions;
use cli::settings::SettingsUpdate;
use cli::{Cli, Commands, SettingsCommands, View};
use error::Result;

#[tokio::main]
async fn main() {
    if let Err(err) = run().await {
        eprintln!("Error: {}", err);
        std::process::exit(1);
    }
}

fn init_logging(debug: bool) {
    let mut builder =
        env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn"));
    if debug {
        builder.filter_level(log::LevelFilter::Debug);
    }
    builder.format_timestamp_millis().init();
}

async fn run() -> Result<()> {
    let cli = Cli::parse();
    init_logging(cli.debug);

    let opts = GlobalOptions::from_cli(&cli);

    match cli.command {
        Commands::Scan(args) => cli::scan::run(&opts, args).await,
        Commands::View { name } => View::from_fragment(&name).open(&opts).await,
        Commands::Dashboard => cli::dashboard::run(&opts),
        Commands::Queue => cli::queue::run(&opts),
        Commands::Reports { filters } => cli::reports::list(&opts, &filters),
        Commands::Report { scan_id } => cli::reports::show(&opts, &scan_id),
        Commands::Settings(cmd) => match cmd {
            SettingsCommands::Show => cli::settings::show(&opts),
            SettingsCommands::Set {
                concurrency,
                rate_limit,
                csp_enabled,
                csp_policy,
            } => cli::settings::set(
                &opts,
                SettingsUpdate {
                    concurrency,
                    rate_limit,
                    csp_enabled,
                    csp_policy,
                },
            ),
        },
        Commands::Completion { shell } => {
            clap_complete::generate(
                shell,
                &mut Cli::command(),
                "scanlite",
                &mut std::io::stdout(),
            );
            Ok(())
        }
        Commands::Version => {
            println!("scanlite version {}", env!("CARGO_PKG_VERSION"));
            Ok(())
        }
    }
}
