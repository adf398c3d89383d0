mod chart;
mod cli;
mod dataset;
mod error;
mod filter;
mod fmt;
mod models;
mod pipeline;
mod settings;
mod states;
mod tui;
mod views;

use clap::Parser;
use env_logger::Env;

use cli::{Cli, Commands, Session};

fn main() {
    env_logger::Builder::from_env(Env::default().default_filter_or("warn")).init();

    let cli = Cli::parse();
    let data = cli.data.as_deref();
    let top = cli.top;

    let result = match cli.command.unwrap_or(Commands::Dashboard) {
        Commands::Dashboard => {
            Session::open(data, top).and_then(|session| cli::dashboard::run(&session))
        }
        Commands::Views => {
            cli::options::list_views();
            Ok(())
        }
        Commands::Show {
            view,
            filters,
            output,
        } => views::find(&view)
            .and_then(|_| filters.to_filter())
            .and_then(|filter| {
                let session = Session::open(data, top)?;
                cli::report::show(&session, &view, &filter, &output)
            }),
        Commands::Report { output } => {
            Session::open(data, top).and_then(|session| cli::report::report(&session, &output))
        }
        Commands::Options { control } => cli::options::parse_control(&control).and_then(|c| {
            let session = Session::open(data, top)?;
            cli::options::show_options(&session, c);
            Ok(())
        }),
        Commands::Config { bins } => cli::config::run(data, top, bins),
        Commands::Completions { shell } => {
            cli::completions::run(shell);
            Ok(())
        }
    };

    if let Err(e) = result {
        eprintln!("Error: {e}");
        std::process::exit(1);
    }
}
