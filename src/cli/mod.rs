pub mod completions;
pub mod config;
pub mod dashboard;
pub mod options;
pub mod report;

use clap::{Args, Parser, Subcommand, ValueEnum};

use crate::dataset::Dataset;
use crate::error::Result;
use crate::filter::{Control, Filter};
use crate::settings::{load_settings, shellexpand_path, Settings};
use crate::states::StateTable;
use crate::views::Context;

#[derive(Parser)]
#[command(name = "shoptrends", about = "Explore US shopping-trend data from the terminal.")]
pub struct Cli {
    /// Path to the shopping-trends CSV (default: from settings)
    #[arg(long, global = true)]
    pub data: Option<String>,

    /// How many groups top-N views keep (default: from settings)
    #[arg(long, global = true)]
    pub top: Option<usize>,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Open the interactive dashboard.
    Dashboard,
    /// List every view with its chart type and filters.
    Views,
    /// Render a single view.
    Show {
        /// View id (see `shoptrends views`)
        view: String,
        #[command(flatten)]
        filters: FilterArgs,
        #[command(flatten)]
        output: OutputArgs,
    },
    /// Render every view in reading order with no filters applied.
    Report {
        #[command(flatten)]
        output: OutputArgs,
    },
    /// List the choices offered by a filter control.
    Options {
        /// One of: location, gender, age, category
        control: String,
    },
    /// Show saved settings; `--data`, `--top` and `--bins` are persisted.
    Config {
        /// Number of bins in the age histogram
        #[arg(long)]
        bins: Option<usize>,
    },
    /// Print a shell completion script.
    Completions {
        shell: clap_complete::Shell,
    },
}

/// Dropdown selections. Omitted or "All" means unconstrained.
#[derive(Args, Debug, Default, Clone)]
pub struct FilterArgs {
    /// State name, e.g. "New York"
    #[arg(long)]
    pub location: Option<String>,
    /// Male or Female
    #[arg(long)]
    pub gender: Option<String>,
    /// Age range: under-20, 20-30, 30-40, 40-50, 50-60, 60-70, over-70
    #[arg(long)]
    pub age: Option<String>,
    /// Clothing, Footwear, Outerwear or Accessories
    #[arg(long)]
    pub category: Option<String>,
}

impl FilterArgs {
    pub fn to_filter(&self) -> Result<Filter> {
        let mut filter = Filter::default();
        let pairs = [
            (Control::Location, &self.location),
            (Control::Gender, &self.gender),
            (Control::AgeBracket, &self.age),
            (Control::Category, &self.category),
        ];
        for (control, value) in pairs {
            if let Some(v) = value {
                control.select(&mut filter, v)?;
            }
        }
        Ok(filter)
    }
}

#[derive(ValueEnum, Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum OutputFormat {
    #[default]
    Text,
    Json,
}

#[derive(Args, Debug, Default, Clone)]
pub struct OutputArgs {
    /// Output format
    #[arg(long, value_enum, default_value_t = OutputFormat::Text)]
    pub format: OutputFormat,
    /// Write to this file instead of stdout
    #[arg(long)]
    pub output: Option<String>,
}

/// Everything a command needs to render views: the dataset, the state
/// table and the effective settings. Built once per invocation.
pub struct Session {
    pub data: Dataset,
    pub states: StateTable,
    pub settings: Settings,
}

impl Session {
    pub fn open(data: Option<&str>, top: Option<usize>) -> Result<Self> {
        let mut settings = load_settings();
        if let Some(n) = top {
            settings.top_n = n;
        }
        settings.validate()?;
        let path = shellexpand_path(data.unwrap_or(settings.dataset_path.as_str()));
        let data = Dataset::load(&path)?;
        if data.is_empty() {
            log::warn!("{} has a header but no rows", path.display());
        }
        Ok(Self {
            data,
            states: StateTable::us(),
            settings,
        })
    }

    pub fn context(&self) -> Context<'_> {
        Context {
            data: &self.data,
            states: &self.states,
            top_n: self.settings.top_n,
            histogram_bins: self.settings.histogram_bins,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{Category, Gender};

    #[test]
    fn test_filter_args_to_filter() {
        let args = FilterArgs {
            location: Some("Maine".into()),
            gender: Some("all".into()),
            age: Some("over-70".into()),
            category: Some("footwear".into()),
        };
        let f = args.to_filter().unwrap();
        assert_eq!(f.location.as_deref(), Some("Maine"));
        assert_eq!(f.gender, None);
        assert_eq!(f.age, Some(crate::filter::AgeBracket::Over70));
        assert_eq!(f.category, Some(Category::Footwear));
    }

    #[test]
    fn test_filter_args_reject_bad_gender() {
        let args = FilterArgs { gender: Some("robot".into()), ..Default::default() };
        assert!(args.to_filter().is_err());
        let ok = FilterArgs { gender: Some("Male".into()), ..Default::default() };
        assert_eq!(ok.to_filter().unwrap().gender, Some(Gender::Male));
    }

    #[test]
    fn test_open_rejects_zero_top() {
        let dir = tempfile::tempdir().unwrap();
        let csv = dir.path().join("data.csv");
        std::fs::write(&csv, crate::dataset::fixtures::SAMPLE_CSV).unwrap();
        let err = Session::open(csv.to_str(), Some(0)).err().unwrap();
        assert!(err.to_string().contains("top_n must be at least 1"), "got: {err}");
        let ok = Session::open(csv.to_str(), Some(3)).unwrap();
        assert_eq!(ok.settings.top_n, 3);
    }

    #[test]
    fn test_cli_parses_show() {
        let cli = Cli::try_parse_from([
            "shoptrends", "--data", "x.csv", "show", "top-products", "--category", "Clothing",
            "--format", "json",
        ])
        .unwrap();
        assert_eq!(cli.data.as_deref(), Some("x.csv"));
        match cli.command {
            Some(Commands::Show { view, filters, output }) => {
                assert_eq!(view, "top-products");
                assert_eq!(filters.category.as_deref(), Some("Clothing"));
                assert_eq!(output.format, OutputFormat::Json);
            }
            _ => panic!("expected show"),
        }
    }
}
