use colored::Colorize;

use crate::error::Result;
use crate::settings::{load_settings, save_settings, settings_path, Settings};

/// `shoptrends config`: print settings, or persist any values given.
pub fn run(dataset_path: Option<&str>, top_n: Option<usize>, bins: Option<usize>) -> Result<()> {
    let mut settings = load_settings();
    let changed = apply(&mut settings, dataset_path, top_n, bins);
    if changed {
        save_settings(&settings)?;
        println!("{}", format!("Saved {}", settings_path().display()).green());
    }
    println!("dataset_path    {}", settings.dataset_path);
    println!("top_n           {}", settings.top_n);
    println!("histogram_bins  {}", settings.histogram_bins);
    Ok(())
}

fn apply(
    settings: &mut Settings,
    dataset_path: Option<&str>,
    top_n: Option<usize>,
    bins: Option<usize>,
) -> bool {
    let mut changed = false;
    if let Some(p) = dataset_path {
        settings.dataset_path = p.to_string();
        changed = true;
    }
    if let Some(n) = top_n {
        settings.top_n = n;
        changed = true;
    }
    if let Some(b) = bins {
        settings.histogram_bins = b;
        changed = true;
    }
    changed
}
