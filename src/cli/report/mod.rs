pub mod text;

use std::path::PathBuf;

use colored::Colorize;

use crate::chart::ChartData;
use crate::cli::{OutputArgs, OutputFormat, Session};
use crate::error::Result;
use crate::filter::{Control, Filter, ALL};
use crate::views::{self, Section, View, VIEWS};

/// `shoptrends show <view>`
pub fn show(session: &Session, slug: &str, filter: &Filter, args: &OutputArgs) -> Result<()> {
    let view = views::find(slug)?;
    let mut filter = filter.clone();
    if !filter.is_unconstrained() {
        note_ignored(view, &filter);
        if !filter.resolve_location(&session.data) {
            if let Some(loc) = &filter.location {
                if !session.states.is_known(loc) {
                    log::warn!("{loc:?} is not a US state name");
                }
            }
        }
    }

    let chart = view.render(&session.context(), &filter);
    let content = match args.format {
        OutputFormat::Text => text::format_chart(&chart),
        OutputFormat::Json => serde_json::to_string_pretty(&chart)?,
    };
    emit(&content, args.output.as_deref(), slug, args.format)
}

/// `shoptrends report`: every view, in reading order, unfiltered.
pub fn report(session: &Session, args: &OutputArgs) -> Result<()> {
    let charts = render_all(session);
    let content = match args.format {
        OutputFormat::Json => serde_json::to_string_pretty(&charts)?,
        OutputFormat::Text => format_report(&charts),
    };
    emit(&content, args.output.as_deref(), "report", args.format)
}

fn note_ignored(view: &View, filter: &Filter) {
    let ignored: Vec<&str> = Control::ALL
        .iter()
        .filter(|c| !view.controls.contains(c))
        .filter(|c| c.current(filter) != ALL)
        .map(|c| c.key())
        .collect();
    if !ignored.is_empty() {
        eprintln!(
            "{}",
            format!("Note: {} does not filter on {}", view.slug, ignored.join(", ")).yellow()
        );
    }
}

pub(crate) fn render_all(session: &Session) -> Vec<ChartData> {
    let ctx = session.context();
    VIEWS
        .iter()
        .map(|v| v.render(&ctx, &Filter::default()))
        .collect()
}

fn format_report(charts: &[ChartData]) -> String {
    let mut out = String::new();
    let mut section: Option<Section> = None;
    for (view, chart) in VIEWS.iter().zip(charts) {
        if section != Some(view.section) {
            section = Some(view.section);
            out.push_str(&format!("\n{}\n\n", view.section.title().yellow().bold()));
        }
        out.push_str(&text::format_chart(chart));
        out.push_str("\n\n");
    }
    out.trim_end().to_string()
}

/// Print to stdout, or write to `output` when given. An empty `output`
/// string picks a dated default name in the working directory.
fn emit(content: &str, output: Option<&str>, name: &str, format: OutputFormat) -> Result<()> {
    let Some(path) = output else {
        println!("{content}");
        return Ok(());
    };
    let path = if path.is_empty() {
        PathBuf::from(default_output_name(name, format))
    } else {
        PathBuf::from(path)
    };
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            std::fs::create_dir_all(parent)?;
        }
    }
    std::fs::write(&path, format!("{content}\n"))?;
    println!("Wrote {}", path.display());
    Ok(())
}

fn default_output_name(name: &str, format: OutputFormat) -> String {
    let date = chrono::Local::now().format("%Y-%m-%d").to_string();
    let ext = match format {
        OutputFormat::Text => "txt",
        OutputFormat::Json => "json",
    };
    format!("{name}-{date}.{ext}")
}
