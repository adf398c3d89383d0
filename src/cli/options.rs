use colored::Colorize;
use comfy_table::Table;

use crate::cli::Session;
use crate::error::{Result, ShopError};
use crate::filter::Control;
use crate::views::VIEWS;

/// `shoptrends views`
pub fn list_views() {
    let mut table = Table::new();
    table.set_header(vec!["View", "Title", "Section", "Chart", "Filters"]);
    for v in VIEWS {
        let controls: Vec<&str> = v.controls.iter().map(|c| c.key()).collect();
        let controls = if controls.is_empty() {
            "-".to_string()
        } else {
            controls.join(", ")
        };
        table.add_row(vec![
            v.slug.to_string(),
            v.title.to_string(),
            v.section.title().to_string(),
            v.kind.label().to_string(),
            controls,
        ]);
    }
    println!("{table}");
}

pub fn parse_control(key: &str) -> Result<Control> {
    Control::from_key(key).ok_or_else(|| {
        let keys: Vec<&str> = Control::ALL.iter().map(|c| c.key()).collect();
        ShopError::Other(format!(
            "Unknown control: {key} (expected one of {})",
            keys.join(", ")
        ))
    })
}

/// `shoptrends options <control>`
pub fn show_options(session: &Session, control: Control) {
    println!("{}", control.label().bold());
    for option in control.options(&session.data) {
        println!("  {option}");
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_control() {
        assert_eq!(parse_control("age").unwrap(), Control::AgeBracket);
        assert_eq!(parse_control(" Category ").unwrap(), Control::Category);
        let err = parse_control("colour").unwrap_err();
        assert!(err.to_string().contains("location, gender, age, category"));
    }
}
