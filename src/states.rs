use std::collections::HashMap;

const US_STATES: &[(&str, &str)] = &[
    ("Alabama", "AL"),
    ("Alaska", "AK"),
    ("Arizona", "AZ"),
    ("Arkansas", "AR"),
    ("California", "CA"),
    ("Colorado", "CO"),
    ("Connecticut", "CT"),
    ("Delaware", "DE"),
    ("Florida", "FL"),
    ("Georgia", "GA"),
    ("Hawaii", "HI"),
    ("Idaho", "ID"),
    ("Illinois", "IL"),
    ("Indiana", "IN"),
    ("Iowa", "IA"),
    ("Kansas", "KS"),
    ("Kentucky", "KY"),
    ("Louisiana", "LA"),
    ("Maine", "ME"),
    ("Maryland", "MD"),
    ("Massachusetts", "MA"),
    ("Michigan", "MI"),
    ("Minnesota", "MN"),
    ("Mississippi", "MS"),
    ("Missouri", "MO"),
    ("Montana", "MT"),
    ("Nebraska", "NE"),
    ("Nevada", "NV"),
    ("New Hampshire", "NH"),
    ("New Jersey", "NJ"),
    ("New Mexico", "NM"),
    ("New York", "NY"),
    ("North Carolina", "NC"),
    ("North Dakota", "ND"),
    ("Ohio", "OH"),
    ("Oklahoma", "OK"),
    ("Oregon", "OR"),
    ("Pennsylvania", "PA"),
    ("Rhode Island", "RI"),
    ("South Carolina", "SC"),
    ("South Dakota", "SD"),
    ("Tennessee", "TN"),
    ("Texas", "TX"),
    ("Utah", "UT"),
    ("Vermont", "VT"),
    ("Virginia", "VA"),
    ("Washington", "WA"),
    ("West Virginia", "WV"),
    ("Wisconsin", "WI"),
    ("Wyoming", "WY"),
];

/// Full state name to two-letter postal code, used to key map charts.
#[derive(Debug, Clone)]
pub struct StateTable {
    codes: HashMap<&'static str, &'static str>,
}

impl StateTable {
    pub fn us() -> Self {
        Self {
            codes: US_STATES.iter().copied().collect(),
        }
    }

    /// Look up the code for `name` after title-casing it. Names missing from
    /// the table come back unchanged so the row still renders in tables; map
    /// charts will simply leave it uncoloured.
    pub fn code(&self, name: &str) -> String {
        match self.codes.get(title_case(name).as_str()) {
            Some(code) => (*code).to_string(),
            None => {
                log::warn!("no state code for location {name:?}; leaving it unmapped");
                name.to_string()
            }
        }
    }

    pub fn is_known(&self, name: &str) -> bool {
        self.codes.contains_key(title_case(name).as_str())
    }
}

/// `"new york"` / `"NEW YORK"` -> `"New York"`.
fn title_case(s: &str) -> String {
    s.split(' ')
        .map(|word| {
            let mut chars = word.chars();
            match chars.next() {
                Some(first) => first.to_uppercase().chain(chars.flat_map(|c| c.to_lowercase())).collect(),
                None => String::new(),
            }
        })
        .collect::<Vec<String>>()
        .join(" ")
}
