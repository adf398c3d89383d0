use crate::dataset::Dataset;
use crate::error::{Result, ShopError};
use crate::models::{Category, Gender, Transaction};

/// Label shown for the unconstrained choice in every control.
pub const ALL: &str = "All";

// ---------------------------------------------------------------------------
// Age brackets
// ---------------------------------------------------------------------------

/// Half-open age range `[lo, hi)`; the top bracket has no upper bound.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AgeBracket {
    Under20,
    From20To30,
    From30To40,
    From40To50,
    From50To60,
    From60To70,
    Over70,
}

impl AgeBracket {
    pub const ALL: [AgeBracket; 7] = [
        AgeBracket::Under20,
        AgeBracket::From20To30,
        AgeBracket::From30To40,
        AgeBracket::From40To50,
        AgeBracket::From50To60,
        AgeBracket::From60To70,
        AgeBracket::Over70,
    ];

    pub fn bounds(&self) -> (u32, Option<u32>) {
        match self {
            Self::Under20 => (0, Some(20)),
            Self::From20To30 => (20, Some(30)),
            Self::From30To40 => (30, Some(40)),
            Self::From40To50 => (40, Some(50)),
            Self::From50To60 => (50, Some(60)),
            Self::From60To70 => (60, Some(70)),
            Self::Over70 => (70, None),
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Self::Under20 => "Under 20",
            Self::From20To30 => "20-30",
            Self::From30To40 => "30-40",
            Self::From40To50 => "40-50",
            Self::From50To60 => "50-60",
            Self::From60To70 => "60-70",
            Self::Over70 => "Over 70",
        }
    }

    pub fn contains(&self, age: u32) -> bool {
        let (lo, hi) = self.bounds();
        age >= lo && hi.map_or(true, |hi| age < hi)
    }

    /// Accepts the display label or a dashed slug (`under-20`, `over-70`).
    pub fn parse(raw: &str) -> Option<Self> {
        let needle = raw.trim().to_lowercase().replace(' ', "-");
        Self::ALL
            .into_iter()
            .find(|b| b.label().to_lowercase().replace(' ', "-") == needle)
    }
}

// ---------------------------------------------------------------------------
// Filter
// ---------------------------------------------------------------------------

/// The analyst's current selection. `None` on a field means "All".
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Filter {
    pub location: Option<String>,
    pub gender: Option<Gender>,
    pub age: Option<AgeBracket>,
    pub category: Option<Category>,
}

impl Filter {
    pub fn matches(&self, t: &Transaction) -> bool {
        self.location
            .as_ref()
            .map_or(true, |l| t.location.eq_ignore_ascii_case(l))
            && self.gender.map_or(true, |g| t.gender == g)
            && self.age.map_or(true, |b| b.contains(t.age))
            && self.category.map_or(true, |c| t.category == c)
    }

    pub fn apply<'a>(&self, data: &'a Dataset) -> Vec<&'a Transaction> {
        data.rows().iter().filter(|t| self.matches(t)).collect()
    }

    pub fn is_unconstrained(&self) -> bool {
        *self == Filter::default()
    }

    /// Swap a typed location for the dataset's own spelling when one matches
    /// ignoring ASCII case. Returns false when the dataset has no such location.
    pub fn resolve_location(&mut self, data: &Dataset) -> bool {
        let Some(typed) = &self.location else {
            return true;
        };
        match data
            .distinct_locations()
            .into_iter()
            .find(|l| l.eq_ignore_ascii_case(typed))
        {
            Some(canonical) => {
                self.location = Some(canonical);
                true
            }
            None => false,
        }
    }

    /// Keep only the dimensions a view is bound to.
    pub fn restricted_to(&self, controls: &[Control]) -> Filter {
        let mut out = Filter::default();
        for c in controls {
            match c {
                Control::Location => out.location = self.location.clone(),
                Control::Gender => out.gender = self.gender,
                Control::AgeBracket => out.age = self.age,
                Control::Category => out.category = self.category,
            }
        }
        out
    }

    /// Title suffix listing the active selections, e.g. `" - Female - 20-30"`.
    pub fn suffix(&self) -> String {
        let mut parts: Vec<&str> = Vec::new();
        if let Some(c) = &self.category {
            parts.push(c.label());
        }
        if let Some(l) = &self.location {
            parts.push(l);
        }
        if let Some(g) = &self.gender {
            parts.push(g.label());
        }
        if let Some(a) = &self.age {
            parts.push(a.label());
        }
        parts.iter().map(|p| format!(" - {p}")).collect()
    }
}

// ---------------------------------------------------------------------------
// Controls (single-select dropdowns)
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Control {
    Location,
    Gender,
    AgeBracket,
    Category,
}

impl Control {
    pub const ALL: [Control; 4] = [
        Control::Location,
        Control::Gender,
        Control::AgeBracket,
        Control::Category,
    ];

    pub fn key(&self) -> &'static str {
        match self {
            Self::Location => "location",
            Self::Gender => "gender",
            Self::AgeBracket => "age",
            Self::Category => "category",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Self::Location => "State",
            Self::Gender => "Gender",
            Self::AgeBracket => "Age range",
            Self::Category => "Category",
        }
    }

    pub fn from_key(key: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|c| c.key() == key.trim().to_lowercase())
    }

    /// `"All"` followed by the choices offered for this control.
    pub fn options(&self, data: &Dataset) -> Vec<String> {
        let mut out = vec![ALL.to_string()];
        match self {
            Self::Location => out.extend(data.distinct_locations()),
            Self::Gender => out.extend(data.distinct_genders().iter().map(|g| g.label().to_string())),
            Self::AgeBracket => out.extend(AgeBracket::ALL.iter().map(|b| b.label().to_string())),
            Self::Category => {
                out.extend(data.distinct_categories().iter().map(|c| c.label().to_string()))
            }
        }
        out
    }

    /// Current selection of this control in `filter`, as an option string.
    pub fn current(&self, filter: &Filter) -> String {
        let v = match self {
            Self::Location => filter.location.clone(),
            Self::Gender => filter.gender.map(|g| g.label().to_string()),
            Self::AgeBracket => filter.age.map(|a| a.label().to_string()),
            Self::Category => filter.category.map(|c| c.label().to_string()),
        };
        v.unwrap_or_else(|| ALL.to_string())
    }

    /// Set this control on `filter` from a selection string.
    pub fn select(&self, filter: &mut Filter, raw: &str) -> Result<()> {
        let raw = raw.trim();
        if raw.eq_ignore_ascii_case(ALL) {
            match self {
                Self::Location => filter.location = None,
                Self::Gender => filter.gender = None,
                Self::AgeBracket => filter.age = None,
                Self::Category => filter.category = None,
            }
            return Ok(());
        }
        let invalid = || ShopError::InvalidSelection {
            control: self.key().to_string(),
            value: raw.to_string(),
        };
        match self {
            // Any state name is accepted; one with no rows just yields empty charts.
            Self::Location => filter.location = Some(raw.to_string()),
            Self::Gender => {
                let g = Gender::ALL
                    .into_iter()
                    .find(|g| g.label().eq_ignore_ascii_case(raw))
                    .ok_or_else(invalid)?;
                filter.gender = Some(g);
            }
            Self::AgeBracket => filter.age = Some(AgeBracket::parse(raw).ok_or_else(invalid)?),
            Self::Category => {
                let c = Category::ALL
                    .into_iter()
                    .find(|c| c.label().eq_ignore_ascii_case(raw))
                    .ok_or_else(invalid)?;
                filter.category = Some(c);
            }
        }
        Ok(())
    }

    /// Step the selection forward or backward through `options`, wrapping.
    pub fn cycle(&self, filter: &mut Filter, data: &Dataset, forward: bool) -> Result<()> {
        let options = self.options(data);
        let current = self.current(filter);
        let idx = options.iter().position(|o| *o == current).unwrap_or(0);
        let next = if forward {
            (idx + 1) % options.len()
        } else {
            (idx + options.len() - 1) % options.len()
        };
        self.select(filter, &options[next])
    }
}
