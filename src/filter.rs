// Filter form state, query-string seeding and the listing predicate

use crate::models::Listing;

pub const DEFAULT_MIN_PRICE: f64 = 0.0;
// No upper cap: LBP prices routinely run into the billions
pub const DEFAULT_MAX_PRICE: f64 = f64::INFINITY;

/// Raw values of the filter inputs, exactly as the form holds them.
///
/// The query string only ever seeds this struct; criteria are always read
/// back from the form, never from the URL directly.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FilterForm {
    pub status: String,
    pub kind: String,
    pub area: String,
    pub currency: String,
    pub min: String,
    pub max: String,
    pub query: String,
}

// First value for a parameter, the way URLSearchParams::get behaves
fn first<'a>(pairs: &'a [(String, String)], name: &str) -> Option<&'a str> {
    pairs
        .iter()
        .find(|(key, _)| key == name)
        .map(|(_, value)| value.as_str())
}

impl FilterForm {
    /// Seeds the form from query parameters.
    ///
    /// Discrete parameters are applied first. `budget=MIN-MAX` then fills a
    /// bound only when it supplies that side and no discrete `min`/`max` was given.
    pub fn from_query_pairs(pairs: &[(String, String)]) -> Self {
        let mut form = FilterForm::default();

        let fields: [(&str, &mut String); 7] = [
            ("status", &mut form.status),
            ("type", &mut form.kind),
            ("area", &mut form.area),
            ("currency", &mut form.currency),
            ("min", &mut form.min),
            ("max", &mut form.max),
            ("query", &mut form.query),
        ];
        for (name, slot) in fields {
            if let Some(value) = first(pairs, name) {
                *slot = value.to_string();
            }
        }

        if let Some(budget) = first(pairs, "budget") {
            // Only the first two segments count: "1-2-3" reads as 1 to 2
            let mut sides = budget.split('-');
            let min = sides.next().filter(|s| !s.is_empty());
            let max = sides.next().filter(|s| !s.is_empty());
            if let (Some(min), None) = (min, first(pairs, "min")) {
                form.min = min.to_string();
            }
            if let (Some(max), None) = (max, first(pairs, "max")) {
                form.max = max.to_string();
            }
        }

        form
    }

    pub fn criteria(&self) -> FilterCriteria {
        FilterCriteria {
            status: non_empty(&self.status),
            kind: non_empty(&self.kind),
            area: non_empty(&self.area),
            currency: non_empty(&self.currency),
            min_price: parse_bound(&self.min).unwrap_or(DEFAULT_MIN_PRICE),
            max_price: parse_bound(&self.max).unwrap_or(DEFAULT_MAX_PRICE),
            query: non_empty(self.query.trim()).map(|q| q.to_lowercase()),
        }
    }
}

fn non_empty(value: &str) -> Option<String> {
    (!value.is_empty()).then(|| value.to_string())
}

// An empty or unreadable bound leaves that side of the range open
fn parse_bound(value: &str) -> Option<f64> {
    let value = value.trim();
    if value.is_empty() {
        return None;
    }
    value.parse::<f64>().ok().filter(|v| !v.is_nan())
}

/// Conjunctive filter; `None` means "any".
#[derive(Debug, Clone, PartialEq)]
pub struct FilterCriteria {
    pub status: Option<String>,
    pub kind: Option<String>,
    pub area: Option<String>,
    pub currency: Option<String>,
    pub min_price: f64,
    pub max_price: f64,
    /// Already lower-cased.
    pub query: Option<String>,
}

impl Default for FilterCriteria {
    fn default() -> Self {
        FilterCriteria {
            status: None,
            kind: None,
            area: None,
            currency: None,
            min_price: DEFAULT_MIN_PRICE,
            max_price: DEFAULT_MAX_PRICE,
            query: None,
        }
    }
}

fn exact(wanted: &Option<String>, actual: Option<&str>) -> bool {
    match wanted {
        Some(wanted) => actual == Some(wanted.as_str()),
        None => true,
    }
}

impl FilterCriteria {
    pub fn matches(&self, listing: &Listing) -> bool {
        if !exact(&self.status, listing.status.as_deref())
            || !exact(&self.kind, listing.kind.as_deref())
            || !exact(&self.area, listing.area.as_deref())
            || !exact(&self.currency, listing.currency.as_deref())
        {
            return false;
        }
        if listing.price < self.min_price || listing.price > self.max_price {
            return false;
        }
        match &self.query {
            Some(query) => {
                listing.title().to_lowercase().contains(query.as_str())
                    || listing.area().to_lowercase().contains(query.as_str())
            }
            None => true,
        }
    }
}

/// Matching listings with their catalog positions, in catalog order.
pub fn apply<'a>(catalog: &'a [Listing], criteria: &FilterCriteria) -> Vec<(usize, &'a Listing)> {
    catalog
        .iter()
        .enumerate()
        .filter(|(_, listing)| criteria.matches(listing))
        .collect()
}
