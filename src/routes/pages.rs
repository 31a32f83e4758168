use askama::Template;
use axum::{
    extract::{Query, State},
    response::Html,
};
use std::sync::Arc;

use crate::{
    catalog::Catalog,
    config::Settings,
    error::{AppError, AppResult},
    filter::{self, FilterForm},
    listing::{build_cards, ListingCard, HOME_REVEAL, LISTINGS_REVEAL},
};

const CURRENCIES: [(&str, &str); 2] = [("USD", "دولار"), ("LBP", "ليرة لبنانية")];

// One <option> of a filter dropdown
#[derive(Debug, Clone, PartialEq)]
pub struct SelectOption {
    pub value: String,
    pub label: String,
    pub selected: bool,
}

// A value seeded from the URL that the catalog doesn't offer is still kept,
// so the form shows what is actually being filtered on.
fn select_options<'a, I>(values: I, current: &str) -> Vec<SelectOption>
where
    I: IntoIterator<Item = (&'a str, &'a str)>,
{
    let mut options: Vec<SelectOption> = values
        .into_iter()
        .map(|(value, label)| SelectOption {
            value: value.to_string(),
            label: label.to_string(),
            selected: value == current,
        })
        .collect();
    if !current.is_empty() && !options.iter().any(|o| o.selected) {
        options.push(SelectOption {
            value: current.to_string(),
            label: current.to_string(),
            selected: true,
        });
    }
    options
}

fn plain_options(values: &[String], current: &str) -> Vec<SelectOption> {
    select_options(values.iter().map(|v| (v.as_str(), v.as_str())), current)
}

#[derive(Template)]
#[template(path = "home.html")]
struct HomeTemplate {
    cards: Vec<ListingCard>,
    catalog_unavailable: bool,
    gallery_controls: bool,
}

#[derive(Template)]
#[template(path = "listings.html")]
struct ListingsTemplate {
    form: FilterForm,
    statuses: Vec<SelectOption>,
    kinds: Vec<SelectOption>,
    areas: Vec<SelectOption>,
    currencies: Vec<SelectOption>,
    cards: Vec<ListingCard>,
    gallery_controls: bool,
}

fn render_page<T: Template>(template: &T, name: &str) -> AppResult<Html<String>> {
    match template.render() {
        Ok(html) => Ok(Html(html)),
        Err(e) => {
            tracing::error!("Failed to render {} template: {}", name, e);
            Err(AppError::from(e))
        }
    }
}

// Home page: featured preview, or a short notice when the catalog failed to load
pub async fn home_page(
    State(settings): State<Arc<Settings>>,
    State(catalog): State<Arc<Catalog>>,
) -> AppResult<Html<String>> {
    let cards = if catalog.is_available() {
        build_cards(catalog.featured_preview(), &settings.whatsapp_number, HOME_REVEAL)
    } else {
        Vec::new()
    };
    tracing::debug!(featured = cards.len(), "[HANDLER] / - rendering home page");

    let template = HomeTemplate {
        cards,
        catalog_unavailable: !catalog.is_available(),
        gallery_controls: false,
    };
    render_page(&template, "home")
}

// Listings page: the query string seeds the form, the form drives the filter
pub async fn listings_page(
    State(settings): State<Arc<Settings>>,
    State(catalog): State<Arc<Catalog>>,
    Query(params): Query<Vec<(String, String)>>,
) -> AppResult<Html<String>> {
    let form = FilterForm::from_query_pairs(&params);
    let criteria = form.criteria();
    let matches = filter::apply(catalog.listings(), &criteria);
    tracing::info!(
        "[HANDLER] /listings - {} of {} listings match {:?}",
        matches.len(),
        catalog.listings().len(),
        criteria
    );

    let cards = build_cards(matches, &settings.whatsapp_number, LISTINGS_REVEAL);
    let options = catalog.filter_options();
    let template = ListingsTemplate {
        statuses: plain_options(&options.statuses, &form.status),
        kinds: plain_options(&options.kinds, &form.kind),
        areas: plain_options(&options.areas, &form.area),
        currencies: select_options(CURRENCIES, &form.currency),
        form,
        cards,
        gallery_controls: true,
    };
    render_page(&template, "listings")
}
