// JSON endpoints: the filtered listing set and gallery transitions

use axum::{
    extract::{Path, Query, State},
    response::Json,
};
use serde::{Deserialize, Serialize};
use std::sync::Arc;

use crate::{
    catalog::Catalog,
    config::Settings,
    error::{AppError, AppResult},
    filter::{self, FilterForm},
    gallery::{counter_label, GalleryContext, GalleryState, ScrollEffect},
    listing::{self, build_cards, ListingCard, LISTINGS_REVEAL},
};

// --- Response Wrappers ---

#[derive(Serialize)]
pub struct ListingsResponse {
    available: bool,
    count: usize,
    listings: Vec<ListingCard>,
}

#[derive(Serialize)]
pub struct InlineView {
    index: usize,
    image: String,
    counter: String,
}

#[derive(Serialize)]
pub struct ModalView {
    open: bool,
    index: usize,
    image: String,
    counter: String,
    prev_enabled: bool,
    next_enabled: bool,
}

#[derive(Serialize)]
pub struct GalleryResponse {
    total: usize,
    inline: InlineView,
    modal: ModalView,
    scroll: ScrollEffect,
}

// --- Request Structs ---

/// Gallery state as the page currently holds it, plus the action to apply.
#[derive(Deserialize, Debug)]
pub struct GalleryRequest {
    action: String,
    #[serde(default)]
    context: GalleryContext,
    #[serde(default)]
    inline_index: usize,
    #[serde(default)]
    modal_index: usize,
    #[serde(default)]
    modal_open: bool,
}

// --- API Handlers ---

pub async fn list_listings(
    State(settings): State<Arc<Settings>>,
    State(catalog): State<Arc<Catalog>>,
    Query(params): Query<Vec<(String, String)>>,
) -> AppResult<Json<ListingsResponse>> {
    let criteria = FilterForm::from_query_pairs(&params).criteria();
    let matches = filter::apply(catalog.listings(), &criteria);
    tracing::info!("API call: list_listings matched {} listings", matches.len());

    let listings = build_cards(matches, &settings.whatsapp_number, LISTINGS_REVEAL);
    Ok(Json(ListingsResponse {
        available: catalog.is_available(),
        count: listings.len(),
        listings,
    }))
}

pub async fn gallery_action(
    State(catalog): State<Arc<Catalog>>,
    Path(position): Path<usize>,
    Json(request): Json<GalleryRequest>,
) -> AppResult<Json<GalleryResponse>> {
    tracing::debug!("API call: gallery_action on listing {} with {:?}", position, request);

    let item = catalog
        .get(position)
        .ok_or_else(|| AppError::NotFound(format!("No listing at position {}", position)))?;

    let mut state = GalleryState::restore(
        listing::images(item),
        request.inline_index,
        request.modal_index,
        request.modal_open,
    )?;
    let scroll = state.dispatch_named(request.context, &request.action)?;

    let total = state.modal.total();
    Ok(Json(GalleryResponse {
        total,
        inline: InlineView {
            index: state.inline.index(),
            image: state.inline_image().to_string(),
            counter: counter_label(state.inline.index(), total),
        },
        modal: ModalView {
            open: state.modal.is_open(),
            index: state.modal.index(),
            image: state.modal.current_image().to_string(),
            counter: counter_label(state.modal.index(), total),
            prev_enabled: state.modal.prev_enabled(),
            next_enabled: state.modal.next_enabled(),
        },
        scroll,
    }))
}
