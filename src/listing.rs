// Display-ready fields derived from a catalog listing: gallery images,
// amenity labels, detail lines, price string and the contact link.

use serde::Serialize;

use crate::models::{is_set, Amenity, Listing, Scalar};

pub const PLACEHOLDER_IMAGE: &str = "assets/img/listing-placeholder.svg";
pub const DEFAULT_WHATSAPP_NUMBER: &str = "96178971332";
const LBP_LABEL: &str = "ل.ل";
const META_SEPARATOR: &str = " • ";

/// Amenity flags and their labels, in the order they appear on a card.
pub const AMENITY_LABELS: [(Amenity, &str); 14] = [
    (Amenity::WaterState, "مياه دولة"),
    (Amenity::WaterWell, "بئر ارتوازي"),
    (Amenity::ElectricityState, "كهرباء دولة"),
    (Amenity::Generator, "مولد"),
    (Amenity::Solar, "طاقة شمسية"),
    (Amenity::Elevator, "مصعد"),
    (Amenity::Parking, "موقف سيارة"),
    (Amenity::Storage, "مستودع"),
    (Amenity::SeaView, "إطلالة بحر"),
    (Amenity::MountainView, "إطلالة جبل"),
    (Amenity::Security, "حراسة"),
    (Amenity::Cameras, "كاميرات"),
    (Amenity::Ac, "تكييف"),
    (Amenity::Heating, "تدفئة"),
];

/// Gallery order. Never empty.
pub fn images(listing: &Listing) -> Vec<String> {
    match (&listing.images, &listing.image) {
        (Some(images), _) if !images.is_empty() => images.clone(),
        (_, Some(image)) if !image.is_empty() => vec![image.clone()],
        _ => vec![PLACEHOLDER_IMAGE.to_string()],
    }
}

pub fn amenity_labels(listing: &Listing) -> Vec<&'static str> {
    // A named water source replaces the generic water flags
    let has_water_source = is_set(&listing.water_source);
    AMENITY_LABELS
        .iter()
        .filter(|(amenity, _)| !(has_water_source && amenity.is_water()))
        .filter(|(amenity, _)| listing.has_amenity(*amenity))
        .map(|(_, label)| *label)
        .collect()
}

/// Amenity labels first, then the listing's own free-form features.
pub fn features(listing: &Listing) -> Vec<String> {
    let mut out: Vec<String> = amenity_labels(listing)
        .into_iter()
        .map(str::to_string)
        .collect();
    if let Some(custom) = &listing.features {
        out.extend(custom.iter().cloned());
    }
    out
}

// Which values earn a detail line
#[derive(Clone, Copy)]
enum Presence {
    /// Skipped when falsy (0, "" or false)
    Truthy,
    /// Skipped only when empty; 0 is kept
    Filled,
}

impl Presence {
    fn admits(self, value: &Scalar) -> bool {
        match self {
            Presence::Truthy => value.is_truthy(),
            Presence::Filled => !value.is_blank(),
        }
    }
}

pub fn details(listing: &Listing) -> Vec<String> {
    let size = listing
        .size
        .as_ref()
        .filter(|v| Presence::Truthy.admits(v))
        .map(|v| format!("المساحة: {} م²", v));

    let labelled = [
        (&listing.legal_status, "الوضع القانوني", Presence::Truthy),
        (&listing.floor, "الطابق", Presence::Filled),
        (&listing.bedrooms, "الغرف", Presence::Filled),
        (&listing.bathrooms, "الحمامات", Presence::Filled),
        (&listing.water_source, "المياه", Presence::Truthy),
        (&listing.view_type, "الإطلالة", Presence::Truthy),
        (&listing.building_condition, "حالة البناء", Presence::Truthy),
        (&listing.balconies, "الشرفات", Presence::Filled),
    ];

    size.into_iter()
        .chain(labelled.into_iter().filter_map(|(value, label, presence)| {
            let value = value.as_ref()?;
            presence
                .admits(value)
                .then(|| format!("{}: {}", label, value))
        }))
        .collect()
}

/// Property type line followed by [`features`].
pub fn extras(listing: &Listing) -> Vec<String> {
    let mut extras = Vec::new();
    if let Some(kind) = listing.kind.as_deref().filter(|k| !k.is_empty()) {
        extras.push(format!("النوع: {}", kind));
    }
    extras.extend(features(listing));
    extras
}

/// Groups digits the en-US way: `1200000.5` -> `1,200,000.5`.
/// At most three fraction digits, trailing zeros dropped.
pub fn group_digits(value: f64) -> String {
    if !value.is_finite() {
        return value.to_string();
    }
    // Scaling can overflow near f64::MAX; such values have no fraction anyway
    let scaled = value * 1000.0;
    let rounded = if scaled.is_finite() { scaled.round() / 1000.0 } else { value };
    let fixed = format!("{:.3}", rounded.abs());
    let (integer, fraction) = fixed.split_once('.').unwrap_or((fixed.as_str(), ""));
    let fraction = fraction.trim_end_matches('0');

    let mut grouped = String::with_capacity(integer.len() + integer.len() / 3 + 1);
    if rounded < 0.0 {
        grouped.push('-');
    }
    for (i, digit) in integer.chars().enumerate() {
        if i > 0 && (integer.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(digit);
    }
    if !fraction.is_empty() {
        grouped.push('.');
        grouped.push_str(fraction);
    }
    grouped
}

pub fn format_price(value: f64, currency: Option<&str>) -> String {
    match currency {
        Some("LBP") => format!("{} {}", group_digits(value), LBP_LABEL),
        _ => format!("{}$", group_digits(value)),
    }
}

pub fn contact_message(listing: &Listing) -> String {
    format!("يوجد فيديو: {}", listing.title())
}

/// WhatsApp deep link asking about the listing.
pub fn contact_link(whatsapp_number: &str, listing: &Listing) -> String {
    let query = url::form_urlencoded::Serializer::new(String::new())
        .append_pair("text", &contact_message(listing))
        .finish();
    format!("https://wa.me/{}?{}", whatsapp_number, query)
}

/// Staggered reveal delay: `base_ms + position * step_ms`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RevealTiming {
    pub base_ms: u64,
    pub step_ms: u64,
}

pub const LISTINGS_REVEAL: RevealTiming = RevealTiming { base_ms: 80, step_ms: 80 };
pub const HOME_REVEAL: RevealTiming = RevealTiming { base_ms: 120, step_ms: 120 };

impl RevealTiming {
    pub fn delay_ms(self, slot: usize) -> u64 {
        self.base_ms + self.step_ms * slot as u64
    }
}

// Everything a card template (or the JSON API) needs, computed once
#[derive(Debug, Clone, Serialize)]
pub struct ListingCard {
    /// Position of the listing in the loaded catalog.
    pub position: usize,
    pub title: String,
    pub area: String,
    pub status: String,
    pub badge: &'static str,
    pub images: Vec<String>,
    pub price: String,
    pub details: Vec<String>,
    pub extras: Vec<String>,
    pub contact_link: String,
    pub reveal_delay_ms: u64,
}

impl ListingCard {
    pub fn build(
        position: usize,
        listing: &Listing,
        whatsapp_number: &str,
        reveal_delay_ms: u64,
    ) -> Self {
        ListingCard {
            position,
            title: listing.title().to_string(),
            area: listing.area().to_string(),
            status: listing.status().to_string(),
            badge: if listing.is_for_sale() { "sale" } else { "rent" },
            images: images(listing),
            price: format_price(listing.price, listing.currency.as_deref()),
            details: details(listing),
            extras: extras(listing),
            contact_link: contact_link(whatsapp_number, listing),
            reveal_delay_ms,
        }
    }

    pub fn cover_image(&self) -> &str {
        self.images.first().map(String::as_str).unwrap_or(PLACEHOLDER_IMAGE)
    }

    pub fn image_count(&self) -> usize {
        self.images.len()
    }

    pub fn has_gallery(&self) -> bool {
        self.images.len() > 1
    }

    pub fn details_line(&self) -> String {
        self.details.join(META_SEPARATOR)
    }

    pub fn extras_line(&self) -> String {
        self.extras.join(META_SEPARATOR)
    }
}

/// Cards for `(position, listing)` pairs, staggered by their slot on the page.
pub fn build_cards<'a, I>(listings: I, whatsapp_number: &str, timing: RevealTiming) -> Vec<ListingCard>
where
    I: IntoIterator<Item = (usize, &'a Listing)>,
{
    listings
        .into_iter()
        .enumerate()
        .map(|(slot, (position, listing))| {
            ListingCard::build(position, listing, whatsapp_number, timing.delay_ms(slot))
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn listing(value: serde_json::Value) -> Listing {
        serde_json::from_value(value).expect("test listing should deserialize")
    }

    #[test]
    fn images_prefer_the_gallery_verbatim() {
        let l = listing(json!({
            "price": 1,
            "images": ["b.jpg", "a.jpg", "c.jpg"],
            "image": "single.jpg"
        }));
        assert_eq!(images(&l), vec!["b.jpg", "a.jpg", "c.jpg"]);
    }

    #[test]
    fn images_fall_back_to_single_then_placeholder() {
        let single = listing(json!({ "price": 1, "images": [], "image": "one.jpg" }));
        assert_eq!(images(&single), vec!["one.jpg"]);

        let bare = listing(json!({ "price": 1 }));
        assert_eq!(images(&bare), vec![PLACEHOLDER_IMAGE]);

        let empty_image = listing(json!({ "price": 1, "image": "" }));
        assert_eq!(images(&empty_image), vec![PLACEHOLDER_IMAGE]);
    }

    #[test]
    fn amenity_labels_keep_table_order() {
        let l = listing(json!({
            "price": 1,
            "heating": true,
            "parking": true,
            "water_state": true
        }));
        assert_eq!(amenity_labels(&l), vec!["مياه دولة", "موقف سيارة", "تدفئة"]);
    }

    #[test]
    fn water_source_suppresses_generic_water_flags() {
        let l = listing(json!({
            "price": 1,
            "water_source": "نبع",
            "water_state": true,
            "water_well": true,
            "solar": true
        }));
        let labels = amenity_labels(&l);
        assert_eq!(labels, vec!["طاقة شمسية"]);

        let empty_source = listing(json!({
            "price": 1,
            "water_source": "",
            "water_well": true
        }));
        assert_eq!(amenity_labels(&empty_source), vec!["بئر ارتوازي"]);
    }

    #[test]
    fn features_put_amenities_before_custom_entries() {
        let l = listing(json!({
            "price": 1,
            "features": ["حديقة", "مدفأة حطب"],
            "elevator": true
        }));
        assert_eq!(features(&l), vec!["مصعد", "حديقة", "مدفأة حطب"]);
    }

    #[test]
    fn details_follow_fixed_order_and_keep_zero() {
        let l = listing(json!({
            "price": 1,
            "balconies": 2,
            "size": 150,
            "floor": 0,
            "bedrooms": "",
            "bathrooms": null,
            "water_source": "بئر",
            "legal_status": "طابو أخضر",
            "view_type": "",
            "building_condition": "جديد"
        }));
        assert_eq!(
            details(&l),
            vec![
                "المساحة: 150 م²",
                "الوضع القانوني: طابو أخضر",
                "الطابق: 0",
                "المياه: بئر",
                "حالة البناء: جديد",
                "الشرفات: 2",
            ]
        );
    }

    #[test]
    fn zero_size_is_skipped_but_zero_floor_is_not() {
        let l = listing(json!({ "price": 1, "size": 0, "floor": 0, "balconies": 0 }));
        assert_eq!(details(&l), vec!["الطابق: 0", "الشرفات: 0"]);
    }

    #[test]
    fn extras_lead_with_the_type() {
        let l = listing(json!({
            "price": 1,
            "type": "شقة",
            "sea_view": true,
            "features": ["قريب من البحر"]
        }));
        assert_eq!(extras(&l), vec!["النوع: شقة", "إطلالة بحر", "قريب من البحر"]);

        let untyped = listing(json!({ "price": 1 }));
        assert!(extras(&untyped).is_empty());
    }

    #[test]
    fn prices_are_grouped_per_currency() {
        assert_eq!(format_price(1_200_000.0, Some("LBP")), "1,200,000 ل.ل");
        assert_eq!(format_price(1200.0, Some("USD")), "1,200$");
        assert_eq!(format_price(950.0, None), "950$");
        assert_eq!(format_price(0.0, Some("EUR")), "0$");
    }

    #[test]
    fn grouping_handles_fractions_and_signs() {
        assert_eq!(group_digits(1234.5), "1,234.5");
        assert_eq!(group_digits(1234.5678), "1,234.568");
        assert_eq!(group_digits(100.0), "100");
        assert_eq!(group_digits(1000.0), "1,000");
        assert_eq!(group_digits(-25000.0), "-25,000");
    }

    #[test]
    fn huge_prices_still_format_as_digits() {
        let grouped = group_digits(f64::MAX);
        assert!(grouped.starts_with("179,769,313"));
        assert!(grouped.chars().all(|c| c.is_ascii_digit() || c == ','));

        let price = format_price(1.0e306, Some("USD"));
        let digits = price.strip_suffix('$').unwrap();
        assert!(digits.len() > 300);
        assert!(digits.chars().all(|c| c.is_ascii_digit() || c == ','));
    }

    #[test]
    fn contact_link_encodes_the_title() {
        let l = listing(json!({ "price": 1, "title": "شقة & حديقة" }));
        let link = contact_link(DEFAULT_WHATSAPP_NUMBER, &l);
        assert!(link.starts_with("https://wa.me/96178971332?text="));

        let parsed = url::Url::parse(&link).unwrap();
        let (key, value) = parsed.query_pairs().next().unwrap();
        assert_eq!(key, "text");
        assert_eq!(value, "يوجد فيديو: شقة & حديقة");
    }

    #[test]
    fn card_collects_derived_fields() {
        let l = listing(json!({
            "title": "شقة في جونية",
            "status": "للبيع",
            "area": "جونية",
            "price": 250000,
            "images": ["1.jpg", "2.jpg"],
            "size": 180
        }));
        let card = ListingCard::build(4, &l, "123", 240);
        assert_eq!(card.position, 4);
        assert_eq!(card.badge, "sale");
        assert_eq!(card.price, "250,000$");
        assert_eq!(card.cover_image(), "1.jpg");
        assert!(card.has_gallery());
        assert_eq!(card.details_line(), "المساحة: 180 م²");
        assert!(card.contact_link.starts_with("https://wa.me/123?"));

        let rent = listing(json!({ "status": "للإيجار", "price": 500 }));
        assert_eq!(ListingCard::build(0, &rent, "123", 0).badge, "rent");
    }

    #[test]
    fn cards_are_staggered_by_slot_not_position() {
        let a = listing(json!({ "price": 1 }));
        let b = listing(json!({ "price": 2 }));
        let cards = build_cards([(3, &a), (7, &b)], "1", LISTINGS_REVEAL);
        assert_eq!(cards[0].reveal_delay_ms, 80);
        assert_eq!(cards[1].reveal_delay_ms, 160);
        assert_eq!(cards[1].position, 7);
        assert_eq!(HOME_REVEAL.delay_ms(2), 360);
    }
}
