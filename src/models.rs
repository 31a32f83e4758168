// Data structures for the listings catalog
// Field names follow the keys used in data/listings.json

use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;
use std::fmt;

/// Status value the catalog uses for properties that are for sale.
/// Every other status renders with the rent badge.
pub const STATUS_FOR_SALE: &str = "للبيع";

// A loosely typed scalar as found in hand-edited catalog files:
// "floor": 0, "floor": "ارضي" and "floor": true are all accepted.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Scalar {
    Bool(bool),
    Number(serde_json::Number),
    Text(String),
}

impl Scalar {
    /// Truthiness as the catalog authors expect it: false, 0 and "" are falsy.
    pub fn is_truthy(&self) -> bool {
        match self {
            Scalar::Bool(b) => *b,
            Scalar::Number(n) => n.as_f64().is_some_and(|v| v != 0.0),
            Scalar::Text(s) => !s.is_empty(),
        }
    }

    /// Only the empty string counts as blank; a zero is a real value (ground floor).
    pub fn is_blank(&self) -> bool {
        matches!(self, Scalar::Text(s) if s.is_empty())
    }
}

impl fmt::Display for Scalar {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Scalar::Bool(b) => write!(f, "{}", b),
            Scalar::Number(n) => match n.as_f64() {
                // 3.0 in the file should still read "3" on the card
                Some(v) if n.is_f64() && v.fract() == 0.0 && v.abs() < 1e15 => {
                    write!(f, "{}", v as i64)
                }
                _ => write!(f, "{}", n),
            },
            Scalar::Text(s) => f.write_str(s),
        }
    }
}

/// Present and truthy.
pub fn is_set(value: &Option<Scalar>) -> bool {
    value.as_ref().is_some_and(Scalar::is_truthy)
}

// Hand-edited records get the odd wrong shape in a single field. Those fields
// read as absent; only `price` can reject a record.

fn scalar_of(value: Value) -> Option<Scalar> {
    match value {
        Value::Bool(b) => Some(Scalar::Bool(b)),
        Value::Number(n) => Some(Scalar::Number(n)),
        Value::String(s) => Some(Scalar::Text(s)),
        Value::Null | Value::Array(_) | Value::Object(_) => None,
    }
}

fn lenient_scalar<'de, D>(deserializer: D) -> Result<Option<Scalar>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(scalar_of(Value::deserialize(deserializer)?))
}

// `"title": 12` displays as "12"
fn lenient_text<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(scalar_of(Value::deserialize(deserializer)?).map(|scalar| scalar.to_string()))
}

// Non-arrays are absent; non-string entries are dropped
fn lenient_strings<'de, D>(deserializer: D) -> Result<Option<Vec<String>>, D::Error>
where
    D: Deserializer<'de>,
{
    match Value::deserialize(deserializer)? {
        Value::Array(items) => Ok(Some(
            items
                .into_iter()
                .filter_map(|item| match item {
                    Value::String(s) => Some(s),
                    _ => None,
                })
                .collect(),
        )),
        _ => Ok(None),
    }
}

// Boolean amenity flag. Accepts any JSON value and keeps only its truthiness,
// so `"parking": 1` or `"parking": "yes"` do not break the whole catalog.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct Flag(pub bool);

impl<'de> Deserialize<'de> for Flag {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let value = serde_json::Value::deserialize(deserializer)?;
        let truthy = match &value {
            serde_json::Value::Null => false,
            serde_json::Value::Bool(b) => *b,
            serde_json::Value::Number(n) => n.as_f64().is_some_and(|v| v != 0.0),
            serde_json::Value::String(s) => !s.is_empty(),
            serde_json::Value::Array(_) | serde_json::Value::Object(_) => true,
        };
        Ok(Flag(truthy))
    }
}

impl Flag {
    pub fn is_on(self) -> bool {
        self.0
    }
}

/// Amenity flags in display order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Amenity {
    WaterState,
    WaterWell,
    ElectricityState,
    Generator,
    Solar,
    Elevator,
    Parking,
    Storage,
    SeaView,
    MountainView,
    Security,
    Cameras,
    Ac,
    Heating,
}

impl Amenity {
    /// The generic water flags, superseded by a specific `water_source`.
    pub fn is_water(self) -> bool {
        matches!(self, Amenity::WaterState | Amenity::WaterWell)
    }
}

// One property record from the catalog
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Listing {
    #[serde(default, deserialize_with = "lenient_scalar")]
    pub id: Option<Scalar>,
    #[serde(default, deserialize_with = "lenient_text")]
    pub title: Option<String>,
    #[serde(default, deserialize_with = "lenient_text")]
    pub status: Option<String>,
    #[serde(default, rename = "type", deserialize_with = "lenient_text")]
    pub kind: Option<String>,
    #[serde(default, deserialize_with = "lenient_text")]
    pub area: Option<String>,
    #[serde(default, deserialize_with = "lenient_text")]
    pub currency: Option<String>,
    pub price: f64,

    // Optional details
    #[serde(default, deserialize_with = "lenient_scalar")]
    pub size: Option<Scalar>,
    #[serde(default, deserialize_with = "lenient_scalar")]
    pub legal_status: Option<Scalar>,
    #[serde(default, deserialize_with = "lenient_scalar")]
    pub floor: Option<Scalar>,
    #[serde(default, deserialize_with = "lenient_scalar")]
    pub bedrooms: Option<Scalar>,
    #[serde(default, deserialize_with = "lenient_scalar")]
    pub bathrooms: Option<Scalar>,
    #[serde(default, deserialize_with = "lenient_scalar")]
    pub water_source: Option<Scalar>,
    #[serde(default, deserialize_with = "lenient_scalar")]
    pub view_type: Option<Scalar>,
    #[serde(default, deserialize_with = "lenient_scalar")]
    pub building_condition: Option<Scalar>,
    #[serde(default, deserialize_with = "lenient_scalar")]
    pub balconies: Option<Scalar>,

    #[serde(default, deserialize_with = "lenient_strings")]
    pub features: Option<Vec<String>>,
    #[serde(default, deserialize_with = "lenient_strings")]
    pub images: Option<Vec<String>>,
    #[serde(default, deserialize_with = "lenient_text")]
    pub image: Option<String>,

    // Amenity flags
    #[serde(default)]
    pub water_state: Flag,
    #[serde(default)]
    pub water_well: Flag,
    #[serde(default)]
    pub electricity_state: Flag,
    #[serde(default)]
    pub generator: Flag,
    #[serde(default)]
    pub solar: Flag,
    #[serde(default)]
    pub elevator: Flag,
    #[serde(default)]
    pub parking: Flag,
    #[serde(default)]
    pub storage: Flag,
    #[serde(default)]
    pub sea_view: Flag,
    #[serde(default)]
    pub mountain_view: Flag,
    #[serde(default)]
    pub security: Flag,
    #[serde(default)]
    pub cameras: Flag,
    #[serde(default)]
    pub ac: Flag,
    #[serde(default)]
    pub heating: Flag,

    #[serde(default)]
    pub featured: Flag,
}

impl Listing {
    pub fn title(&self) -> &str {
        self.title.as_deref().unwrap_or("")
    }

    pub fn status(&self) -> &str {
        self.status.as_deref().unwrap_or("")
    }

    pub fn area(&self) -> &str {
        self.area.as_deref().unwrap_or("")
    }

    pub fn is_for_sale(&self) -> bool {
        self.status() == STATUS_FOR_SALE
    }

    pub fn has_amenity(&self, amenity: Amenity) -> bool {
        let flag = match amenity {
            Amenity::WaterState => self.water_state,
            Amenity::WaterWell => self.water_well,
            Amenity::ElectricityState => self.electricity_state,
            Amenity::Generator => self.generator,
            Amenity::Solar => self.solar,
            Amenity::Elevator => self.elevator,
            Amenity::Parking => self.parking,
            Amenity::Storage => self.storage,
            Amenity::SeaView => self.sea_view,
            Amenity::MountainView => self.mountain_view,
            Amenity::Security => self.security,
            Amenity::Cameras => self.cameras,
            Amenity::Ac => self.ac,
            Amenity::Heating => self.heating,
        };
        flag.is_on()
    }
}
