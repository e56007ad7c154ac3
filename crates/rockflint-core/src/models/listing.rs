//! Property listings, their images and reviews.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::lookup::{Category, Feature};

/// A property listing as returned by `/api/ads/listings/`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Listing {
    pub id: i64,
    pub title: String,
    #[serde(default)]
    pub slug: String,
    #[serde(default)]
    pub description: Option<String>,
    /// The backend serializes decimals as strings ("250000.00").
    #[serde(deserialize_with = "deserialize_decimal")]
    pub price: f64,
    #[serde(default)]
    pub rent_period: Option<String>,
    #[serde(default)]
    pub bedrooms: Option<u32>,
    #[serde(default)]
    pub bathrooms: Option<u32>,
    #[serde(default)]
    pub area: Option<f64>,
    #[serde(default)]
    pub attributes: Option<serde_json::Map<String, serde_json::Value>>,
    #[serde(default)]
    pub features: Vec<Feature>,
    #[serde(default)]
    pub images: Vec<ListingImage>,
    #[serde(default)]
    pub primary_image: Option<String>,
    #[serde(default)]
    pub category: Option<Category>,
    #[serde(default)]
    pub offer: Option<i64>,
    #[serde(default)]
    pub state: Option<i64>,
    #[serde(default)]
    pub lga: Option<i64>,
    #[serde(default)]
    pub vendor: Option<i64>,
    #[serde(default)]
    pub latitude: Option<f64>,
    #[serde(default)]
    pub longitude: Option<f64>,
    #[serde(default)]
    pub address: Option<String>,
}

impl Listing {
    /// Image to show first: the server's primary image, else the image
    /// flagged primary, else the first by order.
    pub fn cover_image(&self) -> Option<&str> {
        if let Some(ref url) = self.primary_image {
            if !url.is_empty() {
                return Some(url);
            }
        }
        self.images
            .iter()
            .find(|img| img.is_primary)
            .or_else(|| self.images.iter().min_by_key(|img| img.order.unwrap_or(i32::MAX)))
            .map(|img| img.image.as_str())
    }

    /// Latitude/longitude pair when the listing has a location.
    pub fn coordinates(&self) -> Option<(f64, f64)> {
        match (self.latitude, self.longitude) {
            (Some(lat), Some(lng)) => Some((lat, lng)),
            _ => None,
        }
    }

    /// Short "3 bd · 2 ba · 120 sqm" summary; empty when nothing is known.
    pub fn rooms_summary(&self) -> String {
        let mut parts = Vec::new();
        if let Some(bedrooms) = self.bedrooms {
            parts.push(format!("{} bd", bedrooms));
        }
        if let Some(bathrooms) = self.bathrooms {
            parts.push(format!("{} ba", bathrooms));
        }
        if let Some(area) = self.area {
            parts.push(format!("{} sqm", area.round()));
        }
        parts.join(" · ")
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ListingImage {
    pub id: i64,
    pub image: String,
    #[serde(default)]
    pub caption: Option<String>,
    #[serde(default)]
    pub is_primary: bool,
    #[serde(default)]
    pub order: Option<i32>,
}

/// Write payload for creating or patching a listing. Unset fields are
/// omitted so a PATCH only touches what was given.
#[derive(Debug, Clone, Default, Serialize)]
pub struct ListingDraft {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub slug: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub price: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub rent_period: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub bedrooms: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub bathrooms: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub area: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub attributes: Option<serde_json::Map<String, serde_json::Value>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub features: Option<Vec<i64>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub category: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub offer: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub state: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub lga: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub address: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub latitude: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub longitude: Option<f64>,
}

/// Answer of `toggle_favorite`.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct FavoriteToggle {
    pub favorited: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Review {
    pub id: i64,
    /// Reviewer's display string.
    pub user: String,
    pub listing: i64,
    pub title: String,
    pub comment: String,
    pub rating: u8,
    pub created: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize)]
pub struct NewReview {
    pub title: String,
    pub comment: String,
    pub rating: u8,
}

/// Average star rating, or `None` with no reviews.
pub fn average_rating(reviews: &[Review]) -> Option<f64> {
    if reviews.is_empty() {
        return None;
    }
    let total: u32 = reviews.iter().map(|r| r.rating as u32).sum();
    Some(total as f64 / reviews.len() as f64)
}

// Helper to deserialize a decimal sent as either a JSON string or number
pub(crate) fn deserialize_decimal<'de, D>(deserializer: D) -> Result<f64, D::Error>
where
    D: serde::Deserializer<'de>,
{
    use serde::de;

    struct DecimalVisitor;

    impl<'de> de::Visitor<'de> for DecimalVisitor {
        type Value = f64;

        fn expecting(&self, formatter: &mut std::fmt::Formatter) -> std::fmt::Result {
            formatter.write_str("a number or numeric string")
        }

        fn visit_f64<E>(self, v: f64) -> Result<Self::Value, E> {
            Ok(v)
        }

        fn visit_i64<E>(self, v: i64) -> Result<Self::Value, E> {
            Ok(v as f64)
        }

        fn visit_u64<E>(self, v: u64) -> Result<Self::Value, E> {
            Ok(v as f64)
        }

        fn visit_str<E>(self, v: &str) -> Result<Self::Value, E>
        where
            E: de::Error,
        {
            v.trim()
                .parse()
                .map_err(|_| E::invalid_value(de::Unexpected::Str(v), &self))
        }
    }

    deserializer.deserialize_any(DecimalVisitor)
}
