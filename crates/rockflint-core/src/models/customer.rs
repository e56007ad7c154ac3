//! Customer profiles and saved listings.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::listing::deserialize_decimal;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CustomerProfile {
    pub id: i64,
    pub user_id: i64,
    pub user_email: String,
    pub user_name: String,
    #[serde(default)]
    pub first_name: Option<String>,
    #[serde(default)]
    pub last_name: Option<String>,
    #[serde(default)]
    pub phone_number: Option<String>,
    #[serde(default)]
    pub profile_image: Option<String>,
}

impl CustomerProfile {
    pub fn full_name(&self) -> String {
        let name = [self.first_name.as_deref(), self.last_name.as_deref()]
            .into_iter()
            .flatten()
            .filter(|s| !s.is_empty())
            .collect::<Vec<_>>()
            .join(" ");
        if name.is_empty() {
            self.user_name.clone()
        } else {
            name
        }
    }
}

/// An entry of the customer's wishlist.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FavoriteListing {
    pub listing: SavedListing,
    pub saved_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SavedListing {
    pub id: i64,
    pub title: String,
    pub slug: String,
    #[serde(deserialize_with = "deserialize_decimal")]
    pub price: f64,
    pub active: bool,
    pub created: DateTime<Utc>,
}
