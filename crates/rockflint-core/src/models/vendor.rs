//! Vendor (agent) profiles and the vendor dashboard.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::listing::deserialize_decimal;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VendorSummary {
    pub id: i64,
    pub user_id: i64,
    pub user_email: String,
    pub user_name: String,
    #[serde(default)]
    pub company_name: Option<String>,
    #[serde(default)]
    pub phone_number: Option<String>,
    #[serde(default)]
    pub website: Option<String>,
    #[serde(default)]
    pub verified: bool,
    #[serde(default)]
    pub created: Option<DateTime<Utc>>,
}

impl VendorSummary {
    /// Company name when set, else the user's name.
    pub fn display_name(&self) -> &str {
        match self.company_name.as_deref() {
            Some(name) if !name.trim().is_empty() => name,
            _ => &self.user_name,
        }
    }
}

/// Full public vendor record.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Vendor {
    #[serde(flatten)]
    pub summary: VendorSummary,
    #[serde(default)]
    pub user: Option<i64>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VendorDashboard {
    pub vendor: VendorSummary,
    pub total_listings: u32,
    pub active_listings: u32,
    pub inactive_listings: u32,
    pub total_reviews: u32,
    #[serde(default)]
    pub average_rating: f64,
    pub total_favorites: u32,
    #[serde(default)]
    pub recent_listings: Vec<RecentListing>,
    #[serde(default)]
    pub recent_reviews: Vec<RecentReview>,
    #[serde(default)]
    pub activities: Vec<VendorActivity>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RecentListing {
    pub id: i64,
    pub title: String,
    pub slug: String,
    #[serde(deserialize_with = "deserialize_decimal")]
    pub price: f64,
    pub active: bool,
    pub created: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RecentReview {
    pub id: i64,
    pub user: String,
    pub listing: i64,
    pub listing_title: String,
    pub rating: u8,
    pub title: String,
    pub comment: String,
    pub created: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VendorActivity {
    pub activity_type: String,
    pub created: DateTime<Utc>,
    pub summary: String,
    #[serde(default)]
    pub listing_id: Option<i64>,
    #[serde(default)]
    pub listing_title: Option<String>,
    #[serde(default)]
    pub actor: Option<String>,
}
