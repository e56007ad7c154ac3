//! Data models for Rockflint marketplace entities.
//!
//! - `Listing`, `ListingImage`, `Review`: property listings
//! - `Category`, `Offer`, `State`, `Lga`, `Feature`: lookup tables
//! - `VendorSummary`, `Vendor`, `VendorDashboard`: agent profiles
//! - `CustomerProfile`, `FavoriteListing`: customer data
//! - `UserProfile`, `TokenPair` and request payloads: accounts

pub mod customer;
pub mod listing;
pub mod lookup;
pub mod user;
pub mod vendor;

use serde::{Deserialize, Serialize};

pub use customer::{CustomerProfile, FavoriteListing, SavedListing};
pub use listing::{average_rating, FavoriteToggle, Listing, ListingDraft, ListingImage, NewReview, Review};
pub use lookup::{Category, Feature, Lga, Offer, State};
pub use user::{
    ChangePasswordRequest, LoginRequest, MessageResponse, OtpLoginResponse, PasswordResetConfirm,
    ProfilePayload, RefreshGrant, RegisterRequest, RegisterResponse, TokenPair, UserProfile,
    VerifyOtpRequest,
};
pub use vendor::{RecentListing, RecentReview, Vendor, VendorActivity, VendorDashboard, VendorSummary};

/// Page of results from a paginated list endpoint.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Page<T> {
    pub count: u64,
    #[serde(default)]
    pub next: Option<String>,
    #[serde(default)]
    pub previous: Option<String>,
    pub results: Vec<T>,
}

impl<T> Page<T> {
    pub fn has_next(&self) -> bool {
        self.next.is_some()
    }
}
