//! Listing endpoints under `/api/ads/`.

use serde::Serialize;

use crate::models::{FavoriteToggle, Listing, ListingDraft, ListingImage, NewReview, Page, Review};

use super::{ApiClient, ApiError, MultipartForm, RequestOptions};

/// Search filters for `/api/ads/listings/`. Unset (and empty-string)
/// values are left out of the query string.
#[derive(Debug, Clone, Default, Serialize)]
pub struct ListingFilters {
    pub search: Option<String>,
    pub min_price: Option<f64>,
    pub max_price: Option<f64>,
    pub category: Option<i64>,
    pub offer: Option<i64>,
    pub state: Option<i64>,
    pub lga: Option<i64>,
    pub bedrooms: Option<u32>,
    pub ordering: Option<String>,
    pub promoted: Option<bool>,
    pub latitude: Option<f64>,
    pub longitude: Option<f64>,
    pub radius_km: Option<f64>,
    pub page: Option<u32>,
}

impl ListingFilters {
    pub fn search(term: impl Into<String>) -> Self {
        Self {
            search: Some(term.into()),
            ..Self::default()
        }
    }

    /// Query pairs in a stable order.
    pub fn to_query(&self) -> Vec<(&'static str, String)> {
        fn push<T: ToString>(out: &mut Vec<(&'static str, String)>, key: &'static str, value: &Option<T>) {
            if let Some(value) = value {
                let value = value.to_string();
                if !value.is_empty() {
                    out.push((key, value));
                }
            }
        }

        let mut query = Vec::new();
        push(&mut query, "search", &self.search);
        push(&mut query, "min_price", &self.min_price);
        push(&mut query, "max_price", &self.max_price);
        push(&mut query, "category", &self.category);
        push(&mut query, "offer", &self.offer);
        push(&mut query, "state", &self.state);
        push(&mut query, "lga", &self.lga);
        push(&mut query, "bedrooms", &self.bedrooms);
        push(&mut query, "ordering", &self.ordering);
        push(&mut query, "promoted", &self.promoted);
        push(&mut query, "latitude", &self.latitude);
        push(&mut query, "longitude", &self.longitude);
        push(&mut query, "radius_km", &self.radius_km);
        push(&mut query, "page", &self.page);
        query
    }
}

impl ApiClient {
    // ===== Listings =====

    pub async fn fetch_listings(&self, filters: &ListingFilters) -> Result<Page<Listing>, ApiError> {
        let options = RequestOptions::get().public().queries(filters.to_query());
        self.execute("/api/ads/listings/", &options).await
    }

    pub async fn fetch_listing(&self, id: i64) -> Result<Listing, ApiError> {
        let path = format!("/api/ads/listings/{}/", id);
        self.execute(&path, &RequestOptions::get().public()).await
    }

    pub async fn create_listing(&self, draft: &ListingDraft) -> Result<Listing, ApiError> {
        let options = RequestOptions::post().json(draft)?;
        self.execute("/api/ads/listings/", &options).await
    }

    pub async fn update_listing(&self, id: i64, draft: &ListingDraft) -> Result<Listing, ApiError> {
        let path = format!("/api/ads/listings/{}/", id);
        let options = RequestOptions::patch().json(draft)?;
        self.execute(&path, &options).await
    }

    pub async fn delete_listing(&self, id: i64) -> Result<(), ApiError> {
        let path = format!("/api/ads/listings/{}/", id);
        self.execute_unit(&path, &RequestOptions::delete()).await
    }

    /// Add or remove the listing from the user's favorites.
    pub async fn toggle_favorite(&self, id: i64) -> Result<FavoriteToggle, ApiError> {
        let path = format!("/api/ads/listings/{}/toggle_favorite/", id);
        self.execute(&path, &RequestOptions::post()).await
    }

    // ===== Reviews & recommendations =====

    pub async fn fetch_listing_reviews(&self, id: i64) -> Result<Vec<Review>, ApiError> {
        let path = format!("/api/ads/listings/{}/reviews/", id);
        self.execute(&path, &RequestOptions::get().public()).await
    }

    pub async fn add_review(&self, id: i64, review: &NewReview) -> Result<Review, ApiError> {
        let path = format!("/api/ads/listings/{}/add_review/", id);
        let options = RequestOptions::post().json(review)?;
        self.execute(&path, &options).await
    }

    /// Similar listings, ranked by the server.
    pub async fn fetch_recommendations(&self, id: i64) -> Result<Vec<Listing>, ApiError> {
        let path = format!("/api/ads/listings/{}/recommendations/", id);
        self.execute(&path, &RequestOptions::get().public()).await
    }

    // ===== Images =====

    pub async fn fetch_listing_images(&self) -> Result<Vec<ListingImage>, ApiError> {
        self.execute("/api/ads/listing-images/", &RequestOptions::get()).await
    }

    /// Upload an image for one of the caller's listings.
    pub async fn upload_listing_image(
        &self,
        listing_id: i64,
        file_name: &str,
        mime: Option<&str>,
        bytes: Vec<u8>,
        caption: Option<&str>,
    ) -> Result<ListingImage, ApiError> {
        let mut form = MultipartForm::new()
            .text("listing", listing_id.to_string())
            .file("image", file_name, mime, bytes);
        if let Some(caption) = caption {
            form = form.text("caption", caption);
        }
        let options = RequestOptions::post().multipart(form);
        self.execute("/api/ads/listing-images/", &options).await
    }

    pub async fn delete_listing_image(&self, id: i64) -> Result<(), ApiError> {
        let path = format!("/api/ads/listing-images/{}/", id);
        self.execute_unit(&path, &RequestOptions::delete()).await
    }
}
