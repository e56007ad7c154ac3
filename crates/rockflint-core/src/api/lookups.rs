//! Reference data endpoints. All public.

use crate::models::{Category, Feature, Lga, Offer, State};

use super::{ApiClient, ApiError, RequestOptions};

impl ApiClient {
    pub async fn fetch_categories(&self) -> Result<Vec<Category>, ApiError> {
        self.execute("/api/ads/categories/", &RequestOptions::get().public())
            .await
    }

    pub async fn fetch_offers(&self) -> Result<Vec<Offer>, ApiError> {
        self.execute("/api/ads/offers/", &RequestOptions::get().public())
            .await
    }

    pub async fn fetch_states(&self) -> Result<Vec<State>, ApiError> {
        self.execute("/api/ads/states/", &RequestOptions::get().public())
            .await
    }

    /// Local government areas, optionally narrowed to one state.
    pub async fn fetch_lgas(&self, state_id: Option<i64>) -> Result<Vec<Lga>, ApiError> {
        let mut options = RequestOptions::get().public();
        if let Some(state_id) = state_id {
            options = options.query("state", state_id);
        }
        self.execute("/api/ads/lgas/", &options).await
    }

    pub async fn fetch_features(&self) -> Result<Vec<Feature>, ApiError> {
        self.execute("/api/ads/features/", &RequestOptions::get().public())
            .await
    }
}
