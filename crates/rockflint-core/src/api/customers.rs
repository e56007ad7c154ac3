//! Customer endpoints under `/api/customer/`.

use crate::models::{CustomerProfile, FavoriteListing};

use super::{ApiClient, ApiError, RequestOptions};

impl ApiClient {
    pub async fn fetch_customer(&self, id: i64) -> Result<CustomerProfile, ApiError> {
        let path = format!("/api/customer/customers/{}/", id);
        self.execute(&path, &RequestOptions::get()).await
    }

    /// Listings the signed-in customer has favorited.
    pub async fn fetch_wishlist(&self) -> Result<Vec<FavoriteListing>, ApiError> {
        self.execute("/api/customer/customers/wishlist/", &RequestOptions::get())
            .await
    }
}
