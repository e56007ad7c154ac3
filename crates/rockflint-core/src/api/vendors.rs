//! Vendor (agent) endpoints under `/api/agent/`.

use crate::models::{Vendor, VendorActivity, VendorDashboard, VendorSummary};

use super::{ApiClient, ApiError, RequestOptions};

impl ApiClient {
    pub async fn fetch_vendors(&self) -> Result<Vec<VendorSummary>, ApiError> {
        self.execute("/api/agent/public-vendors/", &RequestOptions::get().public())
            .await
    }

    pub async fn fetch_vendor(&self, id: i64) -> Result<Vendor, ApiError> {
        let path = format!("/api/agent/public-vendors/{}/", id);
        self.execute(&path, &RequestOptions::get().public()).await
    }

    /// Listing and review statistics for the vendor's own dashboard.
    pub async fn fetch_vendor_dashboard(&self, id: i64) -> Result<VendorDashboard, ApiError> {
        let path = format!("/api/agent/vendors/{}/dashboard/", id);
        self.execute(&path, &RequestOptions::get()).await
    }

    pub async fn fetch_vendor_activities(&self, id: i64) -> Result<Vec<VendorActivity>, ApiError> {
        let path = format!("/api/agent/vendors/{}/activities/", id);
        self.execute(&path, &RequestOptions::get()).await
    }

    /// Mark a vendor as verified (staff only).
    pub async fn verify_vendor(&self, id: i64) -> Result<Vendor, ApiError> {
        let path = format!("/api/agent/vendors/{}/verify/", id);
        self.execute(&path, &RequestOptions::post()).await
    }
}
