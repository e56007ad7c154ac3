//! Assistant chat endpoint.

use serde_json::{json, Value};

use super::{ApiClient, ApiError, RequestOptions};

impl ApiClient {
    /// Send one message to the marketplace assistant. The reply shape is
    /// owned by the server, so it is returned undecoded.
    pub async fn send_chat_message(&self, message: &str) -> Result<Value, ApiError> {
        let options = RequestOptions::post().json(&json!({ "message": message }))?;
        self.execute("/api/chat/", &options).await
    }
}
