//! Chat Data HTTP Client
//!
//! Thin reqwest wrapper over the server's `/api/chat-data` resource. The
//! raw fetch exists for the conflict check: the store compares canonical
//! serializations byte-for-byte, so both sides go through the same
//! `serde_json::Value` normalization (object keys sorted).

use reqwest::Client;

use crate::client::error::ClientError;
use crate::shared::ChatRoomDocument;

/// HTTP client for the chat-data resource
#[derive(Debug, Clone)]
pub struct RemoteApi {
    client: Client,
    base_url: String,
}

impl RemoteApi {
    /// Create a client against the given server base URL
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            client: Client::new(),
            base_url: base_url.into().trim_end_matches('/').to_string(),
        }
    }

    fn chat_data_url(&self) -> String {
        format!("{}/api/chat-data", self.base_url)
    }

    /// Fetch the current document in canonical serialized form
    pub async fn fetch_canonical(&self) -> Result<String, ClientError> {
        Ok(self.fetch_with_canonical().await?.1)
    }

    /// Fetch the document together with its canonical serialization.
    ///
    /// The canonical form is computed from the raw JSON value, before the
    /// typed parse, so fields this client version does not know about
    /// still count toward the conflict baseline.
    pub async fn fetch_with_canonical(
        &self,
    ) -> Result<(ChatRoomDocument, String), ClientError> {
        let response = self.client.get(self.chat_data_url()).send().await?;
        if !response.status().is_success() {
            return Err(ClientError::ServerRejected {
                status: response.status().as_u16(),
            });
        }
        let value: serde_json::Value = response.json().await?;
        let canonical = value.to_string();
        let document = serde_json::from_value(value)?;
        Ok((document, canonical))
    }

    /// Persist the document
    pub async fn push_document(&self, document: &ChatRoomDocument) -> Result<(), ClientError> {
        let response = self
            .client
            .post(self.chat_data_url())
            .json(document)
            .send()
            .await?;
        if !response.status().is_success() {
            return Err(ClientError::ServerRejected {
                status: response.status().as_u16(),
            });
        }
        Ok(())
    }
}

/// Canonical serialization of a document, shared with the conflict check
pub fn canonical(document: &ChatRoomDocument) -> Result<String, ClientError> {
    let value = serde_json::to_value(document)?;
    Ok(value.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::shared::ChatRoom;

    #[test]
    fn test_base_url_trailing_slash() {
        let api = RemoteApi::new("http://localhost:3000/");
        assert_eq!(api.chat_data_url(), "http://localhost:3000/api/chat-data");
    }

    #[test]
    fn test_canonical_is_stable() {
        let document = vec![ChatRoom::new("Alice", false)];
        let a = canonical(&document).unwrap();
        let b = canonical(&document).unwrap();
        assert_eq!(a, b);
    }
}
