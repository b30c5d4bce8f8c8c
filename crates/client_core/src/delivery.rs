use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use shared::protocol::{DeliveryReceipt, RsvpRecord};
use tracing::{debug, warn};
use url::Url;

use crate::error::DeliveryError;

/// Hands a record to the webhook that stores RSVPs.
#[async_trait]
pub trait RsvpDelivery: Send + Sync {
    async fn deliver(&self, endpoint: &Url, record: &RsvpRecord)
        -> Result<DeliveryReceipt, DeliveryError>;
}

/// JSON POST over HTTP. Redirects are followed, and anything other than a
/// final 2xx counts as rejected.
pub struct HttpDelivery {
    http: Client,
}

impl HttpDelivery {
    pub fn new(timeout: Duration) -> Result<Self, DeliveryError> {
        let http = Client::builder().timeout(timeout).build()?;
        Ok(Self { http })
    }

    pub fn with_client(http: Client) -> Self {
        Self { http }
    }
}

#[async_trait]
impl RsvpDelivery for HttpDelivery {
    async fn deliver(
        &self,
        endpoint: &Url,
        record: &RsvpRecord,
    ) -> Result<DeliveryReceipt, DeliveryError> {
        let response = self
            .http
            .post(endpoint.clone())
            .json(record)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            warn!(status = status.as_u16(), %endpoint, "rsvp: endpoint rejected record");
            return Err(DeliveryError::Rejected {
                status: status.as_u16(),
            });
        }

        debug!(status = status.as_u16(), %endpoint, "rsvp: endpoint accepted record");
        Ok(DeliveryReceipt {
            status: status.as_u16(),
        })
    }
}

#[cfg(test)]
#[path = "tests/delivery_tests.rs"]
mod tests;
