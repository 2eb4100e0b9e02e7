use crate::{
    DeliveryChannel, DeliveryChannelFactory, DeliveryError, DeliveryResult,
    Result as WsErrorResult, RoutingDescriptor, WsError,
};

use fanout_config::DeliveryConfig;
use fanout_core::{ConnectionId, Payload};

use std::panic::Location;
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use error_location::ErrorLocation;
use reqwest::{Client as ReqwestClient, StatusCode, Url};

/// Path segment under the stage that addresses individual connections
pub const CONNECTIONS_PATH_SEGMENT: &str = "@connections";

/// Delivers through a management endpoint: `POST {base}/@connections/{id}`
pub struct HttpDeliveryChannel {
    client: ReqwestClient,
    base_url: Url,
}

impl HttpDeliveryChannel {
    pub fn new(client: ReqwestClient, base_url: Url) -> Self {
        Self { client, base_url }
    }

    fn connection_url(&self, id: &ConnectionId) -> Url {
        let mut url = self.base_url.clone();
        if let Ok(mut segments) = url.path_segments_mut() {
            segments
                .pop_if_empty()
                .push(CONNECTIONS_PATH_SEGMENT)
                .push(id.as_str());
        }
        url
    }
}

#[async_trait]
impl DeliveryChannel for HttpDeliveryChannel {
    async fn send(&self, id: &ConnectionId, payload: Payload) -> DeliveryResult {
        let url = self.connection_url(id);

        let response = match self
            .client
            .post(url)
            .body(bytes::Bytes::from(payload))
            .send()
            .await
        {
            Ok(response) => response,
            Err(e) => {
                return DeliveryResult::Transient(DeliveryError::Transport {
                    message: e.to_string(),
                });
            }
        };

        let status = response.status();
        if status.is_success() {
            return DeliveryResult::Delivered;
        }
        if status == StatusCode::GONE {
            return DeliveryResult::Gone;
        }

        let message = response.text().await.unwrap_or_default();
        DeliveryResult::Transient(DeliveryError::Rejected {
            status: status.as_u16(),
            message,
        })
    }
}

/// Shares one HTTP client across every channel it builds. Only domains in
/// `delivery.allowed_domains` get a channel.
#[derive(Clone)]
pub struct HttpDeliveryFactory {
    client: ReqwestClient,
    config: DeliveryConfig,
}

impl HttpDeliveryFactory {
    pub fn new(config: &DeliveryConfig) -> WsErrorResult<Self> {
        let client = ReqwestClient::builder()
            .timeout(Duration::from_millis(config.timeout_ms))
            .build()
            .map_err(|e| WsError::ChannelUnavailable {
                message: format!("failed to build HTTP client: {e}"),
                location: ErrorLocation::from(Location::caller()),
            })?;

        Ok(Self {
            client,
            config: config.clone(),
        })
    }
}

impl DeliveryChannelFactory for HttpDeliveryFactory {
    fn create(&self, routing: &RoutingDescriptor) -> WsErrorResult<Arc<dyn DeliveryChannel>> {
        if !self.config.is_allowed_domain(&routing.domain_name) {
            return Err(WsError::ChannelUnavailable {
                message: format!(
                    "domain {:?} is not an allowed delivery endpoint",
                    routing.domain_name
                ),
                location: ErrorLocation::from(Location::caller()),
            });
        }

        let raw = format!(
            "{}://{}/{}",
            self.config.endpoint_scheme, routing.domain_name, routing.stage
        );
        let base_url = Url::parse(&raw).map_err(|e| WsError::ChannelUnavailable {
            message: format!("invalid endpoint {raw:?}: {e}"),
            location: ErrorLocation::from(Location::caller()),
        })?;

        Ok(Arc::new(HttpDeliveryChannel::new(
            self.client.clone(),
            base_url,
        )))
    }
}
