//! Payment providers
//!
//! An order is confirmed either through the external gateway or through
//! the demo path. The mode is chosen once, at order-creation time, and
//! recorded on the order — verification later dispatches on that record,
//! never on current configuration.

pub mod gateway;

pub use gateway::GatewayClient;

use thiserror::Error;
use uuid::Uuid;

use crate::core::Config;
use crate::db::models::PaymentMode;

#[derive(Debug, Error)]
pub enum PaymentError {
    #[error("gateway request failed: {0}")]
    Gateway(String),

    #[error("gateway returned malformed response: {0}")]
    MalformedResponse(String),

    #[error("payment signature verification failed")]
    SignatureMismatch,
}

/// Result of opening a payment for an order
#[derive(Debug, Clone)]
pub struct OpenedPayment {
    pub mode: PaymentMode,
    /// Gateway order id, or the locally generated demo id
    pub order_id: String,
}

/// Payment service: holds the gateway client when credentials are
/// configured; otherwise every order runs in demo mode.
#[derive(Debug)]
pub struct PaymentService {
    gateway: Option<GatewayClient>,
    currency: String,
}

impl PaymentService {
    pub fn from_config(config: &Config) -> Self {
        let gateway = match (&config.gateway_key_id, &config.gateway_key_secret) {
            (Some(key_id), Some(key_secret)) => Some(GatewayClient::new(
                config.gateway_url.clone(),
                key_id.clone(),
                key_secret.clone(),
            )),
            _ => None,
        };
        if gateway.is_none() {
            tracing::warn!("Gateway credentials not configured; running in demo-only mode");
        }
        Self {
            gateway,
            currency: config.currency.clone(),
        }
    }

    /// Demo-only service (tests)
    pub fn demo_only(currency: impl Into<String>) -> Self {
        Self {
            gateway: None,
            currency: currency.into(),
        }
    }

    pub fn currency(&self) -> &str {
        &self.currency
    }

    /// Public key id for the client-side gateway widget
    pub fn gateway_key_id(&self) -> Option<&str> {
        self.gateway.as_ref().map(|g| g.key_id())
    }

    /// Open a payment for `amount` minor units.
    ///
    /// Gateway failure is not surfaced: the order falls back to demo mode
    /// and stays confirmable. The caller only ever learns which mode won.
    pub async fn open(&self, amount: i64, receipt: &str) -> OpenedPayment {
        if let Some(gateway) = &self.gateway {
            match gateway.create_order(amount, &self.currency, receipt).await {
                Ok(order_id) => {
                    return OpenedPayment {
                        mode: PaymentMode::Gateway,
                        order_id,
                    };
                }
                Err(e) => {
                    tracing::warn!(error = %e, "Gateway unavailable, falling back to demo mode");
                }
            }
        }
        OpenedPayment {
            mode: PaymentMode::Demo,
            order_id: format!("demo_{}", Uuid::new_v4().simple()),
        }
    }

    /// Verify a gateway confirmation's signature
    pub fn verify_signature(
        &self,
        order_id: &str,
        payment_id: &str,
        signature: &str,
    ) -> Result<(), PaymentError> {
        let gateway = self
            .gateway
            .as_ref()
            .ok_or_else(|| PaymentError::Gateway("gateway not configured".into()))?;
        gateway.verify_signature(order_id, payment_id, signature)
    }
}
