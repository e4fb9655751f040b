//! Payment gateway client
//!
//! Two responsibilities: opening gateway orders over HTTP, and verifying
//! the client-supplied payment signature locally. The signature is
//! HMAC-SHA256 over `"{order_id}|{payment_id}"` keyed by the gateway
//! secret, hex-encoded — it is the sole authenticity check, so the
//! comparison must be constant-time.

use hmac::{Hmac, Mac};
use serde::Deserialize;
use sha2::Sha256;
use std::time::Duration;

use super::PaymentError;

type HmacSha256 = Hmac<Sha256>;

const REQUEST_TIMEOUT: Duration = Duration::from_secs(10);

#[derive(Debug, Clone)]
pub struct GatewayClient {
    http: reqwest::Client,
    base_url: String,
    key_id: String,
    key_secret: String,
}

#[derive(Debug, Deserialize)]
struct GatewayOrder {
    id: String,
}

impl GatewayClient {
    pub fn new(base_url: String, key_id: String, key_secret: String) -> Self {
        let http = reqwest::Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .build()
            .unwrap_or_default();
        Self {
            http,
            base_url,
            key_id,
            key_secret,
        }
    }

    pub fn key_id(&self) -> &str {
        &self.key_id
    }

    /// Open a gateway order for `amount` minor units.
    ///
    /// Returns the gateway's order id, to be echoed back by the client
    /// during verification.
    pub async fn create_order(
        &self,
        amount: i64,
        currency: &str,
        receipt: &str,
    ) -> Result<String, PaymentError> {
        let url = format!("{}/orders", self.base_url.trim_end_matches('/'));
        let response = self
            .http
            .post(&url)
            .basic_auth(&self.key_id, Some(&self.key_secret))
            .json(&serde_json::json!({
                "amount": amount,
                "currency": currency,
                "receipt": receipt,
            }))
            .send()
            .await
            .map_err(|e| PaymentError::Gateway(e.to_string()))?;

        if !response.status().is_success() {
            return Err(PaymentError::Gateway(format!(
                "gateway returned {}",
                response.status()
            )));
        }

        let order: GatewayOrder = response
            .json()
            .await
            .map_err(|e| PaymentError::MalformedResponse(e.to_string()))?;
        Ok(order.id)
    }

    /// Verify the client-supplied signature for a captured payment.
    ///
    /// `Mac::verify_slice` compares in constant time.
    pub fn verify_signature(
        &self,
        order_id: &str,
        payment_id: &str,
        signature_hex: &str,
    ) -> Result<(), PaymentError> {
        let supplied =
            hex::decode(signature_hex).map_err(|_| PaymentError::SignatureMismatch)?;

        let mut mac = HmacSha256::new_from_slice(self.key_secret.as_bytes())
            .map_err(|e| PaymentError::Gateway(e.to_string()))?;
        mac.update(format!("{}|{}", order_id, payment_id).as_bytes());
        mac.verify_slice(&supplied)
            .map_err(|_| PaymentError::SignatureMismatch)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn client() -> GatewayClient {
        GatewayClient::new(
            "https://gateway.example/v1".into(),
            "key_id".into(),
            "key_secret".into(),
        )
    }

    fn sign(secret: &str, order_id: &str, payment_id: &str) -> String {
        let mut mac = HmacSha256::new_from_slice(secret.as_bytes()).unwrap();
        mac.update(format!("{}|{}", order_id, payment_id).as_bytes());
        hex::encode(mac.finalize().into_bytes())
    }

    #[test]
    fn test_valid_signature_accepted() {
        let client = client();
        let sig = sign("key_secret", "order_123", "pay_456");
        assert!(client.verify_signature("order_123", "pay_456", &sig).is_ok());
    }

    #[test]
    fn test_tampered_payment_id_rejected() {
        let client = client();
        let sig = sign("key_secret", "order_123", "pay_456");
        assert!(matches!(
            client.verify_signature("order_123", "pay_457", &sig),
            Err(PaymentError::SignatureMismatch)
        ));
    }

    #[test]
    fn test_wrong_key_rejected() {
        let client = client();
        let sig = sign("other_secret", "order_123", "pay_456");
        assert!(client.verify_signature("order_123", "pay_456", &sig).is_err());
    }

    #[test]
    fn test_non_hex_signature_rejected() {
        let client = client();
        assert!(matches!(
            client.verify_signature("order_123", "pay_456", "not-hex!"),
            Err(PaymentError::SignatureMismatch)
        ));
    }
}
