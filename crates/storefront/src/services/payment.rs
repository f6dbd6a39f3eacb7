//! Payment gateway client for hosted invoices.
//!
//! Creates an invoice with `POST /v2/invoices` and hands back the hosted
//! payment page URL. Authentication is HTTP Basic with the secret key as the
//! username and an empty password.

use std::time::Duration;

use base64::Engine;
use base64::engine::general_purpose::STANDARD;
use reqwest::header::{AUTHORIZATION, HeaderMap, HeaderValue};
use secrecy::{ExposeSecret, SecretString};
use serde::{Deserialize, Serialize};
use simplemart_core::{Email, Price};
use thiserror::Error;
use tracing::{info, instrument};
use url::Url;

use crate::services::catalog::with_trailing_slash;

/// Errors that can occur when talking to the payment gateway.
#[derive(Debug, Error)]
pub enum PaymentError {
    /// HTTP request failed.
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// API returned an error response.
    #[error("API error: {status} - {message}")]
    Api { status: u16, message: String },

    /// Failed to parse response.
    #[error("Parse error: {0}")]
    Parse(String),

    /// The secret key cannot be sent as a header.
    #[error("Invalid API key format")]
    InvalidKey,

    /// Endpoint URL could not be built.
    #[error("Invalid URL: {0}")]
    Url(#[from] url::ParseError),
}

/// Body of an invoice creation request.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct InvoiceRequest {
    pub external_id: String,
    pub amount: Price,
    pub payer_email: Email,
    pub description: String,
    pub success_redirect_url: String,
    pub failure_redirect_url: String,
}

/// An invoice as returned by the gateway.
#[derive(Debug, Clone, Deserialize)]
pub struct Invoice {
    #[serde(default)]
    pub id: Option<String>,
    /// Hosted payment page the buyer is sent to.
    pub invoice_url: String,
    #[serde(default)]
    pub status: Option<String>,
}

/// Payment gateway client.
#[derive(Clone)]
pub struct PaymentClient {
    client: reqwest::Client,
    invoices_url: Url,
}

impl PaymentClient {
    /// Create a new payment client.
    ///
    /// # Errors
    ///
    /// Returns error if the key cannot be encoded as a header or the HTTP
    /// client fails to build.
    pub fn new(base_url: &Url, secret_key: &SecretString) -> Result<Self, PaymentError> {
        let mut headers = HeaderMap::new();

        let credentials = STANDARD.encode(format!("{}:", secret_key.expose_secret()));
        let mut auth_value = HeaderValue::from_str(&format!("Basic {credentials}"))
            .map_err(|_| PaymentError::InvalidKey)?;
        auth_value.set_sensitive(true);
        headers.insert(AUTHORIZATION, auth_value);

        let client = reqwest::Client::builder()
            .default_headers(headers)
            .timeout(Duration::from_secs(30))
            .build()?;

        Ok(Self {
            client,
            invoices_url: with_trailing_slash(base_url).join("v2/invoices")?,
        })
    }

    /// Create a hosted invoice.
    ///
    /// # Errors
    ///
    /// Returns error if the API request fails or the response has no
    /// invoice URL.
    #[instrument(skip(self, request), fields(external_id = %request.external_id, amount = %request.amount))]
    pub async fn create_invoice(&self, request: &InvoiceRequest) -> Result<Invoice, PaymentError> {
        let response = self
            .client
            .post(self.invoices_url.clone())
            .json(request)
            .send()
            .await?;
        let status = response.status();

        if !status.is_success() {
            let message = response.text().await.unwrap_or_default();
            tracing::error!(
                status = %status,
                body = %message.chars().take(500).collect::<String>(),
                "Payment API returned non-success status"
            );
            return Err(PaymentError::Api {
                status: status.as_u16(),
                message: message.chars().take(200).collect(),
            });
        }

        let invoice: Invoice = response
            .json()
            .await
            .map_err(|e| PaymentError::Parse(e.to_string()))?;

        info!(invoice_id = ?invoice.id, "Invoice created");
        Ok(invoice)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_invoice_request_serialization() {
        let request = InvoiceRequest {
            external_id: "order-1700000000000".to_string(),
            amount: Price::from_cents(12_345),
            payer_email: Email::parse("buyer@example.com").unwrap(),
            description: "SimpleMART Order".to_string(),
            success_redirect_url: "http://localhost:5173/payment-success".to_string(),
            failure_redirect_url: "http://localhost:5173/payment-failed".to_string(),
        };

        let json = serde_json::to_value(&request).unwrap();
        assert_eq!(json["external_id"], "order-1700000000000");
        assert_eq!(json["amount"], serde_json::json!(123.45));
        assert_eq!(json["payer_email"], "buyer@example.com");
        assert_eq!(json["failure_redirect_url"], "http://localhost:5173/payment-failed");
    }

    #[test]
    fn test_invoice_tolerates_missing_optional_fields() {
        let invoice: Invoice =
            serde_json::from_str(r#"{"invoice_url":"https://checkout.example/inv_1"}"#).unwrap();
        assert_eq!(invoice.invoice_url, "https://checkout.example/inv_1");
        assert!(invoice.id.is_none());
    }

    #[test]
    fn test_invoices_url() {
        let key = SecretString::from("xnd_development_abc123");
        let base = Url::parse("https://api.xendit.co").unwrap();
        let client = PaymentClient::new(&base, &key).unwrap();
        assert_eq!(client.invoices_url.as_str(), "https://api.xendit.co/v2/invoices");
    }
}
