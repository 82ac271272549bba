use crate::domain::SignedRegistration;
use crate::foundation::{EcdsaSignature, RegsyncError, Result};
use crate::infrastructure::signers::SecondarySigner;
use alloy::primitives::Address;
use async_trait::async_trait;
use serde::Serialize;
use std::time::Duration;

const REPRESENTATIVE_SIGNATURE_PATH: &str = "/api/v1/representative-signature";

#[derive(Serialize)]
struct SignatureRequest<'a> {
    registration: &'a SignedRegistration,
    representative: Address,
}

/// HTTP client for the signature swapper service.
pub struct SignatureSwapperClient {
    base_url: String,
    client: reqwest::Client,
}

impl SignatureSwapperClient {
    pub fn new(base_url: &str, timeout: Duration) -> Result<Self> {
        let client = reqwest::Client::builder().timeout(timeout).build()?;
        Ok(Self { base_url: base_url.trim().trim_end_matches('/').to_string(), client })
    }
}

#[async_trait]
impl SecondarySigner for SignatureSwapperClient {
    async fn generate_secondary_signature(&self, registration: &SignedRegistration, representative: Address) -> Result<EcdsaSignature> {
        let failed = |details: String| RegsyncError::SecondarySignatureFailed { pubkey: registration.pubkey().to_string(), details };
        let url = format!("{}{}", self.base_url, REPRESENTATIVE_SIGNATURE_PATH);
        self.client
            .post(&url)
            .json(&SignatureRequest { registration, representative })
            .send()
            .await
            .map_err(|err| failed(err.to_string()))?
            .error_for_status()
            .map_err(|err| failed(err.to_string()))?
            .json::<EcdsaSignature>()
            .await
            .map_err(|err| failed(err.to_string()))
    }
}
