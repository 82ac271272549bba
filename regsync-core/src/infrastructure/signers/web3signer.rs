use crate::domain::{RegistrationMessage, SignedRegistration};
use crate::foundation::{BlsPublicKey, BlsSignature, RegsyncError, Result};
use crate::infrastructure::signers::RemoteSigner;
use async_trait::async_trait;
use log::debug;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::str::FromStr;
use std::time::Duration;

const PUBLIC_KEYS_PATH: &str = "/api/v1/eth2/publicKeys";
const SIGN_PATH: &str = "/api/v1/eth2/sign";
const VALIDATOR_REGISTRATION: &str = "VALIDATOR_REGISTRATION";

#[derive(Serialize)]
struct SignRequest<'a> {
    #[serde(rename = "type")]
    kind: &'static str,
    validator_registration: &'a RegistrationMessage,
}

#[derive(Deserialize)]
struct SignResponse {
    signature: String,
}

/// Web3Signer eth2 API client.
pub struct Web3SignerClient {
    base_url: String,
    client: reqwest::Client,
}

impl Web3SignerClient {
    pub fn new(base_url: &str, timeout: Duration) -> Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|err| RegsyncError::remote_signer("client build", err))?;
        Ok(Self { base_url: base_url.trim().trim_end_matches('/').to_string(), client })
    }
}

/// Web3Signer answers with a bare hex string or `{"signature": "0x.."}` depending on `Accept`.
fn parse_signature_body(body: &str) -> Result<BlsSignature> {
    let trimmed = body.trim();
    let hex_value = match serde_json::from_str::<SignResponse>(trimmed) {
        Ok(response) => response.signature,
        Err(_) => trimmed.trim_matches('"').to_string(),
    };
    BlsSignature::from_str(&hex_value).map_err(|err| RegsyncError::remote_signer("sign response", err))
}

#[async_trait]
impl RemoteSigner for Web3SignerClient {
    async fn sign_registration(&self, message: &RegistrationMessage) -> Result<SignedRegistration> {
        let url = format!("{}{}/{}", self.base_url, SIGN_PATH, message.pubkey);
        let body = SignRequest { kind: VALIDATOR_REGISTRATION, validator_registration: message };
        let response = self
            .client
            .post(&url)
            .header(reqwest::header::ACCEPT, "application/json")
            .json(&body)
            .send()
            .await
            .map_err(|err| RegsyncError::remote_signer("sign", err))?
            .error_for_status()
            .map_err(|err| RegsyncError::remote_signer("sign", err))?;
        let text = response.text().await.map_err(|err| RegsyncError::remote_signer("sign", err))?;
        let signature = parse_signature_body(&text)?;
        debug!("registration re-signed pubkey={} fee_recipient={}", message.pubkey, message.fee_recipient);
        Ok(SignedRegistration { message: *message, signature })
    }

    async fn list_signable_keys(&self) -> Result<HashSet<BlsPublicKey>> {
        let url = format!("{}{}", self.base_url, PUBLIC_KEYS_PATH);
        let keys: Vec<String> = self
            .client
            .get(&url)
            .send()
            .await
            .map_err(|err| RegsyncError::remote_signer("list keys", err))?
            .error_for_status()
            .map_err(|err| RegsyncError::remote_signer("list keys", err))?
            .json()
            .await
            .map_err(|err| RegsyncError::remote_signer("list keys", err))?;
        keys.iter().map(|key| BlsPublicKey::from_str(key)).collect()
    }
}
