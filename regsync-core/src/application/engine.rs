//! Caller-facing entry points: registrations, claims and exits.
//!
//! Every call holds the session lock for its whole duration, so chunks and their transactions
//! are strictly sequential and the single signing key never races itself for nonces.

use crate::application::dispatcher::{attempt_status, Dispatcher};
use crate::application::observer::{NoopObserver, ReconciliationObserver};
use crate::application::reconciler::Reconciler;
use crate::domain::{
    chunk_ranges, dedup_by_identity, Authority, DelegationAction, DelegationActionResult, DelegationReport, DispatchStatus,
    ExclusionTable, PayoutSource, PreparedRegistration, ReconciliationResult, SignedRegistration, StatusSnapshot, TransactionOutcome,
};
use crate::foundation::{BlsPublicKey, RegsyncError, Result, MAX_IDENTITIES_PER_TRANSACTION};
use crate::infrastructure::chain::ChainGateway;
use crate::infrastructure::contracts::{EcdsaSignature as SolEcdsaSignature, INativeDelegationLedger};
use crate::infrastructure::exclusions::ExclusionStore;
use crate::infrastructure::signers::{RemoteSigner, SecondarySigner};
use crate::infrastructure::status::StatusSource;
use alloy::primitives::{Address, Bytes};
use alloy::sol_types::SolCall;
use log::{debug, info, warn};
use std::collections::HashSet;
use std::sync::Arc;
use tokio::sync::Mutex;

#[derive(Clone, Debug)]
pub struct EngineSettings {
    /// Identities per chunk; capped at [`MAX_IDENTITIES_PER_TRANSACTION`].
    pub max_batch_size: usize,
    pub registry_address: Address,
    /// `None` disables the delegation ledger entirely.
    pub delegation_address: Option<Address>,
    pub payout_override: Option<Address>,
}

impl EngineSettings {
    pub fn new(registry_address: Address) -> Self {
        Self { max_batch_size: MAX_IDENTITIES_PER_TRANSACTION, registry_address, delegation_address: None, payout_override: None }
    }
}

pub struct RegistrationEngine {
    gateway: Arc<ChainGateway>,
    status_source: Arc<dyn StatusSource>,
    dispatcher: Dispatcher,
    exclusions: Arc<ExclusionStore>,
    remote_signer: Option<Arc<dyn RemoteSigner>>,
    secondary_signer: Option<Arc<dyn SecondarySigner>>,
    observer: Arc<dyn ReconciliationObserver>,
    settings: EngineSettings,
    session: Mutex<()>,
}

impl RegistrationEngine {
    pub fn new(
        gateway: Arc<ChainGateway>,
        status_source: Arc<dyn StatusSource>,
        exclusions: Arc<ExclusionStore>,
        settings: EngineSettings,
    ) -> Self {
        let dispatcher = Dispatcher::new(gateway.clone(), settings.registry_address, settings.delegation_address);
        Self {
            gateway,
            status_source,
            dispatcher,
            exclusions,
            remote_signer: None,
            secondary_signer: None,
            observer: Arc::new(NoopObserver),
            settings,
            session: Mutex::new(()),
        }
    }

    pub fn with_remote_signer(mut self, signer: Arc<dyn RemoteSigner>) -> Self {
        self.remote_signer = Some(signer);
        self
    }

    pub fn with_secondary_signer(mut self, signer: Arc<dyn SecondarySigner>) -> Self {
        self.secondary_signer = Some(signer);
        self
    }

    pub fn with_observer(mut self, observer: Arc<dyn ReconciliationObserver>) -> Self {
        self.observer = observer;
        self
    }

    pub fn signing_address(&self) -> Address {
        self.gateway.signing_address()
    }

    pub fn delegation_enabled(&self) -> bool {
        self.settings.delegation_address.is_some()
    }

    pub fn exclusions(&self) -> &Arc<ExclusionStore> {
        &self.exclusions
    }

    /// Reconcile and dispatch `intents`, returning one outcome per reported identity in input order.
    ///
    /// Duplicate identities collapse to the last intent at the first position. Configuration and
    /// batch-fatal errors abort the call with no partial results.
    pub async fn process_registrations(&self, intents: Vec<SignedRegistration>) -> Result<Vec<ReconciliationResult>> {
        if intents.is_empty() {
            return Ok(Vec::new());
        }
        let _session = self.session.lock().await;

        let received = intents.len();
        let intents = dedup_by_identity(intents, |intent| *intent.pubkey());
        let exclusions = self.exclusions.snapshot();
        let ranges = chunk_ranges(intents.len(), self.chunk_size());
        info!(
            "processing registrations received={} unique={} chunks={} exclusions_version={}",
            received,
            intents.len(),
            ranges.len(),
            exclusions.version()
        );

        let mut results = Vec::with_capacity(intents.len());
        let total_chunks = ranges.len();
        for (index, range) in ranges.into_iter().enumerate() {
            debug!("processing chunk index={} of={} start={} len={}", index + 1, total_chunks, range.start, range.len());
            let chunk_results = self.process_chunk(&intents[range], &exclusions).await?;
            results.extend(chunk_results);
        }
        info!("registrations processed received={} reported={}", received, results.len());
        Ok(results)
    }

    pub async fn process_claims(&self, reports: Vec<DelegationReport>) -> Result<Vec<DelegationActionResult>> {
        self.process_delegation_action(DelegationAction::Claim, reports).await
    }

    pub async fn process_exits(&self, reports: Vec<DelegationReport>) -> Result<Vec<DelegationActionResult>> {
        self.process_delegation_action(DelegationAction::Exit, reports).await
    }

    fn chunk_size(&self) -> usize {
        self.settings.max_batch_size.clamp(1, MAX_IDENTITIES_PER_TRANSACTION)
    }

    async fn process_chunk(&self, chunk: &[SignedRegistration], exclusions: &ExclusionTable) -> Result<Vec<ReconciliationResult>> {
        let pubkeys: Vec<BlsPublicKey> = chunk.iter().map(|intent| *intent.pubkey()).collect();
        let statuses = self.read_statuses(&pubkeys).await?;
        let prepared = self.prepare_intents(chunk, exclusions, &statuses).await;

        let reconciler = Reconciler::new(self.secondary_signer.as_deref(), self.observer.as_ref());
        let mut plan = reconciler.reconcile(&prepared, exclusions, self.signing_address(), &statuses).await?;
        if plan.is_noop() {
            debug!("chunk needs no transactions identities={}", chunk.len());
        }
        self.dispatcher.dispatch(&mut plan, self.observer.as_ref()).await?;
        Ok(plan.results)
    }

    async fn read_statuses(&self, pubkeys: &[BlsPublicKey]) -> Result<StatusSnapshot> {
        let registry = self.status_source.batch_get_status(pubkeys, Authority::Registry).await?;
        let delegation = if self.delegation_enabled() {
            Some(self.status_source.batch_get_status(pubkeys, Authority::DelegationLedger).await?)
        } else {
            None
        };
        Ok(StatusSnapshot { registry, delegation })
    }

    /// Apply the payout override to identities about to be registered. A failed re-sign drops the identity.
    async fn prepare_intents(
        &self,
        chunk: &[SignedRegistration],
        exclusions: &ExclusionTable,
        statuses: &StatusSnapshot,
    ) -> Vec<PreparedRegistration> {
        let mut prepared = Vec::with_capacity(chunk.len());
        let mut allow_list: Option<HashSet<BlsPublicKey>> = None;

        for intent in chunk {
            let unchanged = PreparedRegistration { registration: *intent, payout_recipient: intent.fee_recipient(), source: PayoutSource::Intent };
            let Some(payout_override) = self.settings.payout_override else {
                prepared.push(unchanged);
                continue;
            };
            let pubkey = intent.pubkey();
            let registry_candidate =
                statuses.identity(pubkey).registry.is_unregistered() && !exclusions.entry(pubkey).exclude_registry;
            if payout_override == intent.fee_recipient() || !registry_candidate {
                prepared.push(unchanged);
                continue;
            }

            let Some(remote_signer) = self.remote_signer.as_ref() else {
                prepared.push(PreparedRegistration { registration: *intent, payout_recipient: payout_override, source: PayoutSource::Override });
                continue;
            };

            if allow_list.is_none() {
                allow_list = Some(match remote_signer.list_signable_keys().await {
                    Ok(keys) => keys,
                    Err(err) => {
                        warn!("remote signer key listing failed; keeping original fee recipients error={}", err);
                        HashSet::new()
                    }
                });
            }
            if !allow_list.as_ref().is_some_and(|keys| keys.contains(pubkey)) {
                debug!("identity not signable remotely; keeping original fee recipient pubkey={}", pubkey);
                prepared.push(unchanged);
                continue;
            }

            let mut message = intent.message;
            message.fee_recipient = payout_override;
            match remote_signer.sign_registration(&message).await {
                Ok(resigned) if resigned.message != message => {
                    warn!(
                        "remote signer returned a different message; omitting identity pubkey={} returned_pubkey={} returned_fee_recipient={}",
                        pubkey,
                        resigned.message.pubkey,
                        resigned.message.fee_recipient
                    );
                    self.observer.on_identity_omitted(pubkey, "resign");
                }
                Ok(resigned) => prepared.push(PreparedRegistration {
                    registration: resigned,
                    payout_recipient: payout_override,
                    source: PayoutSource::OverrideResigned,
                }),
                Err(err) => {
                    warn!("re-signing with payout override failed; omitting identity pubkey={} error={}", pubkey, err);
                    self.observer.on_identity_omitted(pubkey, "resign");
                }
            }
        }
        prepared
    }

    async fn process_delegation_action(&self, action: DelegationAction, reports: Vec<DelegationReport>) -> Result<Vec<DelegationActionResult>> {
        if reports.is_empty() {
            return Ok(Vec::new());
        }
        let ledger = self
            .settings
            .delegation_address
            .ok_or_else(|| RegsyncError::ConfigError(format!("{} requires the delegation ledger to be enabled", action.as_str())))?;
        let _session = self.session.lock().await;

        let reports = dedup_by_identity(reports, |report| report.pubkey);
        let pubkeys: Vec<BlsPublicKey> = reports.iter().map(|report| report.pubkey).collect();
        let statuses = self.status_source.batch_get_status(&pubkeys, Authority::DelegationLedger).await?;
        let signer = self.signing_address();
        info!("processing delegation action action={} identities={}", action.as_str(), reports.len());

        let mut results = Vec::with_capacity(reports.len());
        for report in reports {
            let status = statuses.get(&report.pubkey).copied().unwrap_or_default();
            if status.is_unregistered() {
                warn!("identity not delegated; skipping action={} pubkey={}", action.as_str(), report.pubkey);
                self.observer.on_identity_omitted(&report.pubkey, "not_delegated");
                continue;
            }
            if status.representative != signer {
                let err = RegsyncError::not_authorized(report.pubkey, status.representative, signer);
                warn!("identity delegated under another representative; skipping action={} error={}", action.as_str(), err);
                self.observer.on_identity_omitted(&report.pubkey, "unauthorized");
                continue;
            }

            let label = format!("{}:{}", action.as_str(), report.pubkey);
            let attempt = self.gateway.send_and_confirm(&label, ledger, encode_delegation_action(action, &report)).await;
            let outcome = match attempt_status(&attempt) {
                DispatchStatus::Confirmed { tx_hash } => TransactionOutcome::Confirmed { tx_hash },
                DispatchStatus::Unknown { tx_hash, reason } => TransactionOutcome::Unknown { tx_hash, reason },
                DispatchStatus::Failed { tx_hash, reason } => TransactionOutcome::Failed { tx_hash, reason },
                DispatchStatus::NotRequired | DispatchStatus::AlreadySatisfied => {
                    TransactionOutcome::Failed { tx_hash: attempt.tx_hash, reason: "no transaction outcome".to_string() }
                }
            };
            self.observer.on_delegation_action(action, &outcome);
            results.push(DelegationActionResult { pubkey: report.pubkey, action, outcome });
        }
        Ok(results)
    }
}

pub fn encode_delegation_action(action: DelegationAction, report: &DelegationReport) -> Bytes {
    let pubkey = report.pubkey.to_bytes();
    let signature = SolEcdsaSignature::from(report.signature);
    match action {
        DelegationAction::Claim => INativeDelegationLedger::claimNativeDelegationCall {
            blsPublicKey: pubkey,
            reportedBalance: report.reported_balance,
            signature,
        }
        .abi_encode()
        .into(),
        DelegationAction::Exit => INativeDelegationLedger::exitNativeDelegationCall {
            blsPublicKey: pubkey,
            reportedBalance: report.reported_balance,
            signature,
        }
        .abi_encode()
        .into(),
    }
}
