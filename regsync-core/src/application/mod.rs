//! Application layer: orchestration across domain logic and infrastructure I/O.

pub mod dispatcher;
pub mod engine;
pub mod observer;
pub mod reconciler;

pub use dispatcher::Dispatcher;
pub use engine::{EngineSettings, RegistrationEngine};
pub use observer::{CompositeObserver, NoopObserver, ReconciliationObserver};
pub use reconciler::{DelegationEntry, ReconciliationPlan, Reconciler, RegistryEntry};
