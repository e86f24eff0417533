//! cbt-workflow: orquestación del diario por pasos
//!
//! Une el reductor puro de `flow` con la persistencia local de
//! `cbt-persistence`: hidratación al montar (`HydrationController`),
//! propagación de cambios con guardado local y remoto
//! (`ChangePropagator`) y la fachada `DiaryFlow` que consume la capa de UI.

pub mod diary;
pub mod errors;
pub mod hydration;
pub mod migration;
pub mod propagator;
pub mod remote;

pub use diary::DiaryFlow;
pub use errors::{Result, WorkflowError};
pub use hydration::{HydrationController, HydrationOutcome, HydrationStatus};
pub use migration::MigrationState;
pub use propagator::ChangePropagator;
pub use remote::{NoopRemote, RemoteSink};
