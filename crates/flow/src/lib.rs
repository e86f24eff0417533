//! Crate `flow` — máquina de estados del diario por pasos
//!
//! Este crate define el estado del flujo (`FlowState`), las acciones que lo
//! transforman (`FlowAction`) y el reductor puro `reduce`. También expone
//! `compute_starting_step` para calcular el punto de reanudación de un
//! borrador, `Progress` para la capa de UI y un motor `FlowEngine` que
//! serializa los despachos sobre un estado compartido.
//!
//! Diseño resumido:
//! - Reductor total: ninguna transición falla ni hace I/O; el instante
//!   actual se inyecta como parámetro.
//! - Cada acción reemplaza el slot que direcciona (último escritor gana).
//! - `completed_steps` sólo crece por `CompleteStep` (o al restaurar un
//!   borrador con `Resume`), nunca por una edición en sitio.
//!
//! Ejemplo rápido:
//! ```rust
//! use flow::{FlowAction, FlowEngine};
//! use cbt_domain::StepId;
//! let engine = FlowEngine::new();
//! let state = engine.dispatch(FlowAction::GoNext).unwrap();
//! assert_eq!(state.current_step, StepId::Emotions);
//! ```
pub mod action;
pub mod engine;
pub mod errors;
pub mod progress;
pub mod reducer;
pub mod resume;
pub mod state;

pub use action::*;
pub use engine::*;
pub use errors::*;
pub use progress::*;
pub use reducer::*;
pub use resume::*;
pub use state::*;
