mod content;
mod errors;
mod payloads;
mod session_data;
mod step;

pub use content::MeaningfulContent;
pub use errors::DomainError;
pub use payloads::{ActionPlanData, ChallengeData, CoreBeliefData, EmotionData, RationalThoughtData, SchemaModeData,
                   SituationData, StepPayload, ThoughtData};
pub use session_data::{never_persisted, SessionData, SessionDataPatch};
pub use step::{next, position, previous, StepId, STEP_ORDER, TOTAL_STEPS};
