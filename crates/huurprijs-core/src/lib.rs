pub mod client;
pub mod config;
pub mod controller;
pub mod fields;
pub mod format;
pub mod prediction;
pub mod request;
pub mod transcript;
pub mod validate;

// Re-export main types for convenience
pub use client::{PredictError, PredictionClient};
pub use config::Config;
pub use controller::{Effect, Event, InteractionController, InteractionState};
pub use fields::{FieldId, FieldKeyError, FieldValues};
pub use prediction::{IntervalType, PredictionResult};
pub use request::PredictRequest;
pub use transcript::{Message, MessageId, Role, Transcript};
pub use validate::{InvalidFields, ValidatedRequest};
