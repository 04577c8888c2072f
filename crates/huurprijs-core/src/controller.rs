//! Interaction controller for the rent prediction conversation.
//!
//! All state changes go through [`InteractionController::apply`]. The network
//! exchange itself happens outside: a `Submit` that passes validation returns
//! [`Effect::Dispatch`] with the request to send, and whoever performs the
//! exchange feeds the outcome back as [`Event::Settled`]. While a request is
//! in flight further submissions are rejected, so user/assistant pairs from
//! different submissions never interleave.

use crate::client::{PredictError, PredictionClient};
use crate::fields::{FieldId, FieldValues};
use crate::format;
use crate::prediction::PredictionResult;
use crate::request::{build_request, PredictRequest};
use crate::transcript::{Message, Transcript};
use crate::validate::{validate, InvalidFields};

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum InteractionState {
    #[default]
    Idle,
    Submitting,
    Error(String),
}

impl InteractionState {
    pub fn is_submitting(&self) -> bool {
        matches!(self, InteractionState::Submitting)
    }

    pub fn error(&self) -> Option<&str> {
        match self {
            InteractionState::Error(message) => Some(message),
            _ => None,
        }
    }
}

#[derive(Debug)]
pub enum Event {
    Edit(FieldId, String),
    Submit,
    Settled(Result<PredictionResult, PredictError>),
}

#[derive(Debug, Clone, PartialEq)]
pub enum Effect {
    None,
    /// A submission is already in flight; nothing changed.
    Rejected,
    /// Validation failed for these fields; nothing was sent.
    Invalid(InvalidFields),
    /// Send this request and report back with [`Event::Settled`].
    Dispatch(PredictRequest),
}

#[derive(Debug, Clone)]
pub struct InteractionController {
    fields: FieldValues,
    state: InteractionState,
    transcript: Transcript,
    invalid: InvalidFields,
}

impl Default for InteractionController {
    fn default() -> Self {
        Self::new()
    }
}

impl InteractionController {
    pub fn new() -> Self {
        Self::with_fields(FieldValues::default())
    }

    pub fn with_fields(fields: FieldValues) -> Self {
        Self {
            fields,
            state: InteractionState::Idle,
            transcript: Transcript::new().append(Message::assistant(format::WELCOME)),
            invalid: InvalidFields::new(),
        }
    }

    pub fn fields(&self) -> &FieldValues {
        &self.fields
    }

    pub fn state(&self) -> &InteractionState {
        &self.state
    }

    pub fn transcript(&self) -> &Transcript {
        &self.transcript
    }

    /// Fields flagged by the last failed validation, minus any edited since.
    pub fn invalid_fields(&self) -> &InvalidFields {
        &self.invalid
    }

    pub fn apply(&mut self, event: Event) -> Effect {
        match event {
            Event::Edit(field, value) => {
                self.fields.set(field, value);
                self.invalid.remove(&field);
                Effect::None
            }
            Event::Submit => self.on_submit(),
            Event::Settled(outcome) => {
                self.on_settled(outcome);
                Effect::None
            }
        }
    }

    pub fn edit(&mut self, field: FieldId, value: impl Into<String>) {
        self.apply(Event::Edit(field, value.into()));
    }

    pub fn submit(&mut self) -> Effect {
        self.apply(Event::Submit)
    }

    pub fn settle(&mut self, outcome: Result<PredictionResult, PredictError>) {
        self.apply(Event::Settled(outcome));
    }

    /// Submit and, if a request was dispatched, wait for the exchange and
    /// settle it before returning.
    pub async fn submit_with(&mut self, client: &PredictionClient) -> Effect {
        let effect = self.submit();
        if let Effect::Dispatch(request) = &effect {
            let outcome = client.predict(request).await;
            self.settle(outcome);
        }
        effect
    }

    fn on_submit(&mut self) -> Effect {
        if self.state.is_submitting() {
            tracing::debug!("submission ignored, request already in flight");
            return Effect::Rejected;
        }

        let validated = match validate(&self.fields) {
            Ok(validated) => validated,
            Err(invalid) => {
                tracing::debug!(?invalid, "submission blocked by invalid fields");
                self.invalid = invalid.clone();
                return Effect::Invalid(invalid);
            }
        };

        self.invalid.clear();
        self.transcript = self
            .transcript
            .append(Message::user(format::user_message(&validated)));
        self.state = InteractionState::Submitting;

        let request = build_request(&validated);
        tracing::debug!(?request, "dispatching prediction request");
        Effect::Dispatch(request)
    }

    fn on_settled(&mut self, outcome: Result<PredictionResult, PredictError>) {
        if !self.state.is_submitting() {
            tracing::warn!("ignoring prediction outcome with no submission in flight");
            return;
        }

        match outcome {
            Ok(result) => {
                tracing::info!(
                    predicted_eur = result.predicted_eur(),
                    low = result.interval_low_eur(),
                    high = result.interval_high_eur(),
                    "prediction received"
                );
                self.transcript = self
                    .transcript
                    .append(Message::assistant(format::assistant_message(&result)));
                self.state = InteractionState::Idle;
            }
            Err(err) => {
                tracing::warn!(error = %err, "prediction failed");
                self.state = InteractionState::Error(err.to_string());
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::prediction::IntervalType;
    use crate::transcript::Role;
    use reqwest::StatusCode;

    fn prediction(predicted: f64) -> PredictionResult {
        PredictionResult::new(predicted, predicted - 50.0, predicted + 50.0, IntervalType::FixedAbs50)
            .unwrap()
    }

    fn server_error(detail: &str) -> PredictError {
        PredictError::Status {
            status: StatusCode::INTERNAL_SERVER_ERROR,
            detail: detail.to_string(),
        }
    }

    fn roles(controller: &InteractionController) -> Vec<Role> {
        controller.transcript().iter().map(|m| m.role()).collect()
    }

    #[test]
    fn test_initial_state_has_welcome() {
        let controller = InteractionController::new();
        assert_eq!(controller.state(), &InteractionState::Idle);
        assert_eq!(roles(&controller), vec![Role::Assistant]);
        assert_eq!(controller.transcript().get(0).unwrap().content(), format::WELCOME);
    }

    #[test]
    fn test_valid_submit_appends_user_and_dispatches() {
        let mut controller = InteractionController::new();
        let effect = controller.submit();

        match effect {
            Effect::Dispatch(request) => {
                assert_eq!(request.vierkante_meter, 75.0);
                assert_eq!(request.aantal_woonlagen, 2.0);
            }
            other => panic!("expected Dispatch, got {other:?}"),
        }
        assert_eq!(controller.state(), &InteractionState::Submitting);
        assert_eq!(roles(&controller), vec![Role::Assistant, Role::User]);
        assert!(controller.transcript().last().unwrap().content().contains("Rooms: 3"));
    }

    #[test]
    fn test_invalid_submit_changes_nothing_but_markers() {
        let mut controller = InteractionController::new();
        controller.edit(FieldId::RoomCount, "abc");
        let before = controller.transcript().clone();

        let effect = controller.submit();

        assert_eq!(effect, Effect::Invalid(InvalidFields::from([FieldId::RoomCount])));
        assert_eq!(controller.state(), &InteractionState::Idle);
        assert_eq!(controller.transcript(), &before);
        assert!(controller.invalid_fields().contains(&FieldId::RoomCount));
    }

    #[test]
    fn test_invalid_submit_keeps_previous_error() {
        let mut controller = InteractionController::new();
        controller.submit();
        controller.settle(Err(server_error("model unavailable")));
        controller.edit(FieldId::AreaM2, "");

        controller.submit();

        let error = controller.state().error().unwrap();
        assert!(error.contains("model unavailable"));
    }

    #[test]
    fn test_edit_clears_marker_for_that_field_only() {
        let mut controller = InteractionController::new();
        controller.edit(FieldId::RoomCount, "x");
        controller.edit(FieldId::FloorCount, "y");
        controller.submit();

        controller.edit(FieldId::RoomCount, "3");

        assert_eq!(controller.invalid_fields(), &InvalidFields::from([FieldId::FloorCount]));
    }

    #[test]
    fn test_submit_while_in_flight_is_noop() {
        let mut controller = InteractionController::new();
        controller.submit();
        let fields = controller.fields().clone();
        let transcript = controller.transcript().clone();

        let effect = controller.submit();

        assert_eq!(effect, Effect::Rejected);
        assert_eq!(controller.state(), &InteractionState::Submitting);
        assert_eq!(controller.fields(), &fields);
        assert_eq!(controller.transcript(), &transcript);
    }

    #[test]
    fn test_success_appends_assistant_and_returns_idle() {
        let mut controller = InteractionController::new();
        controller.submit();
        controller.settle(Ok(prediction(1500.0)));

        assert_eq!(controller.state(), &InteractionState::Idle);
        assert_eq!(roles(&controller), vec![Role::Assistant, Role::User, Role::Assistant]);
        let reply = controller.transcript().last().unwrap().content();
        assert!(reply.contains("€1500"));
        assert!(reply.contains("€1450 – €1550"));
    }

    #[test]
    fn test_failure_sets_error_and_keeps_user_message() {
        let mut controller = InteractionController::new();
        controller.submit();
        controller.settle(Err(server_error("model unavailable")));

        assert!(controller.state().error().unwrap().contains("model unavailable"));
        assert_eq!(roles(&controller), vec![Role::Assistant, Role::User]);
    }

    #[test]
    fn test_retry_after_error() {
        let mut controller = InteractionController::new();
        controller.submit();
        controller.settle(Err(PredictError::Timeout));

        assert!(matches!(controller.submit(), Effect::Dispatch(_)));
        assert_eq!(controller.state(), &InteractionState::Submitting);
        controller.settle(Ok(prediction(1800.0)));

        assert_eq!(
            roles(&controller),
            vec![Role::Assistant, Role::User, Role::User, Role::Assistant]
        );
        assert_eq!(controller.state(), &InteractionState::Idle);
    }

    #[test]
    fn test_rapid_double_submit_yields_one_pair() {
        let mut controller = InteractionController::new();
        let first = controller.submit();
        let second = controller.submit();
        controller.settle(Ok(prediction(1500.0)));

        assert!(matches!(first, Effect::Dispatch(_)));
        assert_eq!(second, Effect::Rejected);
        assert_eq!(roles(&controller), vec![Role::Assistant, Role::User, Role::Assistant]);
    }

    #[test]
    fn test_stray_settle_is_ignored() {
        let mut controller = InteractionController::new();
        let before = controller.transcript().clone();

        controller.settle(Ok(prediction(1500.0)));

        assert_eq!(controller.state(), &InteractionState::Idle);
        assert_eq!(controller.transcript(), &before);
    }

    #[test]
    fn test_edits_allowed_while_submitting() {
        let mut controller = InteractionController::new();
        controller.submit();
        controller.edit(FieldId::AreaM2, "90");

        assert_eq!(controller.fields().area_m2(), "90");
        assert_eq!(controller.state(), &InteractionState::Submitting);
    }

    #[test]
    fn test_failed_submission_has_no_reply() {
        let mut controller = InteractionController::new();
        let outcomes: Vec<Result<PredictionResult, PredictError>> = vec![
            Ok(prediction(1500.0)),
            Err(server_error("boom")),
            Ok(prediction(1700.0)),
        ];

        for outcome in outcomes {
            controller.submit();
            controller.settle(outcome);
        }

        let messages = roles(&controller);
        assert_eq!(
            messages,
            vec![Role::Assistant, Role::User, Role::Assistant, Role::User, Role::User, Role::Assistant]
        );
    }
}
