//! Fixture generation workflow.
//!
//! The screen has a generator step and a schedule step, plus a preview
//! surface that opens whenever the server accepts a generation request.

use crate::mutation::{Workflow, accept};
use crate::OperationError;
use pitchside_client::ApiClient;
use pitchside_types::{FormModel, Notification, NotificationSink};
use serde_json::{Value, json};
use std::sync::Arc;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum ActiveView {
    #[default]
    Generator,
    Schedule,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct FixtureView {
    pub preview_open: bool,
    /// Ask the server to discard and rebuild existing fixtures.
    pub regenerate: bool,
    pub active: ActiveView,
    /// Unsaved fixtures kept for preview.
    pub generated: Option<Value>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FixtureRequest {
    pub tournament_id: String,
    /// Persist the fixtures instead of returning a draft.
    pub save: bool,
}

pub struct FixtureWorkflow {
    client: Arc<ApiClient>,
    sink: Arc<dyn NotificationSink>,
}

impl FixtureWorkflow {
    pub const ENDPOINT: &'static str = "/fixtures/generate";

    pub fn new(client: Arc<ApiClient>, sink: Arc<dyn NotificationSink>) -> Self {
        Self { client, sink }
    }

    /// Generate fixtures and move the view to its next step.
    ///
    /// # Errors
    ///
    /// [`OperationError::AlreadyReported`] for server rejections,
    /// [`OperationError::Request`] for transport failures.
    pub async fn generate(
        &self,
        request: &FixtureRequest,
        form: &dyn FormModel,
        view: &mut FixtureView,
    ) -> Result<Value, OperationError> {
        let body = json!({
            "tournamentId": request.tournament_id,
            "save": request.save,
            "regenerate": view.regenerate,
        });
        let result = self.client.create(Self::ENDPOINT, body).await;
        let data = accept(Workflow::FixtureGeneration, result, form, &*self.sink)?;

        view.preview_open = true;
        if data.get("regenerate").and_then(Value::as_bool) == Some(true) {
            tracing::debug!(tournament = %request.tournament_id, "server asked for regeneration");
            view.regenerate = false;
            view.preview_open = false;
            view.active = ActiveView::Generator;
        } else if !request.save {
            view.generated = Some(data.clone());
        } else {
            view.active = ActiveView::Schedule;
        }

        self.sink.notify(Notification::info(
            "Fixtures generated",
            "Fixtures have been generated successfully.",
        ));
        Ok(data)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::Harness;
    use pitchside_client::testing::ScriptedTransport;
    use pitchside_types::{Payload, TransportError};

    fn request(save: bool) -> FixtureRequest {
        FixtureRequest {
            tournament_id: "t-42".into(),
            save,
        }
    }

    #[tokio::test]
    async fn test_draft_is_kept_for_preview() {
        let fixtures = json!({ "rounds": [[{ "home": "A", "away": "B" }]] });
        let h = Harness::new(
            ScriptedTransport::new().respond(json!({ "status": true, "data": fixtures })),
        );
        let flow = FixtureWorkflow::new(h.client.clone(), h.sink.clone());
        let mut view = FixtureView::default();
        flow.generate(&request(false), &h.form, &mut view).await.unwrap();

        assert!(view.preview_open);
        assert_eq!(view.generated, Some(fixtures));
        assert_eq!(view.active, ActiveView::Generator);
        assert_eq!(h.sink.notifications()[0].title, "Fixtures generated");

        let Payload::Json(body) = &h.transport.calls()[0].body else {
            panic!("expected json body");
        };
        assert_eq!(
            body,
            &json!({ "tournamentId": "t-42", "save": false, "regenerate": false })
        );
    }

    #[tokio::test]
    async fn test_saved_fixtures_switch_to_schedule() {
        let h = Harness::new(
            ScriptedTransport::new().respond(json!({ "status": true, "data": { "saved": 12 } })),
        );
        let flow = FixtureWorkflow::new(h.client.clone(), h.sink.clone());
        let mut view = FixtureView::default();
        flow.generate(&request(true), &h.form, &mut view).await.unwrap();

        assert!(view.preview_open);
        assert_eq!(view.active, ActiveView::Schedule);
        assert!(view.generated.is_none());
    }

    #[tokio::test]
    async fn test_regenerate_reply_returns_to_generator() {
        let h = Harness::new(ScriptedTransport::new().respond(json!({
            "status": true,
            "data": { "regenerate": true }
        })));
        let flow = FixtureWorkflow::new(h.client.clone(), h.sink.clone());
        let mut view = FixtureView {
            preview_open: true,
            regenerate: true,
            active: ActiveView::Schedule,
            generated: None,
        };
        flow.generate(&request(true), &h.form, &mut view).await.unwrap();

        assert!(!view.preview_open);
        assert!(!view.regenerate);
        assert_eq!(view.active, ActiveView::Generator);
        let Payload::Json(body) = &h.transport.calls()[0].body else {
            panic!("expected json body");
        };
        assert_eq!(body["regenerate"], true);
    }

    #[tokio::test]
    async fn test_generic_rejection_leaves_view() {
        let h = Harness::new(ScriptedTransport::new().respond(json!({
            "status": false,
            "message": "Not enough teams"
        })));
        let flow = FixtureWorkflow::new(h.client.clone(), h.sink.clone());
        let mut view = FixtureView::default();
        let err = flow.generate(&request(false), &h.form, &mut view).await.unwrap_err();

        assert!(err.is_sentinel());
        assert_eq!(view, FixtureView::default());
        let seen = h.sink.notifications();
        assert_eq!(seen[0].title, "Fixture generation failed");
        assert_eq!(seen[0].description, "Not enough teams");
    }

    #[tokio::test]
    async fn test_network_failure_notifies_generically() {
        let h = Harness::new(
            ScriptedTransport::new().fail(TransportError::network("connection refused")),
        );
        let flow = FixtureWorkflow::new(h.client.clone(), h.sink.clone());
        let mut view = FixtureView::default();
        let err = flow.generate(&request(false), &h.form, &mut view).await.unwrap_err();

        assert!(matches!(err, OperationError::Request(ref e) if e.code.is_none()));
        let seen = h.sink.notifications();
        assert_eq!(seen[0].title, "Something went wrong");
        assert_eq!(
            seen[0].description,
            "Fixture generation failed: Network error! Please check your connection."
        );
    }
}
