//! Handlers for document-created triggers.
//!
//! Each request carries one new notification record and is answered only
//! after its single push send has completed. The answer is `200` whatever
//! the push outcome, so the caller acknowledges the event instead of
//! redelivering it.

use axum::extract::{Path, State};
use axum::Json;
use serde::Serialize;
use streetlight_core::channels::NOTIFICATIONS_COLLECTION;
use streetlight_core::{DeliveryTarget, NotificationRecord};
use streetlight_push::DispatchResult;

use crate::error::AppResult;
use crate::firestore::{DocumentEventData, DocumentRef};
use crate::response::DataResponse;
use crate::state::AppState;

// ---------------------------------------------------------------------------
// Response types
// ---------------------------------------------------------------------------

/// What happened to a trigger.
#[derive(Debug, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum TriggerOutcome {
    /// The record was pushed (or the push was attempted and failed).
    Dispatched(DispatchSummary),
    /// The event did not describe a new notification record.
    Ignored { reason: String },
}

/// Wire form of a [`DispatchResult`].
#[derive(Debug, Serialize)]
pub struct DispatchSummary {
    pub doc_id: String,
    pub sent: bool,
    pub topic: String,
    pub target: DeliveryTarget,
    pub message_id: Option<String>,
    pub error: Option<String>,
}

impl From<DispatchResult> for DispatchSummary {
    fn from(result: DispatchResult) -> Self {
        let sent = result.sent();
        let topic = result.topic();
        let (message_id, error) = match result.outcome {
            Ok(receipt) => (Some(receipt.message_id), None),
            Err(e) => (None, Some(e.to_string())),
        };

        Self {
            doc_id: result.record_id,
            sent,
            topic,
            target: result.target,
            message_id,
            error,
        }
    }
}

fn ignored(reason: impl Into<String>) -> Json<DataResponse<TriggerOutcome>> {
    Json(DataResponse {
        data: TriggerOutcome::Ignored {
            reason: reason.into(),
        },
    })
}

// ---------------------------------------------------------------------------
// Handlers
// ---------------------------------------------------------------------------

/// POST /triggers/notifications/{doc_id}
///
/// Direct invocation with the record's fields as the JSON body.
pub async fn notification_created(
    State(state): State<AppState>,
    Path(doc_id): Path<String>,
    Json(record): Json<NotificationRecord>,
) -> Json<DataResponse<TriggerOutcome>> {
    let result = state.dispatcher.dispatch(&record, &doc_id).await;
    Json(DataResponse {
        data: TriggerOutcome::Dispatched(result.into()),
    })
}

/// POST /triggers/firestore
///
/// Firestore document-created event (`DocumentEventData` JSON). Events for
/// documents outside the top-level notifications collection are
/// acknowledged and ignored.
pub async fn firestore_document_created(
    State(state): State<AppState>,
    Json(event): Json<DocumentEventData>,
) -> AppResult<Json<DataResponse<TriggerOutcome>>> {
    let Some(document) = event.value else {
        tracing::warn!("Firestore event without a document value, ignoring");
        return Ok(ignored("event carries no document"));
    };

    let doc_ref = DocumentRef::parse(&document.name)?;
    if doc_ref.collection_path != NOTIFICATIONS_COLLECTION {
        tracing::warn!(
            document = %document.name,
            "Firestore event for another collection, ignoring"
        );
        return Ok(ignored(format!(
            "document is not in the {NOTIFICATIONS_COLLECTION} collection"
        )));
    }

    let record = document.into_record();
    let result = state
        .dispatcher
        .dispatch(&record, &doc_ref.document_id)
        .await;

    Ok(Json(DataResponse {
        data: TriggerOutcome::Dispatched(result.into()),
    }))
}
