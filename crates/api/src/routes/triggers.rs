use axum::routing::post;
use axum::Router;

use crate::handlers::triggers;
use crate::state::AppState;

/// Trigger routes.
///
/// ```text
/// /triggers/notifications/{doc_id}    direct record invocation (POST)
/// /triggers/firestore                 Firestore document-created event (POST)
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route(
            "/triggers/notifications/{doc_id}",
            post(triggers::notification_created),
        )
        .route("/triggers/firestore", post(triggers::firestore_document_created))
}
