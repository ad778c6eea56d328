use streetlight_push::NotificationDispatcher;

/// Shared application state available to all Axum handlers via `State<AppState>`.
///
/// This is cheaply cloneable (the dispatcher holds its transport behind an `Arc`).
#[derive(Clone)]
pub struct AppState {
    /// Relays trigger records to the configured push transport.
    pub dispatcher: NotificationDispatcher,
}
