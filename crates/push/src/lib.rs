//! Push delivery for street-light alerts.
//!
//! - [`PushTransport`]: the seam every push backend implements.
//! - [`delivery`]: concrete transports (FCM HTTP v1, log-only).
//! - [`NotificationDispatcher`]: derives the message for a new record,
//!   picks its topic and performs the single send.

pub mod delivery;
pub mod dispatcher;
pub mod transport;

pub use delivery::fcm::{FcmConfig, FcmCredentials, FcmDelivery};
pub use delivery::log::LogDelivery;
pub use dispatcher::{DispatchResult, NotificationDispatcher};
pub use transport::{PushTransport, SendReceipt, TransportError};
