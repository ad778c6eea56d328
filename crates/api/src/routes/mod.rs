pub mod health;
pub mod triggers;
