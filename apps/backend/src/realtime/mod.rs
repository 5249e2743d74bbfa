pub mod hub;
pub mod protocol;

pub use hub::{BroadcastGateway, SessionHub};
pub use protocol::{DiceView, UpdatePayload};
