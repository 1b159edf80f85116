pub mod client;
pub mod ingress;
pub mod messages;

pub use client::NatsClient;
pub use ingress::spawn_ingress;
pub use messages::{AgentAnnouncement, InputSettingsMessage, ReplyRequestMessage, UtteranceMessage};
