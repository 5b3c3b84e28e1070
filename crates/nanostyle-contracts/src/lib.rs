pub mod assets;
pub mod chat;
pub mod encoding;
pub mod events;
pub mod workflow;
