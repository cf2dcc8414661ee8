pub mod api_client;
pub mod engine;
pub mod error;
pub mod poller;
pub mod protocol;
pub mod wire;
