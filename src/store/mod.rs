mod config;
mod event_store;

pub use config::StoreConfig;
pub use event_store::EventStore;
