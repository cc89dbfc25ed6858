mod in_memory;
mod store;

pub use in_memory::InMemoryEventLog;
pub use store::EventLog;
