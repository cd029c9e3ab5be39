pub mod events;
pub mod report;
pub mod settings;
pub mod state;
pub mod store;
