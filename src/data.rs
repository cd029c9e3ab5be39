pub mod forecast;
pub mod snapshot;
