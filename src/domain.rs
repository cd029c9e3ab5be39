pub mod atmosphere;
pub mod comfort;
pub mod weather;
