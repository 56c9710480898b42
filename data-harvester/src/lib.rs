pub mod fetch;
pub mod org;
pub mod providers;
