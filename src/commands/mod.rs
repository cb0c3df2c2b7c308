pub mod add;
pub mod config;
pub mod list;
pub mod new;
pub mod snapshot;
pub mod status;
