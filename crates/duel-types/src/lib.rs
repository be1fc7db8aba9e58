pub mod api;
pub mod events;
pub mod models;
pub mod schedule;
pub mod tasks;
