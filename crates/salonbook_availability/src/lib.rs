// --- File: crates/salonbook_availability/src/lib.rs ---
// Declare modules within this crate
pub mod booking;
pub mod doc;
pub mod handlers;
pub mod logic;
#[cfg(test)]
mod logic_proptest;
pub mod routes;
pub mod service;
mod test;

pub use routes::routes;
