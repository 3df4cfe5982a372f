//! HTTP adapter for the biodata builder: draft, preview, export and
//! AI introduction.

pub mod dto;
pub mod handlers;
pub mod routes;

pub use routes::biodata_routes;
