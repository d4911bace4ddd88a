// HTTP surface of the external compliance service: request/response types
// and the reqwest-based client.

pub mod client;
pub mod types;

pub use client::{ApiClient, ApiError, API_KEY_HEADER};
pub use types::{ApiResponse, Document, DocumentsPage, PoliciesPage, Policy, Rule};
