//! Middleware module - request IDs

pub mod request_id;

pub use request_id::{request_id_of, UuidRequestId, REQUEST_ID_HEADER};
