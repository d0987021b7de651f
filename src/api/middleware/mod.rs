//! API middleware.
//!
//! Only request logging; the service has no authentication or rate limiting.

pub mod access_log;
