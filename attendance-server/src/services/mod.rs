//! Use-case layer
//!
//! Each function takes the shared [`AppState`](crate::state::AppState) and an
//! explicit `now` (Unix millis) so day boundaries are decided once per request.

pub mod account;
pub mod attendance;
pub mod department;
pub mod reporting;
pub mod session;
