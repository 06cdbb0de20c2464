//! HTTP boundary — the GEDEON auth/profile API consumed by the flow.
//!
//! Every operation is a single request/response round trip with no retry
//! logic; a retry is always an explicit user resubmission. The session is a
//! cookie, so the client carries a cookie store the way a browser fetch with
//! `credentials: "include"` would.

pub mod client;
pub mod gateway;

pub use client::ApiClient;
pub use gateway::{
    AuthApi, AuthResponse, BestEffort, HttpAuthGateway, SessionCheck,
};
