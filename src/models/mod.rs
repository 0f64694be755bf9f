//! Response models for the campaign slug API
//!
//! This module defines the DTOs (Data Transfer Objects) used for
//! serializing HTTP response bodies.

pub mod responses;

// Re-export commonly used types
pub use responses::{
    HealthResponse, MembershipResponse, RefreshResponse, SlugsResponse, StatusResponse,
};
