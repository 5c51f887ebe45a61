//! Account management for Daily Digest.
//!
//! This module provides registration and feed management on top of the
//! user store, including all input validation.

mod service;

pub use service::{AccountService, AddFeedRequest, RegisterRequest, UserOverview};
