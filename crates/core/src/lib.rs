//! Nigela Beta Core - Shared types library.
//!
//! This crate provides the common types used across the signup components:
//! - `intake` - HTTP service that records beta signups in the ledger
//! - `widget` - Client-side signup widget posting to the intake endpoint
//!
//! # Architecture
//!
//! The core crate contains only types - no I/O, no HTTP clients, no ledger
//! access. This keeps it lightweight and allows it to be used anywhere.
//!
//! # Modules
//!
//! - [`types`] - The validated `Email` newtype and the `SignupRecord` entity

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod types;

pub use types::*;
