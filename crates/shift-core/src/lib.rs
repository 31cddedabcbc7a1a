//! # shift-core
//!
//! Core types, clock abstraction, and error types for Shift.
//!
//! This crate provides the foundational types shared across all Shift crates:
//! - Entity structs (time entries, correction requests, audit log, employees)
//! - Status enums with state machine transitions
//! - ID prefix constants
//! - Validation report types and typed admin override values
//! - Cross-cutting error types and conflict codes
//! - Result objects returned by the public operations
//! - A `Clock` trait so every operation reads "now" exactly once

pub mod clock;
pub mod entities;
pub mod enums;
pub mod errors;
pub mod ids;
pub mod overrides;
pub mod responses;
pub mod validation;
