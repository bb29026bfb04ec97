//! Application core — pure domain logic, zero I/O.
//!
//! This module contains the business rules of the check-in system:
//! access checks, the proximity gate, and record keeping.  All interaction
//! with devices and storage happens through **port traits** defined in
//! [`ports`], keeping this layer fully testable without real backends.

pub mod commands;
pub mod events;
pub mod ports;
pub mod service;
