//! Integration test driver for `tests/integration/` submodule.
//!
//! Each `mod` below maps to a file that exercises a specific subsystem
//! against mock adapters.  Everything runs in-process; file-backed tests
//! use a temporary directory.

mod auth_tests;
mod mock_ports;
mod storage_tests;
