//! Integration tests for the mits CLI
//!
//! These tests spawn the actual binary and test end-to-end behavior.
//! None of them need a platform: `cf` is either never reached or hidden
//! from `PATH`.

mod run_command;
