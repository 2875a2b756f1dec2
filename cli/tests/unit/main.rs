//! Unit tests for the mits CLI
//!
//! These tests drive the real `CfCli` adapter over a scripted
//! `CommandRunner`, so they run fast without a platform or a `cf` binary.

mod cf_arguments;
mod mocks;
mod property_tests;
