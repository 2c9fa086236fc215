//! Shared test helpers for `wxkit-core` integration tests.
//!
//! In-memory doubles for the credential ports so cache tests can focus on
//! behaviour instead of boilerplate.

#![allow(dead_code)]

pub mod credentials;
