//! Test utilities for the query evaluation crates.
//!
//! This crate provides:
//! - Deterministic bit vector fixtures driven by a minimal standard PRNG
//! - A conformance verifier that checks any search iterator against a fixed
//!   expected hit list, in both strict and non-strict mode
//!
//! It is intended for the test suites of the workspace and for the
//! `queryeval-cmd` tool.

pub mod data_gen;
pub mod verifier;

pub use data_gen::{MinStdRand, inverted_copies, random_bit_vectors};
pub use verifier::{IteratorFactory, SearchIteratorVerifier};
