//! Example grammars built on the public API.
//!
//! Each module defines a grammar constructor together with a hydration
//! builder, and doubles as the fixture set for the end to end tests.

pub mod arithmetic;
pub mod greeting;
pub mod json;
pub mod semver;

#[cfg(test)]
mod __tests__;
