//! Unit tests for the issue lifecycle.

mod authorization_tests;
mod support;
