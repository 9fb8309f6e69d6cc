//! Test-only crate grouping the cross-crate integration tests.
//!
//! The actual tests live under `tests/`; this library target is empty.
