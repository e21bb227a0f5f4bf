//! Engine test suite

mod support;
