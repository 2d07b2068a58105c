//! Cross-module scenario tests.

mod aggregator_properties;
