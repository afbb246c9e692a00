//! Conversion pipeline tests

pub mod pipeline_tests;
