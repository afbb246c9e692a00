//! Client tests against in-process TCP servers

pub mod query_tests;
