//! CLI command integration tests
//!
//! Each test gets a `TestWorkspace` with its own config file and, where a
//! server is needed, a `FakeTagsServer` on an ephemeral port.

pub mod convert_tests;
pub mod lookup_tests;
pub mod status_tests;
