pub mod assertions;
pub mod setup;

// Re-export main utilities for use by test files
#[allow(unused_imports)]
pub use assertions::MembershipAssertion;
#[allow(unused_imports)]
pub use setup::{TestSetup, TestSetupBuilder};
