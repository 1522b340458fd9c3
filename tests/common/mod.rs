// Common test utilities and fixtures

pub mod fixtures;
pub mod helpers;

// Re-export commonly used items
// Note: not every test binary uses every helper
#[allow(unused_imports)]
pub use fixtures::TestSite;
#[allow(unused_imports)]
pub use helpers::{index_site, test_config};
