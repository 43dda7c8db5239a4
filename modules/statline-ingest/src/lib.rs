pub mod extract;
pub mod invalidate;
pub mod loader;
pub mod pipeline;
pub mod season;
pub mod summary;
pub mod traits;

#[cfg(any(test, feature = "test-support"))]
pub mod testing;
