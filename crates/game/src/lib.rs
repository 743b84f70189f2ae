//! Game library crate - render-boundary packing and the scripted headless
//! session used by `pool_demo` and the integration tests.

pub mod app;
pub mod demo;
