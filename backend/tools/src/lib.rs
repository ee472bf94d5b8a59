//! Local functions the model may call, and the machinery to dispatch them.

pub mod clothing;
pub mod executor;
pub mod registry;
pub mod weather;

pub use executor::FunctionExecutor;
pub use registry::{FunctionRegistry, KnownFunction};
