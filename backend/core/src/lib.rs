pub mod error;
pub mod function;
pub mod message;
pub mod traits;

pub use error::ConversationError;
pub use function::FunctionSpec;
pub use message::{FunctionCallRequest, Message, Role};
pub use traits::{Completion, ModelClient};
