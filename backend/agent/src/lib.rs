//! funcloop conversation runner
//!
//! Owns the transcript and the executed-function guard for one run, and drives
//! the loop between model calls and local function dispatch.

pub mod agent_loop;
pub mod conversation;
pub mod executed_set;

pub use agent_loop::{ConversationResult, ConversationRunner, LoopState};
pub use conversation::Conversation;
pub use executed_set::ExecutedSet;
