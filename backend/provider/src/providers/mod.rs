pub mod openai;
pub mod scripted;
