pub mod interface;
pub mod openai_client;

pub use interface::*;
pub use openai_client::OpenAiVisionClient;
