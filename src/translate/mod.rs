pub mod interface;
pub mod gateway;
pub mod google;
pub mod relay_client;
pub mod providers;

pub use interface::*;
pub use gateway::TranslationGateway;
pub use providers::{ProviderTranslator, TRANSLATION_SERVICES};
