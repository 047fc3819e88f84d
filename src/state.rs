use std::sync::Arc;

use crate::config::Config;
use crate::labeling::LabelOrchestrator;
use crate::session::SessionManager;
use crate::translate::{ProviderTranslator, TranslationGateway, Translator};
use crate::vision::{OpenAiVisionClient, VisionDescriber};

#[derive(Clone)]
pub struct AppState {
    pub config: Arc<Config>,
    pub gateway: TranslationGateway,
    pub orchestrator: Arc<LabelOrchestrator>,
    pub sessions: SessionManager,
}

impl AppState {
    /// Build state backed by the real network providers
    pub fn new(config: Config) -> anyhow::Result<Self> {
        let translator = Arc::new(ProviderTranslator::new(&config.translation)?);
        let describer = Arc::new(OpenAiVisionClient::new(&config.vision)?);
        Ok(Self::with_providers(config, translator, describer))
    }

    pub fn with_providers(
        config: Config,
        translator: Arc<dyn Translator>,
        describer: Arc<dyn VisionDescriber>,
    ) -> Self {
        let sessions = SessionManager::new(config.server.scratch_root.clone());
        Self {
            config: Arc::new(config),
            gateway: TranslationGateway::new(translator),
            orchestrator: Arc::new(LabelOrchestrator::new(describer)),
            sessions,
        }
    }
}
