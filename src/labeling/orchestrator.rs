// Sequential per-pair labeling.
//
// Each pair is independent: a failure becomes an error entry and the batch
// moves on. Descriptions are written next to the uploads as {base}_T.txt and
// zipped at the end.

use anyhow::Context;
use base64::{engine::general_purpose::STANDARD, Engine};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing::{debug, error, info, warn};

use super::archive::build_archive;
use super::grouping::file_name_of;
use super::types::{ImagePairGroup, LabelResult};
use crate::imaging::detect_format;
use crate::session::UploadSession;
use crate::vision::{EncodedImage, PairDescriptionRequest, VisionCredentials, VisionDescriber};

pub struct LabelOrchestrator {
    describer: Arc<dyn VisionDescriber>,
}

#[derive(Debug)]
pub struct LabelOutcome {
    /// One entry per input pair, in input order
    pub results: Vec<LabelResult>,
    /// Zip of the description files; None if building it failed
    pub archive: Option<Vec<u8>>,
}

impl LabelOrchestrator {
    pub fn new(describer: Arc<dyn VisionDescriber>) -> Self {
        Self { describer }
    }

    pub async fn label_pairs(
        &self,
        session: &UploadSession,
        pairs: &[ImagePairGroup],
        credentials: &VisionCredentials,
        system_prompt: &str,
    ) -> LabelOutcome {
        info!(
            "Labeling {} pair(s) in session {} with model {}",
            pairs.len(),
            session.id(),
            credentials.model
        );

        let mut results = Vec::with_capacity(pairs.len());
        let mut written = Vec::new();

        for pair in pairs {
            match self.label_pair(session, pair, credentials, system_prompt).await {
                Ok((result, text_path)) => {
                    written.push(text_path);
                    results.push(result);
                }
                Err(e) => {
                    warn!("Labeling failed for {}: {:#}", pair.base_name, e);
                    results.push(LabelResult::Failure {
                        base_name: pair.base_name.clone(),
                        error: e.to_string(),
                    });
                }
            }
        }

        let archive = match build_archive(session.dir(), &written) {
            Ok(bytes) => {
                info!("Built result archive: {} file(s), {} bytes", written.len(), bytes.len());
                Some(bytes)
            }
            Err(e) => {
                error!("Failed to build result archive: {}", e);
                None
            }
        };

        LabelOutcome { results, archive }
    }

    async fn label_pair(
        &self,
        session: &UploadSession,
        pair: &ImagePairGroup,
        credentials: &VisionCredentials,
        system_prompt: &str,
    ) -> anyhow::Result<(LabelResult, PathBuf)> {
        let reference = encode_image(&pair.reference).await?;
        let target = encode_image(&pair.target).await?;

        let request = PairDescriptionRequest {
            credentials: credentials.clone(),
            system_prompt: system_prompt.to_string(),
            reference,
            target,
        };

        let description = self.describer.describe_pair(&request).await?;

        let text_path = session.path_for(&format!("{}_T.txt", pair.base_name));
        tokio::fs::write(&text_path, &description)
            .await
            .with_context(|| format!("failed to save description for {}", pair.base_name))?;

        let PairDescriptionRequest { reference, target, .. } = request;
        Ok((
            LabelResult::Success {
                base_name: pair.base_name.clone(),
                description,
                r_image: reference,
                t_image: target,
            },
            text_path,
        ))
    }
}

async fn encode_image(path: &Path) -> anyhow::Result<EncodedImage> {
    let name = file_name_of(path);
    let bytes = tokio::fs::read(path)
        .await
        .with_context(|| format!("failed to read {}", name))?;

    let format = detect_format(&bytes);
    debug!("Encoding {} as {} ({} bytes)", name, format, bytes.len());

    Ok(EncodedImage {
        format,
        base64: STANDARD.encode(&bytes),
        name,
    })
}
