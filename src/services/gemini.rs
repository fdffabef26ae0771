//! Gemini-klient: biografier via generateContent och talsyntes via TTS-modellen

use async_trait::async_trait;
use base64::engine::general_purpose::STANDARD;
use base64::Engine;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::models::AppSettings;
use crate::services::content::{bio_prompt, ContentService, EMPTY_BIO};
use crate::services::retry::RetryPolicy;
use crate::utils::{AppError, AppResult};

const BASE_URL: &str = "https://generativelanguage.googleapis.com/v1beta/models";

#[derive(Debug, Clone)]
pub struct GeminiClient {
    client: Client,
    base_url: String,
    api_key: Option<String>,
    bio_model: String,
    tts_model: String,
    voice_name: String,
    retry: RetryPolicy,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct GenerateRequest {
    contents: Vec<RequestContent>,
    #[serde(skip_serializing_if = "Option::is_none")]
    generation_config: Option<GenerationConfig>,
}

#[derive(Debug, Serialize)]
struct RequestContent {
    parts: Vec<RequestPart>,
}

#[derive(Debug, Serialize)]
struct RequestPart {
    text: String,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct GenerationConfig {
    response_modalities: Vec<String>,
    speech_config: SpeechConfig,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct SpeechConfig {
    voice_config: VoiceConfig,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct VoiceConfig {
    prebuilt_voice_config: PrebuiltVoiceConfig,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct PrebuiltVoiceConfig {
    voice_name: String,
}

#[derive(Debug, Default, Deserialize)]
struct GenerateResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
}

#[derive(Debug, Default, Deserialize)]
struct Candidate {
    #[serde(default)]
    content: Option<ResponseContent>,
}

#[derive(Debug, Default, Deserialize)]
struct ResponseContent {
    #[serde(default)]
    parts: Vec<ResponsePart>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ResponsePart {
    #[serde(default)]
    text: Option<String>,
    #[serde(default)]
    inline_data: Option<InlineData>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
struct InlineData {
    #[serde(default)]
    mime_type: Option<String>,
    data: String,
}

impl GenerateRequest {
    fn text(prompt: String) -> Self {
        Self {
            contents: vec![RequestContent {
                parts: vec![RequestPart { text: prompt }],
            }],
            generation_config: None,
        }
    }

    fn speech(text: &str, voice_name: &str) -> Self {
        Self {
            generation_config: Some(GenerationConfig {
                response_modalities: vec!["AUDIO".to_string()],
                speech_config: SpeechConfig {
                    voice_config: VoiceConfig {
                        prebuilt_voice_config: PrebuiltVoiceConfig {
                            voice_name: voice_name.to_string(),
                        },
                    },
                },
            }),
            ..Self::text(text.to_string())
        }
    }
}

impl GenerateResponse {
    fn parts(&self) -> impl Iterator<Item = &ResponsePart> {
        self.candidates
            .first()
            .and_then(|c| c.content.as_ref())
            .map(|c| c.parts.as_slice())
            .unwrap_or_default()
            .iter()
    }

    /// Sammanslagen text från första kandidaten
    fn text(&self) -> Option<String> {
        let text: String = self.parts().filter_map(|p| p.text.as_deref()).collect();
        let text = text.trim();
        (!text.is_empty()).then(|| text.to_string())
    }

    /// Base64-data från första delen med inbäddat ljud
    fn inline_audio(&self) -> Option<&InlineData> {
        self.parts().find_map(|p| p.inline_data.as_ref())
    }
}

impl GeminiClient {
    pub fn new(settings: &AppSettings) -> AppResult<Self> {
        let client = Client::builder()
            .timeout(settings.request_timeout())
            .build()?;

        Ok(Self {
            client,
            base_url: BASE_URL.to_string(),
            api_key: settings.effective_api_key(),
            bio_model: settings.bio_model.clone(),
            tts_model: settings.tts_model.clone(),
            voice_name: settings.voice_name.clone(),
            retry: settings.retry.into(),
        })
    }

    pub fn has_api_key(&self) -> bool {
        self.api_key.is_some()
    }

    fn api_key(&self) -> AppResult<&str> {
        self.api_key.as_deref().ok_or(AppError::MissingApiKey)
    }

    async fn generate(&self, model: &str, request: &GenerateRequest) -> AppResult<GenerateResponse> {
        let api_key = self.api_key()?;
        let url = format!("{}/{}:generateContent", self.base_url, model);
        debug!("POST {}", url);

        let response = self
            .client
            .post(&url)
            .header("x-goog-api-key", api_key)
            .json(request)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(AppError::Api {
                status: status.as_u16(),
                body,
            });
        }

        Ok(response.json::<GenerateResponse>().await?)
    }

    async fn generate_with_retry(
        &self,
        what: &str,
        model: &str,
        request: &GenerateRequest,
    ) -> AppResult<GenerateResponse> {
        self.api_key()?;
        self.retry
            .run(what, move || self.generate(model, request))
            .await
    }
}

fn decode_audio(inline: &InlineData) -> AppResult<Vec<u8>> {
    if let Some(mime) = &inline.mime_type {
        debug!("Ljudsvar: {}", mime);
    }
    STANDARD
        .decode(inline.data.trim())
        .map_err(|e| AppError::other(format!("Ogiltig ljuddata: {}", e)))
}

#[async_trait]
impl ContentService for GeminiClient {
    async fn fetch_bio(&self, name: &str, role: &str) -> AppResult<String> {
        let request = GenerateRequest::text(bio_prompt(name, role));
        let response = self
            .generate_with_retry("Biografi", &self.bio_model, &request)
            .await?;

        Ok(response.text().unwrap_or_else(|| EMPTY_BIO.to_string()))
    }

    async fn synthesize_speech(&self, text: &str) -> AppResult<Option<Vec<u8>>> {
        let request = GenerateRequest::speech(text, &self.voice_name);
        let response = self
            .generate_with_retry("Talsyntes", &self.tts_model, &request)
            .await?;

        response.inline_audio().map(decode_audio).transpose()
    }
}
