use std::time::Duration;

use anyhow::Result;
use async_trait::async_trait;
use reqwest::StatusCode;
use reqwest::header::{CONTENT_TYPE, HeaderMap, HeaderValue};
use serde::{Deserialize, Serialize};

use crate::detector::Detector;
use crate::types::{Detection, EmotionAnalysis};

pub const EMOTION_PREDICT_URL: &str =
    "https://sn-watson-emotion.labs.skills.network/v1/watson.runtime.nlp.v1/NlpService/EmotionPredict";
pub const EMOTION_MODEL_ID: &str = "emotion_aggregated-workflow_lang_en_stock";

const MODEL_ID_HEADER: &str = "grpc-metadata-mm-model-id";

#[derive(Debug, Clone)]
pub struct WatsonConfig {
    pub endpoint: String,
    pub model_id: String,
    pub timeout: Duration,
}

impl Default for WatsonConfig {
    fn default() -> Self {
        Self {
            endpoint: EMOTION_PREDICT_URL.to_string(),
            model_id: EMOTION_MODEL_ID.to_string(),
            timeout: Duration::from_secs(30),
        }
    }
}

/// Live client for the Watson NLP `EmotionPredict` service.
#[derive(Debug, Clone)]
pub struct WatsonDetector {
    client: reqwest::Client,
    endpoint: String,
}

#[derive(Serialize)]
struct EmotionPredictRequest<'a> {
    raw_document: RawDocument<'a>,
}

#[derive(Serialize)]
struct RawDocument<'a> {
    text: &'a str,
}

#[derive(Deserialize)]
struct EmotionPredictResponse {
    #[serde(rename = "emotionPredictions", default)]
    emotion_predictions: Vec<EmotionPrediction>,
}

#[derive(Deserialize)]
struct EmotionPrediction {
    #[serde(default)]
    emotion: RawEmotion,
}

// Absent score keys default to 0, matching the upstream contract where an
// entry may omit emotions it scored at zero.
#[derive(Default, Deserialize)]
struct RawEmotion {
    #[serde(default)]
    anger: f64,
    #[serde(default)]
    disgust: f64,
    #[serde(default)]
    fear: f64,
    #[serde(default)]
    joy: f64,
    #[serde(default)]
    sadness: f64,
}

impl WatsonDetector {
    pub fn new(config: WatsonConfig) -> Result<Self> {
        let mut headers = HeaderMap::new();
        headers.insert(MODEL_ID_HEADER, HeaderValue::from_str(&config.model_id)?);
        headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));

        let client = reqwest::Client::builder()
            .default_headers(headers)
            .timeout(config.timeout)
            .build()?;

        Ok(Self {
            client,
            endpoint: config.endpoint,
        })
    }
}

#[async_trait]
impl Detector for WatsonDetector {
    #[tracing::instrument(skip(self, text), fields(text_len = text.len()))]
    async fn detect(&self, text: &str) -> Detection {
        let request = EmotionPredictRequest {
            raw_document: RawDocument { text },
        };

        let response = match self.client.post(&self.endpoint).json(&request).send().await {
            Ok(response) => response,
            Err(err) => {
                tracing::error!(error = %err, "emotion request never reached the upstream");
                return Detection::failure(err);
            }
        };

        let status = response.status();
        if status == StatusCode::BAD_REQUEST {
            // Upstream uses 400 for text it cannot classify.
            tracing::debug!("upstream rejected the text as unclassifiable");
            return Detection::invalid();
        }
        if status.is_client_error() || status.is_server_error() {
            tracing::warn!(status = status.as_u16(), "upstream returned an error status");
            return Detection::upstream_error(
                status.as_u16(),
                format!("{} for url ({})", status, response.url()),
            );
        }

        let parsed: EmotionPredictResponse = match response.json().await {
            Ok(parsed) => parsed,
            Err(err) => {
                tracing::error!(error = %err, "failed to decode upstream response");
                return Detection::failure(err);
            }
        };

        match parsed.emotion_predictions.into_iter().next() {
            Some(prediction) => {
                let emotion = prediction.emotion;
                Detection::ok(EmotionAnalysis::new(
                    emotion.anger,
                    emotion.disgust,
                    emotion.fear,
                    emotion.joy,
                    emotion.sadness,
                ))
            }
            // A 200 with no prediction entries signals the same thing as an
            // upstream 400.
            None => {
                tracing::debug!("upstream returned no emotion predictions");
                Detection::invalid()
            }
        }
    }
}
