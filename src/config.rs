use clap::Parser;
use std::time::Duration;

use crate::watson::{EMOTION_MODEL_ID, EMOTION_PREDICT_URL, WatsonConfig};

#[derive(Debug, Clone, Parser)]
#[command(author, version, about, long_about = None)]
pub struct Config {
    /// Server host to bind to
    #[arg(long, env = "HOST", default_value = "127.0.0.1")]
    pub host: String,

    /// Server port to bind to
    #[arg(long, env = "PORT", default_value = "5000")]
    pub port: u16,

    /// Watson NLP EmotionPredict endpoint URL
    #[arg(long, env = "EMOTION_ENDPOINT", default_value = EMOTION_PREDICT_URL)]
    pub endpoint: String,

    /// Model id sent in the grpc-metadata-mm-model-id header
    #[arg(long, env = "EMOTION_MODEL_ID", default_value = EMOTION_MODEL_ID)]
    pub model_id: String,

    /// Upstream request timeout in seconds
    #[arg(long, env = "UPSTREAM_TIMEOUT_SECS", default_value = "30")]
    pub upstream_timeout_secs: u64,
}

impl Config {
    pub fn server_address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }

    pub fn watson_config(&self) -> WatsonConfig {
        WatsonConfig {
            endpoint: self.endpoint.clone(),
            model_id: self.model_id.clone(),
            timeout: Duration::from_secs(self.upstream_timeout_secs),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_point_at_the_live_service() {
        let config = Config::try_parse_from(["empath"]).unwrap();
        assert_eq!(config.server_address(), "127.0.0.1:5000");
        assert_eq!(config.endpoint, EMOTION_PREDICT_URL);
        assert_eq!(config.model_id, EMOTION_MODEL_ID);
        assert_eq!(config.watson_config().timeout, Duration::from_secs(30));
    }

    #[test]
    fn endpoint_and_address_are_overridable() {
        let config = Config::try_parse_from([
            "empath",
            "--host",
            "0.0.0.0",
            "--port",
            "8080",
            "--endpoint",
            "http://localhost:9000/EmotionPredict",
        ])
        .unwrap();
        assert_eq!(config.server_address(), "0.0.0.0:8080");
        assert_eq!(config.endpoint, "http://localhost:9000/EmotionPredict");
    }
}
