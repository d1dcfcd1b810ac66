use serde::{Deserialize, Serialize};

/// Fixed label order; ties on the maximum score resolve to the first label.
pub const EMOTION_LABELS: [&str; 5] = ["anger", "disgust", "fear", "joy", "sadness"];

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct EmotionScores {
    pub anger: Option<f64>,
    pub disgust: Option<f64>,
    pub fear: Option<f64>,
    pub joy: Option<f64>,
    pub sadness: Option<f64>,
}

/// Normalized classification record: either all five scores are present and
/// a dominant emotion is derivable, or all five are null together with a
/// null dominant emotion.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct EmotionAnalysis {
    #[serde(flatten)]
    pub scores: EmotionScores,
    pub dominant_emotion: Option<String>,
}

impl EmotionAnalysis {
    pub fn new(anger: f64, disgust: f64, fear: f64, joy: f64, sadness: f64) -> Self {
        let values = [anger, disgust, fear, joy, sadness];
        let mut dominant = 0;
        for (index, value) in values.iter().enumerate() {
            if *value > values[dominant] {
                dominant = index;
            }
        }

        Self {
            scores: EmotionScores {
                anger: Some(anger),
                disgust: Some(disgust),
                fear: Some(fear),
                joy: Some(joy),
                sadness: Some(sadness),
            },
            dominant_emotion: Some(EMOTION_LABELS[dominant].to_string()),
        }
    }

    /// The record returned when the upstream could not classify the text.
    pub fn unavailable() -> Self {
        Self {
            scores: EmotionScores {
                anger: None,
                disgust: None,
                fear: None,
                joy: None,
                sadness: None,
            },
            dominant_emotion: None,
        }
    }

    /// Human-readable sentence enumerating the five scores and the dominant
    /// emotion. None when any of them is unavailable.
    pub fn summary(&self) -> Option<String> {
        let EmotionScores {
            anger: Some(anger),
            disgust: Some(disgust),
            fear: Some(fear),
            joy: Some(joy),
            sadness: Some(sadness),
        } = self.scores
        else {
            return None;
        };
        let dominant = self.dominant_emotion.as_deref()?;

        Some(format!(
            "For the given statement, the system response is 'anger': {anger}, \
             'disgust': {disgust}, 'fear': {fear}, 'joy': {joy} and 'sadness': {sadness}. \
             The dominant emotion is {dominant}."
        ))
    }
}

/// Payload half of a [`Detection`]: a classification record on the happy and
/// invalid-input paths, an error record otherwise.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum EmotionData {
    Analysis(EmotionAnalysis),
    Error { error: String },
}

/// What the classifier client hands back to the HTTP layer: a record plus
/// the status code it assigned. Failures never surface as `Err` values.
#[derive(Debug, Clone, PartialEq)]
pub struct Detection {
    pub data: EmotionData,
    pub status: u16,
}

impl Detection {
    pub fn ok(analysis: EmotionAnalysis) -> Self {
        Self {
            data: EmotionData::Analysis(analysis),
            status: 200,
        }
    }

    /// Upstream rejected the text as unclassifiable (or returned no
    /// predictions at all).
    pub fn invalid() -> Self {
        Self {
            data: EmotionData::Analysis(EmotionAnalysis::unavailable()),
            status: 400,
        }
    }

    /// Upstream reachable but answered with an error status other than 400;
    /// that status is carried through unchanged.
    pub fn upstream_error(status: u16, details: impl std::fmt::Display) -> Self {
        Self {
            data: EmotionData::Error {
                error: format!("HTTP error occurred: {details}"),
            },
            status,
        }
    }

    /// Transport, body-read, or decode failure.
    pub fn failure(details: impl std::fmt::Display) -> Self {
        Self {
            data: EmotionData::Error {
                error: format!("An error occurred: {details}"),
            },
            status: 500,
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct StatementForm {
    #[serde(default)]
    pub statement: String,
}

#[derive(Debug, Serialize)]
pub struct DetectionResponse {
    pub response: String,
    pub emotion_data: EmotionData,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn dominant_emotion_is_key_of_maximum_score() {
        let analysis = EmotionAnalysis::new(0.01, 0.02, 0.03, 0.92, 0.04);
        assert_eq!(analysis.dominant_emotion.as_deref(), Some("joy"));
        assert_eq!(analysis.scores.joy, Some(0.92));
    }

    #[test]
    fn ties_resolve_to_first_label_in_fixed_order() {
        let analysis = EmotionAnalysis::new(0.5, 0.5, 0.1, 0.2, 0.5);
        assert_eq!(analysis.dominant_emotion.as_deref(), Some("anger"));

        let analysis = EmotionAnalysis::new(0.1, 0.4, 0.4, 0.2, 0.3);
        assert_eq!(analysis.dominant_emotion.as_deref(), Some("disgust"));
    }

    #[test]
    fn unavailable_record_is_null_across_the_board() {
        let analysis = EmotionAnalysis::unavailable();
        assert_eq!(
            serde_json::to_value(&analysis).unwrap(),
            json!({
                "anger": null,
                "disgust": null,
                "fear": null,
                "joy": null,
                "sadness": null,
                "dominant_emotion": null,
            })
        );
        assert!(analysis.summary().is_none());
    }

    #[test]
    fn analysis_serializes_as_flat_object() {
        let detection = Detection::ok(EmotionAnalysis::new(0.1, 0.2, 0.3, 0.4, 0.5));
        assert_eq!(
            serde_json::to_value(&detection.data).unwrap(),
            json!({
                "anger": 0.1,
                "disgust": 0.2,
                "fear": 0.3,
                "joy": 0.4,
                "sadness": 0.5,
                "dominant_emotion": "sadness",
            })
        );
    }

    #[test]
    fn summary_lists_all_five_scores_and_the_dominant_emotion() {
        let sentence = EmotionAnalysis::new(0.1, 0.2, 0.3, 0.9, 0.5)
            .summary()
            .unwrap();
        assert_eq!(
            sentence,
            "For the given statement, the system response is 'anger': 0.1, \
             'disgust': 0.2, 'fear': 0.3, 'joy': 0.9 and 'sadness': 0.5. \
             The dominant emotion is joy."
        );
    }

    #[test]
    fn error_records_carry_their_taxonomy_prefix() {
        let upstream = Detection::upstream_error(503, "503 Service Unavailable");
        assert_eq!(upstream.status, 503);
        assert_eq!(
            serde_json::to_value(&upstream.data).unwrap(),
            json!({"error": "HTTP error occurred: 503 Service Unavailable"})
        );

        let transport = Detection::failure("connection reset");
        assert_eq!(transport.status, 500);
        assert_eq!(
            serde_json::to_value(&transport.data).unwrap(),
            json!({"error": "An error occurred: connection reset"})
        );
    }
}
