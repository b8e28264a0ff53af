//! Model profiles: mapping a client-facing selector onto the upstream model
//! identifier and its sampling parameters.

use serde::Serialize;

/// Selector for the distilled 8B model.
pub const DISTILL_SELECTOR: &str = "deepseek-r1-distill-llama-8b";

/// Canonical default selector (49B model).
pub const DEFAULT_SELECTOR: &str = "llama-3.3-nemotron-super-49b-v1";

const DISTILL_MODEL_ID: &str = "deepseek-ai/deepseek-r1-distill-llama-8b";
const DEFAULT_MODEL_ID: &str = "nvidia/llama-3.3-nemotron-super-49b-v1";

/// Sampling parameters sent with the upstream completion request.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SamplingParams {
    pub temperature: f64,
    pub top_p: f64,
    pub max_tokens: u32,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub frequency_penalty: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub presence_penalty: Option<f64>,
    pub stream: bool,
}

/// A resolved {model identifier, sampling parameters} pair.
#[derive(Debug, Clone, PartialEq)]
pub struct ModelProfile {
    pub model_id: &'static str,
    pub params: SamplingParams,
}

impl ModelProfile {
    /// Resolve a selector by exact match. Unrecognized selectors (and the
    /// canonical default) fall back to the 49B profile.
    pub fn resolve(selector: &str) -> Self {
        if selector == DISTILL_SELECTOR {
            Self {
                model_id: DISTILL_MODEL_ID,
                params: SamplingParams {
                    temperature: 0.6,
                    top_p: 0.7,
                    max_tokens: 4096,
                    frequency_penalty: None,
                    presence_penalty: None,
                    stream: true,
                },
            }
        } else {
            Self {
                model_id: DEFAULT_MODEL_ID,
                params: SamplingParams {
                    temperature: 0.6,
                    top_p: 0.95,
                    max_tokens: 4096,
                    frequency_penalty: Some(0.0),
                    presence_penalty: Some(0.0),
                    stream: true,
                },
            }
        }
    }
}
