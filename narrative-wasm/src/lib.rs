//! Bridge WASM <-> JavaScript cho pipeline tường thuật.

use narrative_core::{
    NarrativeError, NarrativeOutput, SummaryConfig, SummaryPrompt, SummaryRequest, TracingObserver,
};
use serde::{Deserialize, Serialize};
use serde_wasm_bindgen::{from_value, to_value};
use wasm_bindgen::prelude::*;

#[derive(Deserialize)]
struct JsSummaryConfig {
    #[serde(default)]
    model: Option<String>,
    #[serde(default)]
    max_tokens: Option<u32>,
    #[serde(default)]
    temperature: Option<f32>,
    #[serde(default)]
    system_prompt: Option<String>,
    #[serde(default)]
    max_focus_chars: Option<usize>,
}

impl From<JsSummaryConfig> for SummaryConfig {
    fn from(cfg: JsSummaryConfig) -> Self {
        let mut base = SummaryConfig::default();
        if let Some(model) = cfg.model {
            base.model = model;
        }
        if let Some(max_tokens) = cfg.max_tokens {
            base.max_tokens = max_tokens;
        }
        if let Some(temperature) = cfg.temperature {
            base.temperature = temperature;
        }
        if let Some(system_prompt) = cfg.system_prompt {
            base.system_prompt = system_prompt;
        }
        if let Some(max_focus_chars) = cfg.max_focus_chars {
            base.max_focus_chars = max_focus_chars;
        }
        base
    }
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct JsNarrative {
    #[serde(flatten)]
    narrative: NarrativeOutput,
    prompt: SummaryPrompt,
}

#[wasm_bindgen]
pub fn prepare_narrative(
    input_bundle: JsValue,
    focus: Option<String>,
    config: Option<JsValue>,
) -> Result<JsValue, JsValue> {
    #[cfg(target_arch = "wasm32")]
    console_error_panic_hook::set_once();

    let bundle_value = from_value::<serde_json::Value>(input_bundle)
        .map_err(|err| JsValue::from_str(&format!("Không đọc được JSON bundle: {err}")))?;

    let cfg = match config {
        Some(js_cfg) => {
            let cfg: JsSummaryConfig = from_value(js_cfg)
                .map_err(|err| JsValue::from_str(&format!("Không đọc được config: {err}")))?;
            SummaryConfig::from(cfg)
        }
        None => SummaryConfig::default(),
    };

    let narrative = narrative_fhir::prepare_narrative(&bundle_value, &TracingObserver)
        .map_err(|err| JsValue::from_str(&format_narrative_error(err)))?;

    let request = SummaryRequest::new(narrative, focus.as_deref(), &cfg);
    let prompt = narrative_fhir::build_prompt(&request, &cfg);

    to_value(&JsNarrative {
        narrative: request.narrative,
        prompt,
    })
    .map_err(|err| JsValue::from_str(&format!("Không serialize kết quả: {err}")))
}

fn format_narrative_error(err: NarrativeError) -> String {
    format!("Narrative error: {err}")
}
