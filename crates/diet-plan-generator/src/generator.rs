//! Diet plan generation entry point.

use crate::client::GenerationService;
use crate::error::GenerationResult;
use crate::patient::PatientData;
use crate::prompt::build_prompt;
use std::sync::Arc;

pub const DEFAULT_MODEL: &str = "gemini-2.5-flash";

const HTML_FENCE_OPEN: &str = "```html";
const FENCE_CLOSE: &str = "```";

/// Trim the text and drop one leading "```html" and one trailing "```".
pub fn strip_code_fence(text: &str) -> String {
    let mut html = text.trim();
    if let Some(rest) = html.strip_prefix(HTML_FENCE_OPEN) {
        html = rest;
    }
    if let Some(rest) = html.strip_suffix(FENCE_CLOSE) {
        html = rest;
    }
    html.trim().to_string()
}

/// Generates HTML diet plans through a [`GenerationService`].
#[derive(Clone)]
pub struct DietPlanGenerator {
    service: Arc<dyn GenerationService>,
    model: String,
}

impl DietPlanGenerator {
    pub fn new(service: Arc<dyn GenerationService>, model: impl Into<String>) -> Self {
        Self {
            service,
            model: model.into(),
        }
    }

    pub fn model(&self) -> &str {
        &self.model
    }

    /// Generate a plan for the patient.
    ///
    /// No retries. Failures are logged and returned unchanged.
    pub async fn generate_diet_plan(&self, data: &PatientData) -> GenerationResult<String> {
        let prompt = build_prompt(data);

        tracing::debug!(
            model = %self.model,
            prakriti = %data.prakriti,
            vikriti = %data.vikriti,
            "Generating diet plan"
        );

        match self.service.generate(&self.model, &prompt).await {
            Ok(text) => {
                let html = strip_code_fence(&text);
                tracing::info!(model = %self.model, html_len = html.len(), "Diet plan generated");
                Ok(html)
            }
            Err(e) => {
                tracing::error!(model = %self.model, error = %e, "Diet plan generation failed");
                Err(e)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::GenerationError;
    use async_trait::async_trait;
    use parking_lot::Mutex;

    #[derive(Default)]
    struct RecordingService {
        calls: Mutex<Vec<(String, String)>>,
        reply: Mutex<Option<String>>,
    }

    #[async_trait]
    impl GenerationService for RecordingService {
        async fn generate(&self, model: &str, prompt: &str) -> GenerationResult<String> {
            self.calls.lock().push((model.to_string(), prompt.to_string()));
            self.reply
                .lock()
                .clone()
                .ok_or_else(|| GenerationError::InvalidResponse("scripted failure".to_string()))
        }
    }

    fn patient() -> PatientData {
        PatientData {
            patient_name: "Asha Rao".to_string(),
            age: "34".to_string(),
            ..PatientData::default()
        }
    }

    #[test]
    fn test_strip_code_fence() {
        assert_eq!(strip_code_fence("```html\n<div>x</div>\n```"), "<div>x</div>");
        assert_eq!(strip_code_fence("  <div>x</div>  "), "<div>x</div>");
        assert_eq!(strip_code_fence("<div>x</div>\n```"), "<div>x</div>");
        assert_eq!(strip_code_fence("```html<p>a</p>"), "<p>a</p>");
    }

    #[test]
    fn test_strip_code_fence_only_once() {
        assert_eq!(strip_code_fence("```html```html<p/>``````"), "```html<p/>```");
    }

    #[test]
    fn test_plain_fence_is_not_an_html_fence() {
        assert_eq!(strip_code_fence("```\n<p/>\n```"), "```\n<p/>");
    }

    #[tokio::test]
    async fn test_generate_uses_model_and_prompt() {
        let service = Arc::new(RecordingService::default());
        *service.reply.lock() = Some("```html\n<div>plan</div>\n```".to_string());
        let generator = DietPlanGenerator::new(service.clone(), DEFAULT_MODEL);

        let html = generator.generate_diet_plan(&patient()).await.unwrap();
        assert_eq!(html, "<div>plan</div>");

        let calls = service.calls.lock();
        assert_eq!(calls.len(), 1);
        assert_eq!(calls[0].0, "gemini-2.5-flash");
        assert!(calls[0].1.contains("Asha Rao"));
    }

    #[tokio::test]
    async fn test_generate_propagates_failure() {
        let service = Arc::new(RecordingService::default());
        let generator = DietPlanGenerator::new(service, "custom-model");
        assert_eq!(generator.model(), "custom-model");

        assert!(generator.generate_diet_plan(&patient()).await.is_err());
    }
}
