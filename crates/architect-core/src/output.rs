//! Generated plan output.

pub const PLACEHOLDER_HTML: &str = r#"<p class="text-center text-slate-400">Your personalized diet plan will appear here. Fill out the patient details and click the button to begin.</p>"#;

pub const VALIDATION_HTML: &str = r#"<p class="text-center font-semibold text-red-500">Please fill in all required fields: Patient Name, Age, and Prakriti.</p>"#;

pub const FAILURE_HTML: &str = r#"<p class="text-center font-semibold text-red-500">An error occurred while generating the diet plan. Please check the logs for details and try again.</p>"#;

/// What the output panel draws.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputView<'a> {
    Loading,
    Markup(&'a str),
}

/// Plan markup plus the in-flight flag.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlanOutput {
    html: String,
    generating: bool,
}

impl Default for PlanOutput {
    fn default() -> Self {
        Self {
            html: PLACEHOLDER_HTML.to_string(),
            generating: false,
        }
    }
}

impl PlanOutput {
    pub fn view(&self) -> OutputView<'_> {
        if self.generating {
            OutputView::Loading
        } else {
            OutputView::Markup(&self.html)
        }
    }

    pub fn html(&self) -> &str {
        &self.html
    }

    pub fn is_generating(&self) -> bool {
        self.generating
    }

    /// Clear the previous plan and show the loading state.
    pub(crate) fn begin(&mut self) {
        self.html.clear();
        self.generating = true;
    }

    pub(crate) fn show(&mut self, html: impl Into<String>) {
        self.html = html.into();
        self.generating = false;
    }
}
