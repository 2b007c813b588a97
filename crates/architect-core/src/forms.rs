//! Text input state shared by the auth screens.

/// One editable text field.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TextInput {
    pub label: &'static str,
    pub placeholder: &'static str,
    pub masked: bool,
    value: String,
}

impl TextInput {
    pub fn new(label: &'static str, placeholder: &'static str) -> Self {
        Self {
            label,
            placeholder,
            masked: false,
            value: String::new(),
        }
    }

    /// A password field; rendered masked.
    pub fn secret(label: &'static str, placeholder: &'static str) -> Self {
        Self {
            masked: true,
            ..Self::new(label, placeholder)
        }
    }

    pub fn value(&self) -> &str {
        &self.value
    }

    pub fn set_value(&mut self, value: impl Into<String>) {
        self.value = value.into();
    }

    pub fn push(&mut self, c: char) {
        if !c.is_control() {
            self.value.push(c);
        }
    }

    pub fn backspace(&mut self) {
        self.value.pop();
    }

    pub fn clear(&mut self) {
        self.value.clear();
    }

    /// Returns true if the value is blank after trimming.
    pub fn is_blank(&self) -> bool {
        self.value.trim().is_empty()
    }

    /// What to draw: bullets for secrets.
    pub fn display_value(&self) -> String {
        if self.masked {
            "•".repeat(self.value.chars().count())
        } else {
            self.value.clone()
        }
    }
}
