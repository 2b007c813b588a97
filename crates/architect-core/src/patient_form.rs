//! Patient Details form: field metadata and a focus cursor.
//!
//! The form only edits a [`PatientData`]; required-field checks happen in the
//! composer when a plan is requested.

use diet_plan_generator::{
    PatientData, DIGESTION_OPTIONS, GENDER_OPTIONS, PRAKRITI_OPTIONS, VIKRITI_OPTIONS,
};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldKind {
    Text,
    Number,
    Select(&'static [&'static str]),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PatientField {
    PatientName,
    Age,
    Gender,
    Prakriti,
    Vikriti,
    Digestion,
    Allergies,
    HealthGoals,
}

impl PatientField {
    pub const ALL: [PatientField; 8] = [
        PatientField::PatientName,
        PatientField::Age,
        PatientField::Gender,
        PatientField::Prakriti,
        PatientField::Vikriti,
        PatientField::Digestion,
        PatientField::Allergies,
        PatientField::HealthGoals,
    ];

    pub fn label(&self) -> &'static str {
        match self {
            PatientField::PatientName => "Patient Full Name",
            PatientField::Age => "Age",
            PatientField::Gender => "Gender",
            PatientField::Prakriti => "Prakriti (Constitution)",
            PatientField::Vikriti => "Vikriti (Current Imbalance)",
            PatientField::Digestion => "Digestive Strength",
            PatientField::Allergies => "Allergies (comma-separated)",
            PatientField::HealthGoals => "Health Goals",
        }
    }

    pub fn placeholder(&self) -> &'static str {
        match self {
            PatientField::Allergies => "e.g., Peanuts, Gluten",
            PatientField::HealthGoals => "e.g., Improve digestion, Reduce stress",
            _ => "",
        }
    }

    pub fn is_required(&self) -> bool {
        matches!(
            self,
            PatientField::PatientName | PatientField::Age | PatientField::Prakriti
        )
    }

    pub fn kind(&self) -> FieldKind {
        match self {
            PatientField::Age => FieldKind::Number,
            PatientField::Gender => FieldKind::Select(GENDER_OPTIONS),
            PatientField::Prakriti => FieldKind::Select(PRAKRITI_OPTIONS),
            PatientField::Vikriti => FieldKind::Select(VIKRITI_OPTIONS),
            PatientField::Digestion => FieldKind::Select(DIGESTION_OPTIONS),
            _ => FieldKind::Text,
        }
    }

    pub fn value<'a>(&self, data: &'a PatientData) -> &'a str {
        match self {
            PatientField::PatientName => &data.patient_name,
            PatientField::Age => &data.age,
            PatientField::Gender => &data.gender,
            PatientField::Prakriti => &data.prakriti,
            PatientField::Vikriti => &data.vikriti,
            PatientField::Digestion => &data.digestion,
            PatientField::Allergies => &data.allergies,
            PatientField::HealthGoals => &data.health_goals,
        }
    }

    fn value_mut<'a>(&self, data: &'a mut PatientData) -> &'a mut String {
        match self {
            PatientField::PatientName => &mut data.patient_name,
            PatientField::Age => &mut data.age,
            PatientField::Gender => &mut data.gender,
            PatientField::Prakriti => &mut data.prakriti,
            PatientField::Vikriti => &mut data.vikriti,
            PatientField::Digestion => &mut data.digestion,
            PatientField::Allergies => &mut data.allergies,
            PatientField::HealthGoals => &mut data.health_goals,
        }
    }
}

/// Focus cursor over [`PatientField::ALL`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PatientForm {
    focus: usize,
}

impl PatientForm {
    pub fn focused(&self) -> PatientField {
        PatientField::ALL[self.focus % PatientField::ALL.len()]
    }

    pub fn focus_next(&mut self) {
        self.focus = (self.focus + 1) % PatientField::ALL.len();
    }

    pub fn focus_prev(&mut self) {
        self.focus = (self.focus + PatientField::ALL.len() - 1) % PatientField::ALL.len();
    }

    /// Type a character into the focused field. Select fields ignore typing;
    /// number fields accept digits only.
    pub fn insert_char(&self, data: &mut PatientData, c: char) -> bool {
        let field = self.focused();
        let accepted = match field.kind() {
            FieldKind::Select(_) => false,
            FieldKind::Number => c.is_ascii_digit(),
            FieldKind::Text => !c.is_control(),
        };
        if accepted {
            field.value_mut(data).push(c);
        }
        accepted
    }

    pub fn backspace(&self, data: &mut PatientData) {
        let field = self.focused();
        if !matches!(field.kind(), FieldKind::Select(_)) {
            field.value_mut(data).pop();
        }
    }

    /// Step a select field through its options, wrapping at either end.
    /// A value outside the list moves to the first option.
    pub fn cycle_option(&self, data: &mut PatientData, forward: bool) {
        let field = self.focused();
        let FieldKind::Select(options) = field.kind() else {
            return;
        };
        let value = field.value_mut(data);
        let next = match options.iter().position(|o| *o == value.as_str()) {
            Some(i) if forward => (i + 1) % options.len(),
            Some(i) => (i + options.len() - 1) % options.len(),
            None => 0,
        };
        *value = options[next].to_string();
    }
}
