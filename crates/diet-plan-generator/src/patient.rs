//! Patient details collected by the form.

use serde::{Deserialize, Serialize};

pub const GENDER_OPTIONS: &[&str] = &["Male", "Female", "Other"];

pub const PRAKRITI_OPTIONS: &[&str] = &[
    "Vata",
    "Pitta",
    "Kapha",
    "Vata-Pitta",
    "Pitta-Kapha",
    "Vata-Kapha",
    "Tridoshic",
];

pub const VIKRITI_OPTIONS: &[&str] = &[
    "Balanced",
    "Vata Imbalance",
    "Pitta Imbalance",
    "Kapha Imbalance",
];

pub const DIGESTION_OPTIONS: &[&str] = &[
    "Strong (Tikshna Agni)",
    "Average",
    "Weak (Manda Agni)",
    "Irregular (Vishama Agni)",
];

/// Flat record of patient attributes. Every field is free text; the select
/// fields hold one of the option strings above.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PatientData {
    pub patient_name: String,
    pub age: String,
    pub gender: String,
    pub prakriti: String,
    pub vikriti: String,
    pub digestion: String,
    pub allergies: String,
    pub health_goals: String,
}

impl Default for PatientData {
    fn default() -> Self {
        Self {
            patient_name: String::new(),
            age: String::new(),
            gender: "Male".to_string(),
            prakriti: "Vata".to_string(),
            vikriti: "Balanced".to_string(),
            digestion: "Average".to_string(),
            allergies: String::new(),
            health_goals: String::new(),
        }
    }
}

impl PatientData {
    /// Labels of required fields that are blank after trimming.
    pub fn missing_required_fields(&self) -> Vec<&'static str> {
        let mut missing = Vec::new();
        if self.patient_name.trim().is_empty() {
            missing.push("Patient Name");
        }
        if self.age.trim().is_empty() {
            missing.push("Age");
        }
        if self.prakriti.trim().is_empty() {
            missing.push("Prakriti");
        }
        missing
    }

    pub fn has_required_fields(&self) -> bool {
        self.missing_required_fields().is_empty()
    }
}
