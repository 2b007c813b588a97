//! Prompt construction.

use crate::patient::PatientData;

const PROMPT_TEMPLATE: &str = include_str!("prompt_template.txt");

const NO_ALLERGIES: &str = "None specified";

/// Fill `{name}` placeholders in one pass so patient text that happens to
/// look like a placeholder is left alone.
fn render(template: &str, lookup: impl Fn(&str) -> Option<String>) -> String {
    let mut out = String::with_capacity(template.len() + 256);
    let mut rest = template;

    while let Some(start) = rest.find('{') {
        out.push_str(&rest[..start]);
        let after = &rest[start + 1..];
        match after.find('}') {
            Some(end) => match lookup(&after[..end]) {
                Some(value) => {
                    out.push_str(&value);
                    rest = &after[end + 1..];
                }
                None => {
                    out.push('{');
                    rest = after;
                }
            },
            None => {
                out.push_str(&rest[start..]);
                rest = "";
            }
        }
    }
    out.push_str(rest);
    out
}

/// Build the generation prompt for a patient.
pub fn build_prompt(data: &PatientData) -> String {
    render(PROMPT_TEMPLATE, |key| {
        let value = match key {
            "patient_name" => &data.patient_name,
            "age" => &data.age,
            "gender" => &data.gender,
            "prakriti" => &data.prakriti,
            "vikriti" => &data.vikriti,
            "digestion" => &data.digestion,
            "allergies" if data.allergies.is_empty() => return Some(NO_ALLERGIES.to_string()),
            "allergies" => &data.allergies,
            "health_goals" => &data.health_goals,
            _ => return None,
        };
        Some(value.clone())
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn patient() -> PatientData {
        PatientData {
            patient_name: "Asha Rao".to_string(),
            age: "34".to_string(),
            prakriti: "Pitta-Kapha".to_string(),
            vikriti: "Pitta Imbalance".to_string(),
            allergies: "Peanuts, Gluten".to_string(),
            health_goals: "Improve digestion".to_string(),
            ..PatientData::default()
        }
    }

    #[test]
    fn test_prompt_contains_patient_details() {
        let prompt = build_prompt(&patient());
        assert!(prompt.starts_with("You are an expert Ayurvedic nutritional consultant"));
        assert!(prompt.contains("- **Full Name:** Asha Rao"));
        assert!(prompt.contains("- **Age:** 34"));
        assert!(prompt.contains("- **Gender:** Male"));
        assert!(prompt.contains("- **Prakriti (Natural Constitution):** Pitta-Kapha"));
        assert!(prompt.contains("- **Vikriti (Current Imbalance):** Pitta Imbalance"));
        assert!(prompt.contains("- **Digestive Strength (Agni):** Average"));
        assert!(prompt.contains("- **Known Allergies:** Peanuts, Gluten"));
        assert!(prompt.contains("- **Primary Health Goals:** Improve digestion"));
        assert!(prompt.contains("for a dark background."));
    }

    #[test]
    fn test_empty_allergies_rendered_as_none_specified() {
        let data = PatientData {
            allergies: String::new(),
            ..patient()
        };
        assert!(build_prompt(&data).contains("- **Known Allergies:** None specified"));
    }

    #[test]
    fn test_no_placeholders_left() {
        let prompt = build_prompt(&patient());
        assert!(!prompt.contains("{patient_name}"));
        assert!(!prompt.contains("{health_goals}"));
    }

    #[test]
    fn test_placeholder_like_input_not_expanded() {
        let data = PatientData {
            patient_name: "{age}".to_string(),
            ..patient()
        };
        assert!(build_prompt(&data).contains("- **Full Name:** {age}"));
    }

    #[test]
    fn test_render_keeps_unknown_braces() {
        let rendered = render("a {x} {unknown} {", |key| {
            (key == "x").then(|| "1".to_string())
        });
        assert_eq!(rendered, "a 1 {unknown} {");
    }
}
