//! Ayurvedic diet plan generation.
//!
//! Turns a [`PatientData`] record into a prompt, sends it to a text
//! generation service (Gemini by default) and returns the HTML plan with any
//! wrapping code fence removed.

mod client;
mod error;
mod generator;
mod patient;
mod prompt;

pub use client::{GeminiClient, GenerationService, GEMINI_API_URL};
pub use error::{GenerationError, GenerationResult};
pub use generator::{strip_code_fence, DietPlanGenerator, DEFAULT_MODEL};
pub use patient::{
    PatientData, DIGESTION_OPTIONS, GENDER_OPTIONS, PRAKRITI_OPTIONS, VIKRITI_OPTIONS,
};
pub use prompt::build_prompt;
