//! Fill reports returned to the caller.

use serde::{Deserialize, Serialize};

/// A field that received a value.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FilledField {
    pub identifier: String,
    pub value: String,
}

/// A matched field that was left untouched.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SkippedField {
    pub identifier: String,
    pub reason: String,
}

/// Coarse outcome of an invocation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FillOutcome {
    Filled,
    NoFieldsFound,
    NoMatchingFields,
    Failed,
}

/// Result of one fill invocation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FillReport {
    pub success: bool,
    pub filled_count: usize,
    pub filled_fields: Vec<FilledField>,
    pub message: String,
    /// Number of candidate fields discovered.
    #[serde(default)]
    pub detected_count: usize,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub skipped: Vec<SkippedField>,
    #[serde(skip)]
    outcome: Option<FillOutcome>,
}

impl FillReport {
    pub const NO_FIELDS_MESSAGE: &'static str = "No form fields found";

    /// Report for a completed pass over `detected` candidates.
    pub fn completed(
        detected: usize,
        filled_fields: Vec<FilledField>,
        skipped: Vec<SkippedField>,
    ) -> Self {
        if detected == 0 {
            return Self::no_fields_found();
        }
        let filled_count = filled_fields.len();
        if filled_count == 0 {
            return Self {
                success: false,
                filled_count: 0,
                filled_fields,
                message: format!(
                    "No fields were filled. Detected {} fields but no matching profile data found.",
                    detected
                ),
                detected_count: detected,
                skipped,
                outcome: Some(FillOutcome::NoMatchingFields),
            };
        }
        Self {
            success: true,
            filled_count,
            filled_fields,
            message: format!("Successfully filled {} form fields", filled_count),
            detected_count: detected,
            skipped,
            outcome: Some(FillOutcome::Filled),
        }
    }

    /// Report for a page with no candidate fields.
    pub fn no_fields_found() -> Self {
        Self {
            success: false,
            filled_count: 0,
            filled_fields: Vec::new(),
            message: Self::NO_FIELDS_MESSAGE.to_string(),
            detected_count: 0,
            skipped: Vec::new(),
            outcome: Some(FillOutcome::NoFieldsFound),
        }
    }

    /// Report for an invocation that could not run.
    pub fn failed(diagnostic: impl std::fmt::Display) -> Self {
        Self {
            success: false,
            filled_count: 0,
            filled_fields: Vec::new(),
            message: format!("Form fill failed: {}", diagnostic),
            detected_count: 0,
            skipped: Vec::new(),
            outcome: Some(FillOutcome::Failed),
        }
    }

    /// Outcome of this report.
    ///
    /// Reports received over the wire carry no explicit outcome; it is derived
    /// from the counts and message.
    pub fn outcome(&self) -> FillOutcome {
        if let Some(outcome) = self.outcome {
            return outcome;
        }
        if self.success {
            FillOutcome::Filled
        } else if self.message.starts_with("Form fill failed") {
            FillOutcome::Failed
        } else if self.detected_count == 0 {
            FillOutcome::NoFieldsFound
        } else {
            FillOutcome::NoMatchingFields
        }
    }
}
