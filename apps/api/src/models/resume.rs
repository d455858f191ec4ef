use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};

/// A single employer mention pulled out of the resume text.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Experience {
    pub organization: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub duration: Option<String>,
}

impl Experience {
    pub fn new(organization: impl Into<String>) -> Self {
        Self {
            organization: organization.into(),
            duration: None,
        }
    }
}

/// Structured fields extracted from one uploaded resume.
/// Built once per upload and never mutated or persisted afterwards.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ResumeRecord {
    pub name: Option<String>,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub skills: BTreeSet<String>,
    /// Whole sentences that mention a degree keyword, in document order.
    pub education: Vec<String>,
    pub experience: Vec<Experience>,
    pub raw_text: String,
}

impl ResumeRecord {
    pub fn skill_list(&self) -> Vec<String> {
        self.skills.iter().cloned().collect()
    }
}
