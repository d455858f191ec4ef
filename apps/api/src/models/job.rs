use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// One row of the job listings table.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct JobPosting {
    pub id: String,
    pub description: String,
    pub required_skills: String,
    /// Every other column of the table (title, company, location, ...).
    #[serde(flatten)]
    pub attributes: BTreeMap<String, String>,
}

impl JobPosting {
    /// Looks a column up by header name, mandatory columns included.
    pub fn field(&self, column: &str) -> Option<&str> {
        match column {
            "id" => Some(&self.id),
            "description" => Some(&self.description),
            "required_skills" => Some(&self.required_skills),
            other => self.attributes.get(other).map(String::as_str),
        }
    }

    /// Display title: the `title` column when present, otherwise `Job <id>`.
    pub fn title(&self) -> String {
        self.attributes
            .get("title")
            .filter(|t| !t.trim().is_empty())
            .cloned()
            .unwrap_or_else(|| format!("Job {}", self.id))
    }

    /// Text the vector space is fitted on.
    pub fn document(&self) -> String {
        format!("{} {}", self.description, self.required_skills)
    }
}

/// A job posting paired with its cosine similarity to a resume.
#[derive(Debug, Clone, Serialize)]
pub struct JobMatch {
    pub job: JobPosting,
    /// 0.0 – 1.0
    pub score: f64,
}
