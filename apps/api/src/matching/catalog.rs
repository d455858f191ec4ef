use std::collections::{BTreeMap, HashSet};
use std::io::Read;
use std::path::Path;

use thiserror::Error;
use tracing::{info, warn};

use crate::models::job::JobPosting;

const MANDATORY_COLUMNS: [&str; 3] = ["id", "description", "required_skills"];

#[derive(Debug, Error)]
pub enum CatalogError {
    #[error("Failed to open job listings {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Malformed job listings: {0}")]
    Csv(#[from] csv::Error),

    #[error("Job listings are missing the '{0}' column")]
    MissingColumn(&'static str),

    #[error("Job listings contain no rows")]
    Empty,

    #[error("Job listings contain no indexable terms")]
    EmptyVocabulary,
}

/// The job table, in file order.
#[derive(Debug, Clone)]
pub struct JobCatalog {
    headers: Vec<String>,
    jobs: Vec<JobPosting>,
}

impl JobCatalog {
    pub fn from_path(path: &Path) -> Result<Self, CatalogError> {
        let file = std::fs::File::open(path).map_err(|source| CatalogError::Io {
            path: path.display().to_string(),
            source,
        })?;
        let catalog = Self::from_reader(file)?;
        info!("Loaded {} job postings from {}", catalog.len(), path.display());
        Ok(catalog)
    }

    pub fn from_reader<R: Read>(reader: R) -> Result<Self, CatalogError> {
        let mut csv = csv::Reader::from_reader(reader);
        let headers: Vec<String> = csv.headers()?.iter().map(|h| h.trim().to_string()).collect();

        let mut positions = [0usize; 3];
        for (slot, column) in positions.iter_mut().zip(MANDATORY_COLUMNS) {
            *slot = headers
                .iter()
                .position(|h| h == column)
                .ok_or(CatalogError::MissingColumn(column))?;
        }
        let [id_at, description_at, skills_at] = positions;

        let mut jobs = Vec::new();
        let mut seen = HashSet::new();
        for record in csv.records() {
            let record = record?;
            let cell = |at: usize| record.get(at).unwrap_or_default().to_string();

            let attributes: BTreeMap<String, String> = headers
                .iter()
                .enumerate()
                .filter(|(at, _)| !positions.contains(at))
                .map(|(at, name)| (name.clone(), cell(at)))
                .collect();

            let job = JobPosting {
                id: cell(id_at),
                description: cell(description_at),
                required_skills: cell(skills_at),
                attributes,
            };
            if !seen.insert(job.id.clone()) {
                warn!("Duplicate job id {}; lookups return the first row", job.id);
            }
            jobs.push(job);
        }

        if jobs.is_empty() {
            return Err(CatalogError::Empty);
        }
        Ok(Self { headers, jobs })
    }

    /// Column names in file order.
    pub fn headers(&self) -> &[String] {
        &self.headers
    }

    pub fn jobs(&self) -> &[JobPosting] {
        &self.jobs
    }

    /// First row with this id.
    pub fn get(&self, id: &str) -> Option<&JobPosting> {
        self.jobs.iter().find(|job| job.id == id)
    }

    pub fn len(&self) -> usize {
        self.jobs.len()
    }
}
