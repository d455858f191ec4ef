//! Job matching: ranks the job catalog against a parsed resume by TF-IDF
//! cosine similarity.

pub mod catalog;
pub mod tfidf;

use std::path::Path;

use tracing::{debug, info};

use crate::models::job::{JobMatch, JobPosting};
use crate::models::resume::Experience;

pub use catalog::{CatalogError, JobCatalog};
use tfidf::{cosine, SparseVector, TfidfVectorizer};

pub const DEFAULT_TOP_N: usize = 5;

/// Fitted once at startup; read-only afterwards.
#[derive(Debug, Clone)]
pub struct JobMatcher {
    catalog: JobCatalog,
    vectorizer: TfidfVectorizer,
    job_vectors: Vec<SparseVector>,
}

impl JobMatcher {
    pub fn from_path(path: &Path) -> Result<Self, CatalogError> {
        Self::from_catalog(JobCatalog::from_path(path)?)
    }

    pub fn from_catalog(catalog: JobCatalog) -> Result<Self, CatalogError> {
        let documents: Vec<String> = catalog.jobs().iter().map(JobPosting::document).collect();
        let vectorizer = TfidfVectorizer::fit(&documents);
        if vectorizer.vocabulary_len() == 0 {
            return Err(CatalogError::EmptyVocabulary);
        }
        let job_vectors = documents.iter().map(|d| vectorizer.transform(d)).collect();
        info!(
            "Fitted job vector space: {} jobs, {} terms",
            catalog.len(),
            vectorizer.vocabulary_len()
        );

        Ok(Self {
            catalog,
            vectorizer,
            job_vectors,
        })
    }

    /// Top `top_n` jobs by similarity to the skills and employers given.
    /// Ties keep table order.
    pub fn match_jobs(
        &self,
        skills: &[String],
        experience: &[Experience],
        top_n: usize,
    ) -> Vec<JobMatch> {
        let organizations: Vec<&str> = experience.iter().map(|e| e.organization.as_str()).collect();
        let query = format!("{} {}", skills.join(" "), organizations.join(" "));
        let query_vector = self.vectorizer.transform(&query);
        debug!("Match query {query:?} has {} known terms", query_vector.len());

        let mut scored: Vec<(usize, f64)> = self
            .job_vectors
            .iter()
            .map(|v| cosine(&query_vector, v))
            .enumerate()
            .collect();
        scored.sort_by(|a, b| b.1.total_cmp(&a.1));

        scored
            .into_iter()
            .take(top_n)
            .map(|(idx, score)| JobMatch {
                job: self.catalog.jobs()[idx].clone(),
                score,
            })
            .collect()
    }

    pub fn get_job(&self, id: &str) -> Option<&JobPosting> {
        self.catalog.get(id)
    }

    pub fn catalog(&self) -> &JobCatalog {
        &self.catalog
    }

    pub fn len(&self) -> usize {
        self.catalog.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const JOBS: &str = "id,title,description,required_skills\n\
        1,Web Developer,Build web apps,Python Flask\n\
        2,Data Analyst,Analyze data,SQL Tableau\n\
        3,ML Engineer,Train models,Python TensorFlow\n";

    fn matcher() -> JobMatcher {
        JobMatcher::from_catalog(JobCatalog::from_reader(JOBS.as_bytes()).unwrap()).unwrap()
    }

    fn skills(list: &[&str]) -> Vec<String> {
        list.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_web_skills_rank_web_job_first() {
        let csv = "id,description,required_skills\n1,Build web apps,Python Flask\n2,Analyze data,SQL Tableau\n";
        let m = JobMatcher::from_catalog(JobCatalog::from_reader(csv.as_bytes()).unwrap()).unwrap();
        let results = m.match_jobs(&skills(&["Python", "Flask"]), &[], 5);
        assert_eq!(results[0].job.id, "1");
        assert!(results[0].score > results[1].score);
        assert_eq!(results[1].score, 0.0);
    }

    #[test]
    fn test_results_bounded_and_descending() {
        let m = matcher();
        for top_n in 0..5 {
            let results = m.match_jobs(&skills(&["Python"]), &[], top_n);
            assert_eq!(results.len(), top_n.min(m.len()));
            assert!(results.windows(2).all(|w| w[0].score >= w[1].score));
            assert!(results.iter().all(|r| (0.0..=1.0).contains(&r.score)));
        }
    }

    #[test]
    fn test_empty_query_keeps_table_order() {
        let results = matcher().match_jobs(&[], &[], DEFAULT_TOP_N);
        let ids: Vec<&str> = results.iter().map(|r| r.job.id.as_str()).collect();
        assert_eq!(ids, vec!["1", "2", "3"]);
        assert!(results.iter().all(|r| r.score == 0.0));
    }

    #[test]
    fn test_organizations_feed_the_query() {
        let experience = vec![Experience::new("Tableau")];
        let results = matcher().match_jobs(&[], &experience, 1);
        assert_eq!(results[0].job.id, "2");
    }

    #[test]
    fn test_get_job_round_trip() {
        let m = matcher();
        let job = m.get_job("2").unwrap();
        assert_eq!(job.description, "Analyze data");
        assert_eq!(job.required_skills, "SQL Tableau");
        assert_eq!(job.field("title"), Some("Data Analyst"));
        assert!(m.get_job("42").is_none());
    }

    #[test]
    fn test_stop_word_only_catalog_is_rejected() {
        let csv = "id,description,required_skills\n1,the and,of a\n";
        let err = JobMatcher::from_catalog(JobCatalog::from_reader(csv.as_bytes()).unwrap())
            .unwrap_err();
        assert!(matches!(err, CatalogError::EmptyVocabulary));
    }
}
