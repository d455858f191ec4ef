mod config;
mod errors;
mod extraction;
mod matching;
mod models;
mod nlp;
mod parsing;
mod routes;
mod state;
mod upload;
mod web;

use anyhow::{Context, Result};
use std::sync::Arc;
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use crate::config::Config;
use crate::matching::JobMatcher;
use crate::nlp::{vocabulary::SkillVocabulary, Pipeline};
use crate::parsing::ResumeParser;
use crate::routes::build_router;
use crate::state::AppState;
use crate::upload::UploadStore;

#[tokio::main]
async fn main() -> Result<()> {
    // Load configuration first (fails on malformed values)
    let config = Config::from_env()?;

    // Initialize structured logging
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| {
            EnvFilter::new(format!(
                "{}={},tower_http={}",
                env!("CARGO_CRATE_NAME"),
                &config.rust_log,
                &config.rust_log
            ))
        }))
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!(
        "Starting Matcher API v{} (debug: {})",
        env!("CARGO_PKG_VERSION"),
        config.debug
    );

    // Skill vocabulary and NLP pipeline
    let vocabulary = SkillVocabulary::from_jsonl_path(&config.skill_patterns_path)
        .context("Failed to load skill vocabulary")?;
    let parser = Arc::new(ResumeParser::new(Pipeline::new(vocabulary)));
    info!(
        "NLP pipeline ready ({} skill patterns)",
        parser.pipeline().vocabulary_len()
    );

    // Job catalog and vector space
    let matcher = Arc::new(
        JobMatcher::from_path(&config.job_listings_path)
            .context("Failed to load job listings")?,
    );
    info!("Job matcher ready ({} jobs)", matcher.len());

    let uploads = UploadStore::new(&config.upload_dir).with_context(|| {
        format!("Failed to create upload directory {}", config.upload_dir.display())
    })?;

    // Build app state
    let state = AppState {
        config: config.clone(),
        parser,
        matcher,
        uploads,
    };

    // Build router
    let app = build_router(state)
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive());

    let listener = tokio::net::TcpListener::bind(config.listen_addr())
        .await
        .with_context(|| format!("Failed to bind {}:{}", config.host, config.port))?;
    info!("Listening on {}", listener.local_addr()?);
    axum::serve(listener, app).await?;

    Ok(())
}
