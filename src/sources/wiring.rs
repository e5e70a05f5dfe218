//! Assemble the enabled sources from configuration

use std::sync::Arc;

use super::composite::CompositeJobSource;
use super::external::{ExternalJobSource, HttpExternalJobsClient};
use super::internal::{InternalJobSource, JobRepository};
use super::JobSource;
use crate::config::{AppConfig, SourcesConfig};
use crate::error::JobError;

/// Enabled sources in registration order: internal first, then external.
pub fn build_sources(
    config: &SourcesConfig,
    repository: Arc<dyn JobRepository>,
) -> Result<Vec<Arc<dyn JobSource>>, JobError> {
    let mut sources: Vec<Arc<dyn JobSource>> = Vec::new();

    if config.internal.enabled {
        sources.push(Arc::new(InternalJobSource::new(repository)));
    } else {
        tracing::info!("Internal job source disabled");
    }

    if config.external.enabled {
        let client = HttpExternalJobsClient::from_config(&config.external).map_err(|e| {
            JobError::Configuration {
                message: format!("external source: {e}"),
            }
        })?;
        sources.push(Arc::new(ExternalJobSource::with_transport(Arc::new(client))));
    } else {
        tracing::info!("External job source disabled");
    }

    if sources.is_empty() {
        tracing::warn!("No job sources enabled, searches will return nothing");
    }
    Ok(sources)
}

/// Composite over the enabled sources with the configured timeout.
pub fn build_composite(
    config: &AppConfig,
    repository: Arc<dyn JobRepository>,
) -> Result<CompositeJobSource, JobError> {
    let sources = build_sources(&config.sources, repository)?;
    Ok(CompositeJobSource::new(sources).with_timeout(config.aggregator.source_timeout()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sources::internal::InMemoryJobRepository;
    use std::time::Duration;

    fn repository() -> Arc<dyn JobRepository> {
        Arc::new(InMemoryJobRepository::new())
    }

    #[test]
    fn test_builds_enabled_sources_in_order() {
        let sources = build_sources(&SourcesConfig::default(), repository()).unwrap();
        let names: Vec<&str> = sources.iter().map(|s| s.name()).collect();
        assert_eq!(names, vec!["INTERNAL", "EXTERNAL_API"]);
    }

    #[test]
    fn test_respects_toggles() {
        let mut config = SourcesConfig::default();
        config.external.enabled = false;
        let sources = build_sources(&config, repository()).unwrap();
        assert_eq!(sources.len(), 1);
        assert_eq!(sources[0].name(), "INTERNAL");

        config.internal.enabled = false;
        assert!(build_sources(&config, repository()).unwrap().is_empty());
    }

    #[test]
    fn test_invalid_external_url_is_a_configuration_error() {
        let mut config = SourcesConfig::default();
        config.external.base_url = "::not a url::".to_string();
        let result = build_sources(&config, repository());
        assert!(matches!(result, Err(JobError::Configuration { .. })));
    }

    #[test]
    fn test_composite_uses_configured_timeout() {
        let mut config = AppConfig::default();
        config.aggregator.source_timeout_ms = 750;
        let composite = build_composite(&config, repository()).unwrap();
        assert_eq!(composite.source_timeout(), Duration::from_millis(750));
        assert_eq!(composite.source_names(), vec!["INTERNAL", "EXTERNAL_API"]);
    }
}
