use tracing::{debug, info, warn};

use crate::adaptive::fingerprint::{AdaptiveRecord, Fingerprint};
use crate::adaptive::matcher::Matcher;
use crate::adaptive::store::{FingerprintStore, MemoryStore, SqliteStore};
use crate::config::{AdaptiveConfig, StoreBackend};
use crate::dom::{Document, Element};
use crate::errors::{AdaptiveError, Result};

/// Outcome of one relocation call. Borrowed from the queried document and
/// never persisted.
#[derive(Debug, Clone, Copy)]
pub enum Relocation<'a> {
    /// The best candidate cleared the confidence threshold.
    Found { element: Element<'a>, score: f64 },
    /// Relocation ran but no candidate cleared the threshold. `best_score`
    /// is `None` when no same-tag candidate existed at all.
    NotConfident { best_score: Option<f64> },
}

impl<'a> Relocation<'a> {
    pub fn is_found(&self) -> bool {
        matches!(self, Relocation::Found { .. })
    }

    pub fn element(&self) -> Option<Element<'a>> {
        match self {
            Relocation::Found { element, .. } => Some(*element),
            Relocation::NotConfident { .. } => None,
        }
    }

    pub fn score(&self) -> Option<f64> {
        match self {
            Relocation::Found { score, .. } => Some(*score),
            Relocation::NotConfident { best_score } => *best_score,
        }
    }
}

/// Public entry point of the adaptive subsystem: captures fingerprints on
/// save and finds the best-matching element in a changed tree on relocate.
///
/// Relocation is deliberately precision-biased: a best candidate below the
/// confidence threshold is reported as not confidently found instead of
/// being returned as a guess. The score is surfaced so callers can apply
/// their own acceptance policy.
pub struct Relocator {
    store: Box<dyn FingerprintStore>,
    matcher: Matcher,
    config: AdaptiveConfig,
}

impl Relocator {
    /// Build a relocator with the backend named by the configuration.
    pub fn new(config: AdaptiveConfig) -> Result<Self> {
        config.validate()?;
        let store: Box<dyn FingerprintStore> = match config.store.backend {
            StoreBackend::Memory => Box::new(MemoryStore::new()),
            StoreBackend::Sqlite => {
                // validate() guarantees the location is present
                let location = config.store.location.clone().ok_or_else(|| {
                    AdaptiveError::ConfigurationError(
                        "sqlite backend requires a location".to_string(),
                    )
                })?;
                Box::new(SqliteStore::open(location)?)
            }
        };
        Ok(Self::from_parts(store, config))
    }

    /// Ephemeral relocator with default configuration.
    pub fn in_memory() -> Self {
        Self::from_parts(Box::new(MemoryStore::new()), AdaptiveConfig::default())
    }

    /// Use a caller-supplied store backend.
    pub fn with_store(store: Box<dyn FingerprintStore>, config: AdaptiveConfig) -> Result<Self> {
        config.validate()?;
        Ok(Self::from_parts(store, config))
    }

    fn from_parts(store: Box<dyn FingerprintStore>, config: AdaptiveConfig) -> Self {
        let matcher = Matcher::new(config.weights, config.fingerprint.clone());
        Self {
            store,
            matcher,
            config,
        }
    }

    pub fn config(&self) -> &AdaptiveConfig {
        &self.config
    }

    /// Capture and persist a fingerprint for `element` under `label`,
    /// overwriting any prior record for that label.
    pub fn save(&self, label: &str, element: &Element<'_>) -> Result<()> {
        let fingerprint = Fingerprint::capture(element, &self.config.fingerprint);
        debug!(label, tag = %fingerprint.tag, "saving fingerprint");
        self.store.put(&AdaptiveRecord::new(label, fingerprint))
    }

    /// Relocate `label` in `document` using the configured threshold.
    pub fn relocate<'a>(&self, label: &str, document: &'a Document) -> Result<Relocation<'a>> {
        self.relocate_with_threshold(label, document, self.config.threshold)
    }

    /// Relocate `label` in `document`, accepting the best candidate only if
    /// its score reaches `threshold`. Fails with
    /// [`LabelNotFound`](AdaptiveError::LabelNotFound) when the label was
    /// never saved.
    pub fn relocate_with_threshold<'a>(
        &self,
        label: &str,
        document: &'a Document,
        threshold: f64,
    ) -> Result<Relocation<'a>> {
        let record = self.load(label)?;
        let candidates = document.elements_by_tag(&record.fingerprint.tag);
        self.pick(label, &record.fingerprint, candidates, threshold)
    }

    /// Relocate over a caller-supplied candidate subset instead of a full
    /// document scan.
    pub fn relocate_among<'a>(
        &self,
        label: &str,
        candidates: Vec<Element<'a>>,
        threshold: f64,
    ) -> Result<Relocation<'a>> {
        let record = self.load(label)?;
        self.pick(label, &record.fingerprint, candidates, threshold)
    }

    /// Delete the record for `label`; later relocations fail with
    /// [`LabelNotFound`](AdaptiveError::LabelNotFound) until a new save.
    pub fn invalidate(&self, label: &str) -> Result<()> {
        debug!(label, "invalidating fingerprint");
        self.store.delete(label)
    }

    pub fn labels(&self) -> Result<Vec<String>> {
        self.store.list_labels()
    }

    fn load(&self, label: &str) -> Result<AdaptiveRecord> {
        self.store
            .get(label)?
            .ok_or_else(|| AdaptiveError::LabelNotFound(label.to_string()))
    }

    fn pick<'a>(
        &self,
        label: &str,
        stored: &Fingerprint,
        mut candidates: Vec<Element<'a>>,
        threshold: f64,
    ) -> Result<Relocation<'a>> {
        if let Some(cap) = self.config.max_candidates {
            candidates.truncate(cap);
        }
        let ranked = self.matcher.rank(stored, candidates);

        match ranked.first() {
            Some((element, score)) if *score >= threshold => {
                info!(label, score, "relocated element");
                Ok(Relocation::Found {
                    element: *element,
                    score: *score,
                })
            }
            Some((_, score)) => {
                warn!(label, best_score = score, threshold, "no confident match");
                Ok(Relocation::NotConfident {
                    best_score: Some(*score),
                })
            }
            None => {
                warn!(label, threshold, "no candidates with the stored tag");
                Ok(Relocation::NotConfident { best_score: None })
            }
        }
    }
}
