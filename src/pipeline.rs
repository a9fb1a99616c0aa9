//! One end-to-end embedding run: filter, embed, aggregate, then serve queries.
//!
//! A `Pipeline` owns everything built from one input snapshot. Nothing is
//! global and nothing is updated after `build` returns, so a pipeline can be
//! shared across threads behind an `Arc` and queried concurrently.

use std::sync::Arc;

use rayon::prelude::*;
use serde::Serialize;

use crate::config::Settings;
use crate::embedding::{EmbeddingRow, EmbeddingTable, ItemEmbedder, OccurrenceIndex};
use crate::error::{BuildError, BuildResult, EmbedError, QueryResult};
use crate::review::{Attribute, RecordFilter, ReviewRecord};
use crate::search::{Description, ResolverConfig, SimilarItems, SimilarityEngine, TermMatch};
use crate::vector::VectorSpace;

/// Build-time knobs, usually taken from [`Settings`].
#[derive(Debug, Clone, Copy)]
pub struct PipelineOptions {
    /// An attribute needs more than this many tokens for a review to be admitted.
    pub min_tokens: usize,
    /// Embedding worker threads; 0 lets rayon decide.
    pub parallel_threads: usize,
    pub resolver: ResolverConfig,
}

impl Default for PipelineOptions {
    fn default() -> Self {
        Self {
            min_tokens: crate::review::filter::DEFAULT_MIN_TOKENS,
            parallel_threads: 0,
            resolver: ResolverConfig::default(),
        }
    }
}

impl From<&Settings> for PipelineOptions {
    fn from(settings: &Settings) -> Self {
        Self {
            min_tokens: settings.build.min_tokens,
            parallel_threads: settings.build.parallel_threads,
            resolver: ResolverConfig {
                cutoff: settings.resolver.cutoff,
                max_candidates: settings.resolver.max_candidates,
            },
        }
    }
}

/// What happened to the input reviews during a build.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct BuildReport {
    /// Reviews handed to the build.
    pub reviews: usize,
    /// Rejected by the completeness filter.
    pub incomplete: usize,
    /// Rejected because an attribute had no in-vocabulary token.
    pub empty_embeddings: usize,
    /// Rejected for any other embedding failure.
    pub failed: usize,
    /// Reviews that made it into the table.
    pub admitted: usize,
    /// Distinct items in the table.
    pub items: usize,
    /// Vocabulary size of the vector space.
    pub vocabulary: usize,
    /// Vector dimension.
    pub dimension: usize,
}

/// Built embedding table plus everything needed to query it.
pub struct Pipeline {
    space: Arc<dyn VectorSpace>,
    table: EmbeddingTable,
    occurrences: OccurrenceIndex,
    resolver: ResolverConfig,
    report: BuildReport,
}

impl std::fmt::Debug for Pipeline {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Pipeline")
            .field("report", &self.report)
            .field("resolver", &self.resolver)
            .finish()
    }
}

impl Pipeline {
    /// Runs the full build over one snapshot of reviews.
    ///
    /// Reviews are embedded in parallel; a review that fails to embed is
    /// dropped and counted, it never aborts the build. Aggregation runs once
    /// all reviews are embedded, and the review counts come from exactly the
    /// reviews that reached the table.
    pub fn build(
        space: Arc<dyn VectorSpace>,
        records: Vec<ReviewRecord>,
        options: &PipelineOptions,
    ) -> BuildResult<Self> {
        let mut report = BuildReport {
            reviews: records.len(),
            vocabulary: space.len(),
            dimension: space.dimension().get(),
            ..BuildReport::default()
        };

        let admitted = RecordFilter::new(options.min_tokens).admit(records);
        report.incomplete = report.reviews - admitted.len();

        let embedded = embed_all(space.as_ref(), &admitted, options.parallel_threads)?;

        let mut rows: Vec<EmbeddingRow> = Vec::with_capacity(admitted.len() * Attribute::ALL.len());
        let mut names: Vec<&str> = Vec::with_capacity(admitted.len());

        for (record, result) in admitted.iter().zip(embedded) {
            match result {
                Ok(record_rows) => {
                    names.push(record.name());
                    rows.extend(record_rows);
                }
                Err(EmbedError::EmptyEmbedding { attribute }) => {
                    tracing::debug!(
                        "excluding review of '{}' ({}): no known tokens for {attribute}",
                        record.name(),
                        record.url()
                    );
                    report.empty_embeddings += 1;
                }
                Err(e) => {
                    tracing::warn!("excluding review of '{}': {e}", record.name());
                    report.failed += 1;
                }
            }
        }

        let occurrences = OccurrenceIndex::from_names(names);
        let table = EmbeddingTable::build(space.dimension(), rows)?;

        report.admitted = occurrences.total();
        report.items = table.len();

        tracing::info!(
            "built embeddings for {} items from {} of {} reviews ({} incomplete, {} without known tokens)",
            report.items,
            report.admitted,
            report.reviews,
            report.incomplete,
            report.empty_embeddings
        );

        Ok(Self {
            space,
            table,
            occurrences,
            resolver: options.resolver,
            report,
        })
    }

    /// Query engine borrowing this pipeline's table.
    pub fn engine(&self) -> SimilarityEngine<'_> {
        SimilarityEngine::new(
            &self.table,
            &self.occurrences,
            self.space.as_ref(),
            self.resolver,
        )
    }

    /// See [`SimilarityEngine::most_similar`].
    pub fn most_similar(
        &self,
        name: &str,
        attribute: Attribute,
        n: usize,
        min_count: usize,
    ) -> QueryResult<SimilarItems> {
        self.engine().most_similar(name, attribute, n, min_count)
    }

    /// See [`SimilarityEngine::describe`].
    pub fn describe(&self, name: &str, n: usize) -> QueryResult<Description> {
        self.engine().describe(name, n)
    }

    /// See [`SimilarityEngine::similar_terms`].
    pub fn similar_terms(&self, term: &str, n: usize) -> QueryResult<Vec<TermMatch>> {
        self.engine().similar_terms(term, n)
    }

    pub fn table(&self) -> &EmbeddingTable {
        &self.table
    }

    pub fn occurrences(&self) -> &OccurrenceIndex {
        &self.occurrences
    }

    pub fn space(&self) -> &dyn VectorSpace {
        self.space.as_ref()
    }

    pub fn report(&self) -> &BuildReport {
        &self.report
    }
}

/// Embeds every admitted review, preserving input order.
fn embed_all(
    space: &dyn VectorSpace,
    records: &[ReviewRecord],
    threads: usize,
) -> BuildResult<Vec<Result<[EmbeddingRow; 4], EmbedError>>> {
    let embedder = ItemEmbedder::new(space);

    let pool = rayon::ThreadPoolBuilder::new()
        .num_threads(threads)
        .thread_name(|i| format!("embed-{i}"))
        .build()
        .map_err(|e| BuildError::WorkerPool {
            threads,
            reason: e.to_string(),
        })?;

    tracing::debug!(
        "embedding {} reviews on {} threads",
        records.len(),
        pool.current_num_threads()
    );

    Ok(pool.install(|| {
        records
            .par_iter()
            .map(|record| embedder.embed(record))
            .collect()
    }))
}
