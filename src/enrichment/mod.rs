/// Contact enrichment routing
///
/// This module provides the enrichment core:
/// - Input classification (email, domain, natural language)
/// - Source registry built from provider configuration
/// - Source adapters and the concurrent fan-out pipeline
/// - Merge and normalization of provider records
/// - The orchestrating enrichment service

pub mod classifier;
pub mod merge;
pub mod normalize;
pub mod pipeline;
pub mod registry;
pub mod service;
pub mod sources;

pub use classifier::{classify, is_domain, is_email, validate};
pub use merge::{merge_results, MAX_MERGED_RESULTS};
pub use normalize::{company_from_person, normalize_company, normalize_person};
pub use pipeline::{contributing_sources, SourceBatch, SourcePipeline};
pub use registry::{SourceDescriptor, SourceRegistry};
pub use service::EnrichmentService;
pub use sources::{FullEnrichSource, PdlSearchSource, RemainingSources, SourceAdapter};
