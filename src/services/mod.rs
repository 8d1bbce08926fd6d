pub mod catalog;
pub mod history;
pub mod mood;
pub mod prefilter;
pub mod ranking;
pub mod recommendations;
pub mod scoring;

pub use catalog::{merge_catalogs, CatalogProvider, CatalogService, InMemoryCatalog, JsonFileCatalog};
pub use mood::{MoodDefinition, MoodTaxonomy};
pub use recommendations::Recommender;
pub use scoring::{RandomSource, Scorer};
