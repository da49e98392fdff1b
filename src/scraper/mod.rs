mod document;
mod normalize;
mod passage;
mod region;

pub use document::Page;
pub use normalize::Normalizer;
pub use passage::{merge_passage, MergeOutcome, PassageConfig};
pub use region::{MarkerSpec, RegionStrategy, TitleSpec};
