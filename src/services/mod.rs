pub mod collector;
pub mod extractor;
pub mod fetcher;
pub mod pipeline;
pub mod selectors;

pub use collector::*;
pub use extractor::*;
pub use fetcher::*;
pub use pipeline::*;
