pub mod db;
pub mod normalizer;

pub use normalizer::{process_content, NormalizeOptions};
pub use normalizer::extract::ProcessedProductContent;
