pub mod family;
pub mod point;
pub mod result;

pub use family::{CodeFamily, Dimension};
pub use point::Point;
pub use result::{BatchEntry, BatchResult, DecodeOutcome, DecodedCode, FileOutcome, ImageResult};
