//! Strengths, weaknesses and improvement suggestions

mod assess;
mod suggestions;
mod types;

pub use assess::{assess, Assessment};
pub use suggestions::{categorize, suggest, MIN_SUGGESTIONS};
pub use types::*;
