mod recommendation;
mod show;

pub use recommendation::{FallbackReason, PickSource, Recommendation};
pub use show::{normalize_tags, Show};
