// Matching pipeline: fallback gather → scoring → categorize → filter.
// Everything here is request-scoped except the shared store and scorer handles.

pub mod categorize;
pub mod dedup;
pub mod fallback;
pub mod filters;
pub mod handlers;
pub mod recommender;
pub mod scoring;
