pub mod aggregator;
pub mod classifier;
pub mod companion;
pub mod emotion;
pub mod gemini;
pub mod insights;
pub mod recommendations;
pub mod risk;
pub mod store;
