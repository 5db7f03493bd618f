//! Analysis modules for preparing model inputs and summarizing model output

/// Temperature standardization and population rescaling
pub mod features;
/// Posterior predictive draws and summaries
pub mod summary;
