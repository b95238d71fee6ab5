//! Module to export result arrays to other ecosystems.
#[cfg(feature = "numpy")]
pub mod numpy;
