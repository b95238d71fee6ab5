#![cfg_attr(not(test), forbid(unsafe_code))]
#![cfg_attr(test, deny(unsafe_code))]
//! Owner tagged result arrays and shape/type predicates for lazy analysis engine results
pub mod column;
pub mod export;
pub mod result_array;
pub mod shape;
mod tests;
pub mod type_name;

#[cfg(feature = "numpy")]
use pyo3::prelude::*;

#[cfg(feature = "numpy")]
#[pymodule]
fn rdfutils(m: &Bound<'_, PyModule>) -> PyResult<()> {
    let _ = env_logger::try_init();
    export::numpy::register(m)
}
