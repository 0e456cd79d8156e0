//! Service parser core - rule-based extraction of service records from
//! mechanic transcripts
//!
//! Turns free-text descriptions of vehicle service work into a structured
//! draft: service type, replaced and repaired parts, costs, odometer reading,
//! date hints and a confidence score.

pub mod types;
pub mod error;
pub mod config;
pub mod catalog;
pub mod normalize;
pub mod classifier;
pub mod quantity;
pub mod parts;
pub mod cost;
pub mod odometer;
pub mod confidence;
pub mod summary;
pub mod parser;
pub mod evaluation;

pub use types::*;
pub use error::{ParserError, Result};
pub use config::ParserConfig;
pub use catalog::Catalog;
pub use parser::ServiceParser;
pub use evaluation::{evaluate, CaseReport, EvaluationCase, EvaluationReport, EvaluationSummary};

// Python bindings
#[cfg(feature = "extension-module")]
pub mod py;

#[cfg(feature = "extension-module")]
use pyo3::prelude::*;

#[cfg(feature = "extension-module")]
#[pymodule]
fn service_parser_core(m: &Bound<'_, PyModule>) -> PyResult<()> {
    use py::*;
    m.add_class::<PyServiceParser>()?;
    m.add_function(wrap_pyfunction!(py_parse_transcript, m)?)?;
    Ok(())
}
