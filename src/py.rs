//! Python bindings for the service parser using PyO3

use pyo3::exceptions::PyValueError;
use pyo3::prelude::*;
use pyo3::types::PyDict;
use crate::error::ParserError;
use crate::evaluation::{evaluate, EvaluationCase};
use crate::parser::ServiceParser;
use crate::types::{DateInfo, ExtractedPart, ParseResult};

fn to_py_err(err: ParserError) -> PyErr {
    PyErr::new::<PyValueError, _>(err.to_string())
}

fn part_to_dict<'py>(py: Python<'py>, part: &ExtractedPart) -> PyResult<Bound<'py, PyDict>> {
    let dict = PyDict::new_bound(py);
    dict.set_item("id", &part.id)?;
    dict.set_item("name", &part.name)?;
    dict.set_item("category", &part.category)?;
    dict.set_item("estimated_price", part.estimated_price)?;
    dict.set_item("action", part.action.as_str())?;
    dict.set_item("quantity", part.quantity)?;
    dict.set_item("detection_method", part.detection_method.as_str())?;
    Ok(dict)
}

fn date_info_to_dict<'py>(py: Python<'py>, info: &DateInfo) -> PyResult<Bound<'py, PyDict>> {
    let dict = PyDict::new_bound(py);
    if let Some(day) = info.service_date {
        let day = serde_json::to_value(day).map_err(|e| {
            PyErr::new::<PyValueError, _>(format!("Failed to serialize date: {}", e))
        })?;
        if let Some(day) = day.as_str() {
            dict.set_item("service_date", day)?;
        }
    }
    if info.has_next_service {
        dict.set_item("has_next_service", true)?;
    }
    if let Some(date) = &info.specific_date {
        dict.set_item("specific_date", date)?;
    }
    Ok(dict)
}

fn result_to_dict<'py>(py: Python<'py>, result: &ParseResult) -> PyResult<Bound<'py, PyDict>> {
    let dict = PyDict::new_bound(py);
    dict.set_item("transcript", &result.transcript)?;
    dict.set_item("service_type", result.service_type.as_str())?;

    let replaced = result
        .parts_replaced
        .iter()
        .map(|p| part_to_dict(py, p))
        .collect::<PyResult<Vec<_>>>()?;
    dict.set_item("parts_replaced", replaced)?;
    let repaired = result
        .parts_repaired
        .iter()
        .map(|p| part_to_dict(py, p))
        .collect::<PyResult<Vec<_>>>()?;
    dict.set_item("parts_repaired", repaired)?;

    dict.set_item("labor_cost", result.labor_cost)?;
    dict.set_item("parts_cost", result.parts_cost)?;
    dict.set_item("total_cost", result.total_cost)?;
    dict.set_item("odometer_reading", result.odometer_reading)?;
    dict.set_item("date_info", date_info_to_dict(py, &result.date_info)?)?;
    dict.set_item("work_summary", &result.work_summary)?;
    dict.set_item("confidence_score", result.confidence_score)?;
    dict.set_item("parsed_successfully", result.parsed_successfully)?;
    dict.set_item("raw_parts_found", &result.raw_parts_found)?;
    Ok(dict)
}

/// Parse one transcript with the default configuration (Python function)
#[pyfunction]
pub fn py_parse_transcript<'py>(py: Python<'py>, transcript: &str) -> PyResult<Bound<'py, PyDict>> {
    let parser = ServiceParser::shared().map_err(to_py_err)?;
    let result = py.allow_threads(|| parser.parse(transcript));
    result_to_dict(py, &result)
}

/// Python wrapper for the service parser
#[pyclass]
pub struct PyServiceParser {
    parser: ServiceParser,
}

#[pymethods]
impl PyServiceParser {
    #[new]
    fn new() -> PyResult<Self> {
        Ok(Self {
            parser: ServiceParser::new().map_err(to_py_err)?,
        })
    }

    /// Parse a transcript into a dict with the same keys as the JSON output
    fn parse<'py>(&self, transcript: &str, py: Python<'py>) -> PyResult<Bound<'py, PyDict>> {
        let result = py.allow_threads(|| self.parser.parse(transcript));
        result_to_dict(py, &result)
    }

    /// Parse a transcript and return the result as a JSON string
    fn parse_json(&self, transcript: &str) -> PyResult<String> {
        self.parser.parse_json(transcript).map_err(to_py_err)
    }

    /// Evaluate a JSON array of {input, expected_parts, expected_cost} cases
    fn evaluate(&self, cases_json: &str) -> PyResult<String> {
        let cases: Vec<EvaluationCase> = serde_json::from_str(cases_json).map_err(|e| {
            PyErr::new::<PyValueError, _>(format!("Invalid evaluation cases: {}", e))
        })?;
        let report = evaluate(&self.parser, &cases);
        serde_json::to_string(&report).map_err(|e| {
            PyErr::new::<PyValueError, _>(format!("Failed to serialize report: {}", e))
        })
    }
}
