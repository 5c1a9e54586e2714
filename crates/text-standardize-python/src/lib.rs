#![allow(clippy::useless_conversion)] // PyO3 generates conversions via proc macros

use pyo3::exceptions::{PyKeyError, PyTypeError, PyValueError};
use pyo3::prelude::*;
use pyo3::types::{PyBool, PyByteArray, PyBytes, PyDict, PyFloat, PyInt, PyString};
use text_standardize::{StandardizeError, StandardizeOptions, Value};

fn to_py_err(err: StandardizeError) -> PyErr {
    match err {
        StandardizeError::MissingField { .. } => PyKeyError::new_err(err.to_string()),
        StandardizeError::NonTextValue { .. } => PyTypeError::new_err(err.to_string()),
        _ => PyValueError::new_err(err.to_string()),
    }
}

fn non_text(field: &str, row: usize, item: &Bound<'_, PyAny>) -> PyResult<PyErr> {
    Ok(PyTypeError::new_err(format!(
        "kind=non_text_value: column `{}` row {} is {}, expected text or null",
        field,
        row,
        item.get_type().name()?
    )))
}

/// Convert one Python cell. Anything that is not None/str/bool/int/float is
/// rejected here since it has no `Value` counterpart.
fn cell_to_value(field: &str, row: usize, item: &Bound<'_, PyAny>) -> PyResult<Value> {
    if item.is_none() {
        Ok(Value::Null)
    } else if item.is_instance_of::<PyString>() {
        Ok(Value::Text(item.extract()?))
    } else if item.is_instance_of::<PyBool>() {
        Ok(Value::Bool(item.extract()?))
    } else if item.is_instance_of::<PyInt>() {
        // Ints outside i64 are still non-text cells, not an overflow.
        match item.extract() {
            Ok(v) => Ok(Value::Int(v)),
            Err(_) => Err(non_text(field, row, item)?),
        }
    } else if item.is_instance_of::<PyFloat>() {
        Ok(Value::Float(item.extract()?))
    } else {
        Err(non_text(field, row, item)?)
    }
}

/// Read a column out of a dict entry. A string is iterable too, but it is one
/// value, not a column of characters.
fn column_to_values(field: &str, column: &Bound<'_, PyAny>) -> PyResult<Vec<Value>> {
    if column.is_instance_of::<PyString>()
        || column.is_instance_of::<PyBytes>()
        || column.is_instance_of::<PyByteArray>()
    {
        return Err(PyTypeError::new_err(format!(
            "column `{}` is a {}, expected a sequence of cells",
            field,
            column.get_type().name()?
        )));
    }

    let mut values = Vec::new();
    for (row, item) in column.iter()?.enumerate() {
        values.push(cell_to_value(field, row, &item?)?);
    }
    Ok(values)
}

fn values_to_cells(values: Vec<Value>) -> Vec<Option<String>> {
    values
        .into_iter()
        .map(|v| match v {
            Value::Text(s) => Some(s),
            _ => None,
        })
        .collect()
}

/// Standardize one string with the default rules.
#[pyfunction]
fn standardize_text(text: &str) -> String {
    text_standardize::standardize_text(text)
}

/// Compiled URL/mention stripping rules.
#[pyclass]
struct RustTextStandardizer {
    inner: text_standardize::TextStandardizer,
}

#[pymethods]
impl RustTextStandardizer {
    #[new]
    #[pyo3(signature = (case_insensitive_http = false))]
    fn new(case_insensitive_http: bool) -> PyResult<Self> {
        let options =
            StandardizeOptions::default().with_case_insensitive_http(case_insensitive_http);
        let inner = text_standardize::TextStandardizer::new(options).map_err(to_py_err)?;
        Ok(Self { inner })
    }

    fn standardize_text(&self, text: &str) -> String {
        self.inner.standardize_text(text)
    }

    /// Standardize text and return a dict with the output and per-rule counts.
    fn standardize_text_with_report<'py>(
        &self,
        py: Python<'py>,
        text: &str,
    ) -> PyResult<Bound<'py, PyDict>> {
        let report = self.inner.standardize_text_with_report(text);
        let dict = PyDict::new_bound(py);
        dict.set_item("output", report.output)?;
        dict.set_item("urls_removed", report.urls_removed)?;
        dict.set_item("bare_http_removed", report.bare_http_removed)?;
        dict.set_item("mentions_removed", report.mentions_removed)?;
        dict.set_item("at_replaced", report.at_replaced)?;
        Ok(dict)
    }

    /// Standardize a list of optional strings, returning a new list.
    fn standardize_column(&self, values: Vec<Option<String>>) -> PyResult<Vec<Option<String>>> {
        let mut values: Vec<Value> = values.into_iter().map(Value::from).collect();
        self.inner
            .standardize_values("<column>", &mut values)
            .map_err(to_py_err)?;
        Ok(values_to_cells(values))
    }

    /// Rewrite `table[text_field]` and return the same dict.
    fn standardize_table<'py>(
        &self,
        table: Bound<'py, PyDict>,
        text_field: &str,
    ) -> PyResult<Bound<'py, PyDict>> {
        let column = table.get_item(text_field)?.ok_or_else(|| {
            to_py_err(StandardizeError::MissingField {
                field: text_field.to_string(),
            })
        })?;

        let mut values = column_to_values(text_field, &column)?;
        self.inner
            .standardize_values(text_field, &mut values)
            .map_err(to_py_err)?;
        table.set_item(text_field, values_to_cells(values))?;
        Ok(table)
    }
}

/// Native accelerator module for text-standardize.
#[pymodule]
fn _native(m: &Bound<'_, PyModule>) -> PyResult<()> {
    m.add_function(wrap_pyfunction!(standardize_text, m)?)?;
    m.add_class::<RustTextStandardizer>()?;
    Ok(())
}
