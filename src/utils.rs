//! Python-boundary extraction helpers (feature `python-bindings`).
//!
//! Thin conversion utilities shared by the PyO3 entry points in `lib.rs`:
//! they accept numpy arrays, pandas Series, or plain sequences and produce
//! the contiguous Rust vectors the core expects. All heavy numerical work
//! stays in the core modules; these helpers only convert and validate.

#[cfg(feature = "python-bindings")]
use numpy::{IntoPyArray, PyArrayMethods, PyReadonlyArray1};

#[cfg(feature = "python-bindings")]
use pyo3::{exceptions::PyValueError, prelude::*, types::PyAny};

#[cfg(feature = "python-bindings")]
#[inline]
pub fn extract_f64_vec<'py>(py: Python<'py>, raw: &Bound<'py, PyAny>) -> PyResult<Vec<f64>> {
    // Contiguous numpy array, the common case.
    if let Ok(array) = raw.extract::<PyReadonlyArray1<f64>>() {
        if let Ok(slice) = array.as_slice() {
            return Ok(slice.to_vec());
        }
    }
    // pandas Series via to_numpy(copy=False).
    if let Ok(converted) = raw.call_method("to_numpy", (false,), None) {
        if let Ok(array) = converted.extract::<PyReadonlyArray1<f64>>() {
            if let Ok(slice) = array.as_slice() {
                return Ok(slice.to_vec());
            }
        }
    }
    // Plain sequence fallback; round-trip through numpy keeps dtype checks
    // in one place.
    let values: Vec<f64> = raw.extract().map_err(|_| {
        pyo3::exceptions::PyTypeError::new_err(
            "expected a 1-D numpy.ndarray, pandas.Series, or sequence of float64",
        )
    })?;
    let array = values.into_pyarray(py).readonly();
    let slice = array
        .as_slice()
        .map_err(|_| PyValueError::new_err("expected a contiguous 1-D float64 array"))?;
    Ok(slice.to_vec())
}

#[cfg(feature = "python-bindings")]
#[inline]
pub fn extract_u32_vec<'py>(py: Python<'py>, raw: &Bound<'py, PyAny>) -> PyResult<Vec<u32>> {
    let values = extract_f64_vec(py, raw)?;
    values
        .into_iter()
        .map(|v| {
            if v.fract() == 0.0 && v >= 0.0 && v <= f64::from(u32::MAX) {
                Ok(v as u32)
            } else {
                Err(PyValueError::new_err(format!("expected a non-negative integer id, got {v}")))
            }
        })
        .collect()
}

#[cfg(feature = "python-bindings")]
#[inline]
pub fn extract_usize_vec<'py>(py: Python<'py>, raw: &Bound<'py, PyAny>) -> PyResult<Vec<usize>> {
    let values = extract_f64_vec(py, raw)?;
    values
        .into_iter()
        .map(|v| {
            if v.fract() == 0.0 && v >= 0.0 {
                Ok(v as usize)
            } else {
                Err(PyValueError::new_err(format!("expected a non-negative integer, got {v}")))
            }
        })
        .collect()
}

#[cfg(feature = "python-bindings")]
#[inline]
pub fn extract_u8_vec<'py>(py: Python<'py>, raw: &Bound<'py, PyAny>) -> PyResult<Vec<u8>> {
    let values = extract_f64_vec(py, raw)?;
    values
        .into_iter()
        .map(|v| match v {
            v if v == 0.0 => Ok(0u8),
            v if v == 1.0 => Ok(1u8),
            other => Err(PyValueError::new_err(format!("expected 0/1 coding, got {other}"))),
        })
        .collect()
}
