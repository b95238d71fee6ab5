//! this module exposes result arrays and predicates to python
use numpy::ndarray::{Axis, IxDyn, Slice};
use numpy::{Element, PyArrayDyn, PyArrayMethods, ToPyArray};
use pyo3::exceptions::{PyIndexError, PyTypeError, PyValueError};
use pyo3::prelude::*;
use pyo3::types::{PySlice, PySliceIndices};

use crate::result_array::{ResultArray, ResultHandle};
use crate::type_name::repr_is_templated_instance;

/// values of a result array, one variant per supported dtype
#[derive(Debug, Clone)]
enum Values {
    Float32(ResultArray<f32, IxDyn>),
    Float64(ResultArray<f64, IxDyn>),
    Int32(ResultArray<i32, IxDyn>),
    Int64(ResultArray<i64, IxDyn>),
    UInt32(ResultArray<u32, IxDyn>),
    UInt64(ResultArray<u64, IxDyn>),
}

/// evaluates the expression on the result array, whatever its dtype
macro_rules! with_values {
    ($values:expr, $array:ident => $body:expr) => {
        match $values {
            Values::Float32($array) => $body,
            Values::Float64($array) => $body,
            Values::Int32($array) => $body,
            Values::Int64($array) => $body,
            Values::UInt32($array) => $body,
            Values::UInt64($array) => $body,
        }
    };
}

/// derives values of the same dtype
macro_rules! map_values {
    ($values:expr, $array:ident => $body:expr) => {
        match $values {
            Values::Float32($array) => Values::Float32($body),
            Values::Float64($array) => Values::Float64($body),
            Values::Int32($array) => Values::Int32($body),
            Values::Int64($array) => Values::Int64($body),
            Values::UInt32($array) => Values::UInt32($body),
            Values::UInt64($array) => Values::UInt64($body),
        }
    };
}

impl Values {
    /// copies a numpy array, fails on dtypes without a variant
    fn from_numpy(array: &Bound<'_, PyAny>, owner: Option<ResultHandle>) -> PyResult<Self> {
        let values = extract(array, &owner)
            .map(Self::Float64)
            .or_else(|| extract(array, &owner).map(Self::Float32))
            .or_else(|| extract(array, &owner).map(Self::Int64))
            .or_else(|| extract(array, &owner).map(Self::Int32))
            .or_else(|| extract(array, &owner).map(Self::UInt64))
            .or_else(|| extract(array, &owner).map(Self::UInt32));
        match values {
            Some(values) => Ok(values),
            None => Err(PyTypeError::new_err(format!(
                "result arrays do not support dtype {}",
                array.getattr("dtype")?
            ))),
        }
    }
    fn owner(&self) -> Option<&ResultHandle> {
        with_values!(self, array => array.owner())
    }
    fn dtype(&self) -> &'static str {
        match self {
            Self::Float32(_) => "float32",
            Self::Float64(_) => "float64",
            Self::Int32(_) => "int32",
            Self::Int64(_) => "int64",
            Self::UInt32(_) => "uint32",
            Self::UInt64(_) => "uint64",
        }
    }
}

fn extract<T: Element>(
    array: &Bound<'_, PyAny>,
    owner: &Option<ResultHandle>,
) -> Option<ResultArray<T, IxDyn>> {
    let array = array.downcast::<PyArrayDyn<T>>().ok()?;
    Some(ResultArray::from_array(array.to_owned_array(), owner.clone()))
}

/// numpy.asarray, accepts any array like
fn as_numpy_array<'py>(data: &Bound<'py, PyAny>) -> PyResult<Bound<'py, PyAny>> {
    data.py().import("numpy")?.getattr("asarray")?.call1((data,))
}

/// python slice bounds as an ndarray slice of the same elements, in the same order
fn axis_slice(indices: &PySliceIndices) -> Slice {
    if indices.slicelength == 0 {
        Slice::new(0, Some(0), 1)
    } else if indices.step > 0 {
        Slice::new(indices.start, Some(indices.stop), indices.step)
    } else {
        // ndarray walks negative steps from the end of the range
        Slice::new(indices.stop + 1, Some(indices.start + 1), indices.step)
    }
}

/// numpy compatible array keeping alive the result pointer it was taken from
#[pyclass(name = "ndarray", module = "rdfutils", frozen)]
pub struct PyResultArray {
    values: Values,
}

impl PyResultArray {
    /// applies the numpy operator, the output keeps the owner of self, else of other
    fn binary_op(&self, other: &Bound<'_, PyAny>, operator: &str) -> PyResult<Self> {
        let py = other.py();
        let (other, other_owner) = match other.downcast::<PyResultArray>() {
            Ok(result_array) => {
                let result_array = result_array.get();
                (
                    result_array.__array__(py, None, None)?,
                    result_array.values.owner().cloned(),
                )
            }
            Err(_) => (other.clone(), None),
        };
        let output = self
            .__array__(py, None, None)?
            .call_method1(operator, (other,))?;
        let owner = self.values.owner().cloned().or(other_owner);
        Ok(Self {
            values: Values::from_numpy(&as_numpy_array(&output)?, owner)?,
        })
    }
}

#[pymethods]
impl PyResultArray {
    #[new]
    #[pyo3(signature = (data, owner=None))]
    fn new(data: &Bound<'_, PyAny>, owner: Option<PyObject>) -> PyResult<Self> {
        Ok(Self {
            values: Values::from_numpy(&as_numpy_array(data)?, owner.map(ResultHandle::new))?,
        })
    }
    /// result pointer attached to the array, None if there is none
    #[getter]
    fn owner(&self, py: Python<'_>) -> Option<PyObject> {
        self.values
            .owner()
            .and_then(|handle| handle.downcast_ref::<PyObject>())
            .map(|owner| owner.clone_ref(py))
    }
    #[getter]
    fn shape(&self) -> Vec<usize> {
        with_values!(&self.values, array => array.shape().to_vec())
    }
    #[getter]
    fn dtype(&self) -> &'static str {
        self.values.dtype()
    }
    fn __len__(&self) -> PyResult<usize> {
        self.shape()
            .first()
            .copied()
            .ok_or_else(|| PyTypeError::new_err("len() of unsized object"))
    }
    /// integer index or slice along the first axis, sharing the result pointer
    fn __getitem__(&self, index: &Bound<'_, PyAny>) -> PyResult<Self> {
        let length = self.__len__()?;
        if let Ok(slice) = index.downcast::<PySlice>() {
            let slice = axis_slice(&slice.indices(length as isize)?);
            return Ok(Self {
                values: map_values!(&self.values, array => array.slice_axis(Axis(0), slice)),
            });
        }
        let index: isize = index.extract()?;
        let position = if index < 0 {
            index + length as isize
        } else {
            index
        };
        if position < 0 || position as usize >= length {
            return Err(PyIndexError::new_err(format!(
                "index {index} is out of bounds for axis 0 with size {length}"
            )));
        }
        Ok(Self {
            values: map_values!(&self.values, array => array.index_axis(Axis(0), position as usize)),
        })
    }
    fn reshape(&self, shape: Vec<usize>) -> PyResult<Self> {
        Ok(Self {
            values: map_values!(&self.values, array => array.reshape(IxDyn(&shape))?),
        })
    }
    fn transpose(&self) -> Self {
        Self {
            values: map_values!(&self.values, array => array.t()),
        }
    }
    /// numpy protocol, the conversion always copies
    #[pyo3(signature = (dtype=None, copy=None))]
    fn __array__<'py>(
        &self,
        py: Python<'py>,
        dtype: Option<&Bound<'py, PyAny>>,
        copy: Option<bool>,
    ) -> PyResult<Bound<'py, PyAny>> {
        if copy == Some(false) {
            return Err(PyValueError::new_err(
                "result arrays cannot be converted to numpy without a copy",
            ));
        }
        let array = with_values!(&self.values, array => array.as_array().to_pyarray(py).into_any());
        match dtype {
            Some(dtype) => array.call_method1("astype", (dtype,)),
            None => Ok(array),
        }
    }
    fn __add__(&self, other: &Bound<'_, PyAny>) -> PyResult<Self> {
        self.binary_op(other, "__add__")
    }
    fn __radd__(&self, other: &Bound<'_, PyAny>) -> PyResult<Self> {
        self.binary_op(other, "__radd__")
    }
    fn __sub__(&self, other: &Bound<'_, PyAny>) -> PyResult<Self> {
        self.binary_op(other, "__sub__")
    }
    fn __rsub__(&self, other: &Bound<'_, PyAny>) -> PyResult<Self> {
        self.binary_op(other, "__rsub__")
    }
    fn __mul__(&self, other: &Bound<'_, PyAny>) -> PyResult<Self> {
        self.binary_op(other, "__mul__")
    }
    fn __rmul__(&self, other: &Bound<'_, PyAny>) -> PyResult<Self> {
        self.binary_op(other, "__rmul__")
    }
    fn __truediv__(&self, other: &Bound<'_, PyAny>) -> PyResult<Self> {
        self.binary_op(other, "__truediv__")
    }
    fn __rtruediv__(&self, other: &Bound<'_, PyAny>) -> PyResult<Self> {
        self.binary_op(other, "__rtruediv__")
    }
    fn __repr__(&self) -> String {
        format!(
            "ndarray(shape={:?}, dtype={}, owner={})",
            self.shape(),
            self.values.dtype(),
            if self.values.owner().is_some() {
                "set"
            } else {
                "None"
            }
        )
    }
}

/// returns the number of items, None if the object is not sized
fn sized_length(iterable: &Bound<'_, PyAny>) -> PyResult<Option<usize>> {
    match iterable.len() {
        Ok(length) => Ok(Some(length)),
        Err(e) if e.is_instance_of::<PyTypeError>(iterable.py()) => Ok(None),
        Err(e) => Err(e),
    }
}

/// returns true if all items have the length of the first one
fn items_same_length(iterable: &Bound<'_, PyAny>) -> PyResult<bool> {
    let mut first_length = None;
    for item in iterable.try_iter()? {
        let length = item?.len()?;
        match first_length {
            None => first_length = Some(length),
            Some(first) if first != length => return Ok(false),
            Some(_) => {}
        }
    }
    Ok(true)
}

/// Check if the given iterable is ragged, non sized iterables are
#[pyfunction]
fn is_ragged(iterable: &Bound<'_, PyAny>) -> PyResult<bool> {
    match sized_length(iterable)? {
        None => Ok(true),
        Some(0) => Ok(false),
        Some(_) => Ok(!items_same_length(iterable)?),
    }
}

/// Check if all items of the iterable have the same length, non sized iterables do
#[pyfunction]
fn all_same_length(iterable: &Bound<'_, PyAny>) -> PyResult<bool> {
    match sized_length(iterable)? {
        None | Some(0) => Ok(true),
        Some(_) => items_same_length(iterable),
    }
}

/// Check if the object type is an instantiation of the templated class
#[pyfunction]
fn is_templated_instance(obj: &Bound<'_, PyAny>, class_name: &str) -> PyResult<bool> {
    let type_repr = obj.get_type().str()?;
    Ok(repr_is_templated_instance(&type_repr.to_cow()?, class_name))
}

pub(crate) fn register(m: &Bound<'_, PyModule>) -> PyResult<()> {
    m.add_class::<PyResultArray>()?;
    m.add_function(wrap_pyfunction!(is_ragged, m)?)?;
    m.add_function(wrap_pyfunction!(all_same_length, m)?)?;
    m.add_function(wrap_pyfunction!(is_templated_instance, m)?)?;
    Ok(())
}
