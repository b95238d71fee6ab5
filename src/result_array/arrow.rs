//! construction of result arrays from materialized arrow columns
use anyhow::{Context, Result, bail};
use arrow::array::{Array, FixedSizeListArray, PrimitiveArray};
use arrow::datatypes::ArrowPrimitiveType;
use ndarray::{Ix1, Ix2};

use super::{ResultArray, ResultHandle};

/// returns the values of a primitive arrow array.
/// Null slots have no dense representation and are refused.
pub(crate) fn primitive_values<T: ArrowPrimitiveType>(array: &dyn Array) -> Result<Vec<T::Native>> {
    let primitive = array
        .as_any()
        .downcast_ref::<PrimitiveArray<T>>()
        .with_context(|| {
            format!(
                "could not downcast {} array to {}",
                array.data_type(),
                T::DATA_TYPE
            )
        })?;
    if primitive.null_count() > 0 {
        bail!(
            "{} array contains {} null values, not representable as dense array",
            primitive.data_type(),
            primitive.null_count()
        );
    }
    Ok(primitive.values().to_vec())
}

impl<A> ResultArray<A, Ix1> {
    /// Create a one dimensional result array from a primitive arrow array
    pub fn from_arrow<T>(array: &dyn Array, owner: Option<ResultHandle>) -> Result<Self>
    where
        T: ArrowPrimitiveType<Native = A>,
    {
        let values = primitive_values::<T>(array).context("failed converting arrow array")?;
        Ok(Self::from_vec(values, owner))
    }
}

impl<A> ResultArray<A, Ix2> {
    /// Create a two dimensional result array from a fixed size list array,
    /// one row per list entry
    pub fn from_arrow_fixed_size_list<T>(
        array: &FixedSizeListArray,
        owner: Option<ResultHandle>,
    ) -> Result<Self>
    where
        T: ArrowPrimitiveType<Native = A>,
    {
        if array.null_count() > 0 {
            bail!(
                "fixed size list array contains {} null entries",
                array.null_count()
            );
        }
        let width = usize::try_from(array.value_length())
            .context("negative fixed size list length")?;
        let values = primitive_values::<T>(array.values().as_ref())
            .context("failed converting fixed size list values")?;
        Self::from_shape_vec((array.len(), width), values, owner)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use arrow::array::{Float64Array, Int32Array};
    use arrow::datatypes::{Float64Type, Int32Type};
    use ndarray::array;

    #[test]
    fn primitive_conversion() {
        let owner = ResultHandle::new("rdf");
        let column = Float64Array::from(vec![0.5, 1.5, 2.5]);
        let array = ResultArray::from_arrow::<Float64Type>(&column, Some(owner.clone())).unwrap();
        assert_eq!(*array, array![0.5, 1.5, 2.5]);
        assert_eq!(array.owner(), Some(&owner));
    }

    #[test]
    fn sliced_arrow_array() {
        let column = Int32Array::from(vec![1, 2, 3, 4, 5]);
        let sliced = column.slice(1, 3);
        let array = ResultArray::from_arrow::<Int32Type>(&sliced, None).unwrap();
        assert_eq!(array.to_vec(), vec![2, 3, 4]);
    }

    #[test]
    fn wrong_type_refused() {
        let column = Int32Array::from(vec![1, 2]);
        let error = ResultArray::from_arrow::<Float64Type>(&column, None).unwrap_err();
        assert!(format!("{error:#}").contains("could not downcast"));
    }

    #[test]
    fn nulls_refused() {
        let column = Int32Array::from(vec![Some(1), None, Some(3)]);
        assert!(ResultArray::from_arrow::<Int32Type>(&column, None).is_err());
    }

    #[test]
    fn fixed_size_list_conversion() {
        let lists = FixedSizeListArray::from_iter_primitive::<Int32Type, _, _>(
            vec![
                Some(vec![Some(1), Some(2), Some(3)]),
                Some(vec![Some(4), Some(5), Some(6)]),
            ],
            3,
        );
        let array =
            ResultArray::from_arrow_fixed_size_list::<Int32Type>(&lists, None).unwrap();
        assert_eq!(*array, array![[1, 2, 3], [4, 5, 6]]);
    }
}
