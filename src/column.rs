//! materialization of a taken column into result arrays
use std::fmt;

use anyhow::{Context, Result, bail};
use arrow::array::{Array, GenericListArray, OffsetSizeTrait};
use arrow::datatypes::ArrowPrimitiveType;
use log::debug;
use ndarray::{Ix1, Ix2};

use crate::result_array::arrow::primitive_values;
use crate::result_array::{ResultArray, ResultHandle};
use crate::shape::{Rows, all_same_length, is_ragged};

/// Values of one column returned by a Take action.
/// Rows of equal length are packed into a single two dimensional array, ragged rows
/// are kept as separate arrays. All arrays share the owner of the taken result.
#[derive(Debug, Clone)]
pub enum TakeColumn<A> {
    /// one value per event
    Scalars(ResultArray<A, Ix1>),
    /// one row of constant length per event
    Regular(ResultArray<A, Ix2>),
    /// one row of variable length per event
    Ragged(Vec<ResultArray<A, Ix1>>),
}

impl<A: Clone> TakeColumn<A> {
    /// Builds a column from rows of values
    pub fn from_rows<R>(rows: &[R], owner: Option<ResultHandle>) -> Result<Self>
    where
        R: AsRef<[A]>,
    {
        let lengths: Vec<usize> = rows.iter().map(|row| row.as_ref().len()).collect();
        if all_same_length(&RowLengths(&lengths)) {
            let width = lengths.first().copied().unwrap_or_default();
            let values: Vec<A> = rows
                .iter()
                .flat_map(|row| row.as_ref().iter().cloned())
                .collect();
            let array = ResultArray::from_shape_vec((rows.len(), width), values, owner)
                .context("failed packing regular rows")?;
            Ok(Self::Regular(array))
        } else {
            debug!("{} rows of different lengths kept ragged", rows.len());
            Ok(Self::Ragged(
                rows.iter()
                    .map(|row| ResultArray::from_vec(row.as_ref().to_vec(), owner.clone()))
                    .collect(),
            ))
        }
    }
}

impl<A> TakeColumn<A> {
    /// Builds a column from a flat primitive arrow array
    pub fn from_arrow_values<T>(array: &dyn Array, owner: Option<ResultHandle>) -> Result<Self>
    where
        T: ArrowPrimitiveType<Native = A>,
    {
        Ok(Self::Scalars(ResultArray::from_arrow::<T>(array, owner)?))
    }
    /// Builds a column from an arrow list array of primitive values
    pub fn from_arrow_list<T, O>(
        list: &GenericListArray<O>,
        owner: Option<ResultHandle>,
    ) -> Result<Self>
    where
        T: ArrowPrimitiveType<Native = A>,
        O: OffsetSizeTrait,
    {
        if list.null_count() > 0 {
            bail!("list array contains {} null rows", list.null_count());
        }
        let offsets = list.value_offsets();
        if all_same_length(list) {
            let width = list.row_lengths().next().unwrap_or_default();
            let start = offsets.first().map(|o| o.as_usize()).unwrap_or_default();
            let end = offsets.last().map(|o| o.as_usize()).unwrap_or_default();
            let values = list.values().slice(start, end - start);
            let values = primitive_values::<T>(values.as_ref())
                .context("failed converting list values")?;
            let array = ResultArray::from_shape_vec((list.len(), width), values, owner)
                .context("failed packing regular list rows")?;
            Ok(Self::Regular(array))
        } else {
            debug!("list array of {} rows kept ragged", list.len());
            let rows = (0..list.len())
                .map(|index| {
                    let row = list.value(index);
                    ResultArray::from_arrow::<T>(row.as_ref(), owner.clone())
                        .with_context(|| format!("failed converting list row {index}"))
                })
                .collect::<Result<Vec<_>>>()?;
            Ok(Self::Ragged(rows))
        }
    }
    /// number of events
    pub fn len(&self) -> usize {
        match self {
            Self::Scalars(array) => array.len(),
            Self::Regular(array) => array.nrows(),
            Self::Ragged(rows) => rows.len(),
        }
    }
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
    /// returns true if rows have different lengths
    pub fn is_ragged(&self) -> bool {
        match self {
            Self::Scalars(_) => false,
            Self::Regular(array) => is_ragged(array),
            Self::Ragged(rows) => is_ragged(rows),
        }
    }
    /// owner shared by the column arrays, None if built without one or empty and ragged
    pub fn owner(&self) -> Option<&ResultHandle> {
        match self {
            Self::Scalars(array) => array.owner(),
            Self::Regular(array) => array.owner(),
            Self::Ragged(rows) => rows.first().and_then(|row| row.owner()),
        }
    }
}

impl<A> fmt::Display for TakeColumn<A> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Scalars(array) => write!(f, "column of {} values", array.len()),
            Self::Regular(array) => {
                write!(f, "column of {} rows of {} values", array.nrows(), array.ncols())
            }
            Self::Ragged(rows) if self.is_ragged() => {
                write!(f, "ragged column of {} rows", rows.len())
            }
            Self::Ragged(rows) => write!(f, "column of {} rows", rows.len()),
        }
    }
}

/// lengths already measured, seen as rows
struct RowLengths<'a>(&'a [usize]);

impl Rows for RowLengths<'_> {
    fn row_count(&self) -> Option<usize> {
        Some(self.0.len())
    }
    fn row_lengths(&self) -> impl Iterator<Item = usize> + '_ {
        self.0.iter().copied()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use arrow::array::{Float64Array, ListArray};
    use arrow::datatypes::{Float64Type, Int32Type};
    use ndarray::array;
    use test_log::test;

    #[test]
    fn regular_rows() {
        let owner = ResultHandle::new(0_u64);
        let rows = vec![vec![1, 2], vec![3, 4], vec![5, 6]];
        let column = TakeColumn::from_rows(&rows, Some(owner.clone())).unwrap();
        match &column {
            TakeColumn::Regular(array) => assert_eq!(**array, array![[1, 2], [3, 4], [5, 6]]),
            other => panic!("unexpected {other:?}"),
        }
        assert_eq!(column.len(), 3);
        assert!(!column.is_ragged());
        assert_eq!(column.owner(), Some(&owner));
        assert_eq!(column.to_string(), "column of 3 rows of 2 values");
    }

    #[test]
    fn ragged_rows() {
        let owner = ResultHandle::new(0_u64);
        let rows: Vec<&[f32]> = vec![&[1.0][..], &[2.0, 3.0][..], &[][..]];
        let column = TakeColumn::from_rows(&rows, Some(owner.clone())).unwrap();
        let TakeColumn::Ragged(arrays) = &column else {
            panic!("rows should stay ragged");
        };
        assert_eq!(arrays.len(), 3);
        assert!(arrays.iter().all(|array| array.owner() == Some(&owner)));
        assert_eq!(arrays[1].to_vec(), vec![2.0, 3.0]);
        assert!(column.is_ragged());
        assert_eq!(column.to_string(), "ragged column of 3 rows");
    }

    #[test]
    fn empty_rows() {
        let rows: Vec<Vec<i8>> = vec![];
        let column = TakeColumn::from_rows(&rows, None).unwrap();
        assert!(column.is_empty());
        assert!(matches!(column, TakeColumn::Regular(ref array) if array.shape() == [0, 0]));
    }

    #[test]
    fn arrow_values() {
        let values = Float64Array::from(vec![1.0, 2.0]);
        let column = TakeColumn::from_arrow_values::<Float64Type>(&values, None).unwrap();
        assert_eq!(column.len(), 2);
        assert_eq!(column.to_string(), "column of 2 values");
    }

    #[test]
    fn arrow_regular_list() {
        let owner = ResultHandle::new("take");
        let list = ListArray::from_iter_primitive::<Int32Type, _, _>(vec![
            Some(vec![Some(0), Some(1)]),
            Some(vec![Some(2), Some(3)]),
            Some(vec![Some(4), Some(5)]),
        ]);
        let column =
            TakeColumn::from_arrow_list::<Int32Type, _>(&list.slice(1, 2), Some(owner.clone()))
                .unwrap();
        let TakeColumn::Regular(array) = &column else {
            panic!("rows should be packed");
        };
        assert_eq!(**array, array![[2, 3], [4, 5]]);
        assert_eq!(array.owner(), Some(&owner));
    }

    #[test]
    fn arrow_ragged_list() {
        let list = ListArray::from_iter_primitive::<Int32Type, _, _>(vec![
            Some(vec![Some(0)]),
            Some(vec![Some(1), Some(2)]),
        ]);
        let column = TakeColumn::from_arrow_list::<Int32Type, _>(&list, None).unwrap();
        let TakeColumn::Ragged(rows) = &column else {
            panic!("rows should stay ragged");
        };
        assert_eq!(rows[1].to_vec(), vec![1, 2]);
        assert!(column.owner().is_none());
    }

    #[test]
    fn arrow_list_with_nulls() {
        let list = ListArray::from_iter_primitive::<Int32Type, _, _>(vec![
            Some(vec![Some(0)]),
            None,
        ]);
        assert!(TakeColumn::from_arrow_list::<Int32Type, _>(&list, None).is_err());
        let list = ListArray::from_iter_primitive::<Int32Type, _, _>(vec![
            Some(vec![Some(0), None]),
            Some(vec![Some(1)]),
        ]);
        assert!(TakeColumn::from_arrow_list::<Int32Type, _>(&list, None).is_err());
    }
}
