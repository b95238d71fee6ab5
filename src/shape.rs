//! raggedness of sequences of sub-sequences
//!
//! Two predicates with deliberately different defaults when the number of rows cannot be
//! determined up front: `is_ragged` answers true, the conservative answer before formatting,
//! while `all_same_length` answers true, letting construction go on.
//! Only one level is inspected, rows of rows are not analyzed.
use std::collections::VecDeque;

use itertools::Itertools;
use ndarray::{ArrayBase, Ix1, Ix2, RawData};

use crate::result_array::ResultArray;

pub mod arrow;

/// Anything with a length, element of a sequence of rows
pub trait ElementLen {
    fn element_len(&self) -> usize;
}

/// Sequence of rows whose lengths can be compared
pub trait Rows {
    /// number of rows, None when it cannot be known without consuming the sequence
    fn row_count(&self) -> Option<usize>;
    /// lengths of the rows in iteration order
    fn row_lengths(&self) -> impl Iterator<Item = usize> + '_;
}

/// Returns true if the rows do not all have the same length.
/// A sequence with unknown row count is considered ragged, an empty one is not.
pub fn is_ragged<R: Rows + ?Sized>(rows: &R) -> bool {
    let Some(count) = rows.row_count() else {
        return true;
    };
    if count == 0 {
        return false;
    }
    let mut lengths = rows.row_lengths();
    let Some(first_length) = lengths.next() else {
        return false;
    };
    lengths.any(|length| length != first_length)
}

/// Returns true if all rows have the length of the first one.
/// Empty sequences and sequences with unknown row count are considered uniform.
pub fn all_same_length<R: Rows + ?Sized>(rows: &R) -> bool {
    match rows.row_count() {
        None | Some(0) => true,
        Some(_) => rows.row_lengths().all_equal(),
    }
}

/// Rows produced by an iterator, their count is unknown until iterated
#[derive(Debug, Clone)]
pub struct Streamed<I>(pub I);

impl<I> Rows for Streamed<I>
where
    I: Iterator + Clone,
    I::Item: ElementLen,
{
    fn row_count(&self) -> Option<usize> {
        None
    }
    fn row_lengths(&self) -> impl Iterator<Item = usize> + '_ {
        self.0.clone().map(|row| row.element_len())
    }
}

impl<T: ElementLen + ?Sized> ElementLen for &T {
    fn element_len(&self) -> usize {
        (**self).element_len()
    }
}

impl<T> ElementLen for [T] {
    fn element_len(&self) -> usize {
        self.len()
    }
}

impl<T, const N: usize> ElementLen for [T; N] {
    fn element_len(&self) -> usize {
        N
    }
}

impl<T> ElementLen for Vec<T> {
    fn element_len(&self) -> usize {
        self.len()
    }
}

impl<T> ElementLen for Box<[T]> {
    fn element_len(&self) -> usize {
        self.len()
    }
}

impl<T> ElementLen for VecDeque<T> {
    fn element_len(&self) -> usize {
        self.len()
    }
}

impl ElementLen for str {
    fn element_len(&self) -> usize {
        self.chars().count()
    }
}

impl ElementLen for String {
    fn element_len(&self) -> usize {
        self.as_str().element_len()
    }
}

impl<S: RawData> ElementLen for ArrayBase<S, Ix1> {
    fn element_len(&self) -> usize {
        self.len()
    }
}

impl<A> ElementLen for ResultArray<A, Ix1> {
    fn element_len(&self) -> usize {
        self.len()
    }
}

impl<T: Rows + ?Sized> Rows for &T {
    fn row_count(&self) -> Option<usize> {
        (**self).row_count()
    }
    fn row_lengths(&self) -> impl Iterator<Item = usize> + '_ {
        (**self).row_lengths()
    }
}

impl<R: ElementLen> Rows for [R] {
    fn row_count(&self) -> Option<usize> {
        Some(self.len())
    }
    fn row_lengths(&self) -> impl Iterator<Item = usize> + '_ {
        self.iter().map(ElementLen::element_len)
    }
}

impl<R: ElementLen, const N: usize> Rows for [R; N] {
    fn row_count(&self) -> Option<usize> {
        Some(N)
    }
    fn row_lengths(&self) -> impl Iterator<Item = usize> + '_ {
        self.iter().map(ElementLen::element_len)
    }
}

impl<R: ElementLen> Rows for Vec<R> {
    fn row_count(&self) -> Option<usize> {
        Some(self.len())
    }
    fn row_lengths(&self) -> impl Iterator<Item = usize> + '_ {
        self.iter().map(ElementLen::element_len)
    }
}

impl<R: ElementLen> Rows for VecDeque<R> {
    fn row_count(&self) -> Option<usize> {
        Some(self.len())
    }
    fn row_lengths(&self) -> impl Iterator<Item = usize> + '_ {
        self.iter().map(ElementLen::element_len)
    }
}

impl<S: RawData> Rows for ArrayBase<S, Ix2> {
    fn row_count(&self) -> Option<usize> {
        Some(self.nrows())
    }
    fn row_lengths(&self) -> impl Iterator<Item = usize> + '_ {
        std::iter::repeat_n(self.ncols(), self.nrows())
    }
}

impl<A> Rows for ResultArray<A, Ix2> {
    fn row_count(&self) -> Option<usize> {
        self.as_array().row_count()
    }
    fn row_lengths(&self) -> impl Iterator<Item = usize> + '_ {
        self.as_array().row_lengths()
    }
}

/// Scalars have no rows, their length cannot be determined
macro_rules! scalar_rows {
    ($($type:ty),*) => {
        $(
            impl Rows for $type {
                fn row_count(&self) -> Option<usize> {
                    None
                }
                fn row_lengths(&self) -> impl Iterator<Item = usize> + '_ {
                    std::iter::empty()
                }
            }
        )*
    };
}

scalar_rows!(bool, char, i8, i16, i32, i64, i128, isize, u8, u16, u32, u64, u128, usize, f32, f64);
