//! array of a taken result, tagged with the native handle that produced it
use std::ops::{Deref, Index};

use anyhow::{Context, Result};
use log::trace;
use ndarray::{
    ArcArray, Array, Axis, Dimension, IntoDimension, Ix1, NdIndex, RemoveAxis, Slice, SliceArg,
    StrideShape,
};

pub mod arrow;
mod ops;
mod owner;

pub use owner::ResultHandle;

/// Numeric array sharing its buffer between all derived values, plus the optional owner
/// handle of the computation that produced it.
/// Every derivation (slicing, indexing along an axis, reshaping, broadcasting, mapping,
/// arithmetic) carries the owner of its source so that the native result stays alive
/// as long as any of them is reachable.
#[derive(Debug)]
pub struct ResultArray<A, D: Dimension> {
    data: ArcArray<A, D>,
    owner: Option<ResultHandle>,
}

impl<A, D: Dimension> Clone for ResultArray<A, D> {
    fn clone(&self) -> Self {
        Self {
            data: self.data.clone(),
            owner: self.owner.clone(),
        }
    }
}

impl<A, D: Dimension> ResultArray<A, D> {
    /// Create a new result array from shared data and its owner
    pub fn new(data: ArcArray<A, D>, owner: Option<ResultHandle>) -> Self {
        trace!(
            "result array of shape {:?} created {}",
            data.shape(),
            if owner.is_some() {
                "with owner"
            } else {
                "without owner"
            }
        );
        Self { data, owner }
    }
    /// Create a new result array taking ownership of the data
    pub fn from_array(data: Array<A, D>, owner: Option<ResultHandle>) -> Self {
        Self::new(ArcArray::from(data), owner)
    }
    /// Create a new result array from flat values and a shape.
    /// Fails if the number of values does not match the shape.
    pub fn from_shape_vec<Sh>(shape: Sh, values: Vec<A>, owner: Option<ResultHandle>) -> Result<Self>
    where
        Sh: Into<StrideShape<D>>,
    {
        let data = Array::from_shape_vec(shape, values)
            .context("failed building result array from values")?;
        Ok(Self::from_array(data, owner))
    }
    /// Wraps data derived from `source`, inheriting its owner if it has one
    pub fn derived_from<B, E: Dimension>(source: &ResultArray<B, E>, data: ArcArray<A, D>) -> Self {
        Self {
            data,
            owner: source.owner.clone(),
        }
    }
    /// returns the owner handle, None if the array was built without one
    pub fn owner(&self) -> Option<&ResultHandle> {
        self.owner.as_ref()
    }
    pub fn has_owner(&self) -> bool {
        self.owner.is_some()
    }
    /// returns the inner shared array
    pub fn as_array(&self) -> &ArcArray<A, D> {
        &self.data
    }
    /// splits into the shared array and the owner
    pub fn into_parts(self) -> (ArcArray<A, D>, Option<ResultHandle>) {
        (self.data, self.owner)
    }
    /// Slice the array, the result shares the buffer
    pub fn slice<I>(&self, info: I) -> ResultArray<A, I::OutDim>
    where
        I: SliceArg<D>,
    {
        ResultArray::derived_from(self, self.data.clone().slice_move(info))
    }
    /// Slice along a single axis, negative steps walk the range backwards
    pub fn slice_axis(&self, axis: Axis, indices: Slice) -> Self {
        let mut data = self.data.clone();
        data.slice_axis_inplace(axis, indices);
        Self::derived_from(self, data)
    }
    /// Subview at `index` along `axis`, one dimension less
    pub fn index_axis(&self, axis: Axis, index: usize) -> ResultArray<A, D::Smaller>
    where
        D: RemoveAxis,
    {
        ResultArray::derived_from(self, self.data.clone().index_axis_move(axis, index))
    }
    /// Transposed view
    pub fn t(&self) -> Self {
        Self::derived_from(self, self.data.clone().reversed_axes())
    }
    /// Reshape in row major order.
    /// Shares the buffer when the layout is standard, copies otherwise.
    pub fn reshape<E>(&self, shape: E) -> Result<ResultArray<A, E::Dim>>
    where
        E: IntoDimension,
        A: Clone,
    {
        let shape = shape.into_dimension();
        let data = if self.data.is_standard_layout() {
            self.data.clone()
        } else {
            self.data.as_standard_layout().into_owned().into_shared()
        };
        let data = data
            .into_shape_with_order(shape)
            .with_context(|| format!("failed reshaping result array of shape {:?}", self.shape()))?;
        Ok(ResultArray::derived_from(self, data))
    }
    /// Broadcast to `shape`, None if shapes are not compatible
    pub fn broadcast<E>(&self, shape: E) -> Option<ResultArray<A, E::Dim>>
    where
        E: IntoDimension,
        A: Clone,
    {
        let view = self.data.broadcast(shape)?;
        Some(ResultArray::derived_from(self, view.to_owned().into_shared()))
    }
    /// Element wise function by reference
    pub fn map<'a, B, F>(&'a self, f: F) -> ResultArray<B, D>
    where
        F: FnMut(&'a A) -> B,
        A: 'a,
    {
        ResultArray::derived_from(self, ArcArray::from(self.data.map(f)))
    }
    /// Element wise function by value
    pub fn mapv<B, F>(&self, f: F) -> ResultArray<B, D>
    where
        F: FnMut(A) -> B,
        A: Clone,
    {
        ResultArray::derived_from(self, ArcArray::from(self.data.mapv(f)))
    }
}

impl<A> ResultArray<A, Ix1> {
    /// Create a one dimensional result array
    pub fn from_vec(values: Vec<A>, owner: Option<ResultHandle>) -> Self {
        Self::from_array(Array::from_vec(values), owner)
    }
}

impl<A, D: Dimension> Deref for ResultArray<A, D> {
    type Target = ArcArray<A, D>;

    fn deref(&self) -> &Self::Target {
        &self.data
    }
}

impl<A, D, I> Index<I> for ResultArray<A, D>
where
    D: Dimension,
    I: NdIndex<D>,
{
    type Output = A;

    fn index(&self, index: I) -> &A {
        &self.data[index]
    }
}

impl<'a, A, D: Dimension> IntoIterator for &'a ResultArray<A, D> {
    type Item = &'a A;
    type IntoIter = ndarray::iter::Iter<'a, A, D>;

    fn into_iter(self) -> Self::IntoIter {
        self.data.iter()
    }
}
