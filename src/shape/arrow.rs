//! rows of arrow list arrays
use arrow::array::{Array, FixedSizeListArray, GenericListArray, OffsetSizeTrait};

use super::Rows;

impl<O: OffsetSizeTrait> Rows for GenericListArray<O> {
    fn row_count(&self) -> Option<usize> {
        Some(self.len())
    }
    fn row_lengths(&self) -> impl Iterator<Item = usize> + '_ {
        // null entries count as empty rows
        self.value_offsets()
            .windows(2)
            .map(|bounds| bounds[1].as_usize() - bounds[0].as_usize())
    }
}

impl Rows for FixedSizeListArray {
    fn row_count(&self) -> Option<usize> {
        Some(self.len())
    }
    fn row_lengths(&self) -> impl Iterator<Item = usize> + '_ {
        let width = usize::try_from(self.value_length()).unwrap_or_default();
        std::iter::repeat_n(width, self.len())
    }
}
