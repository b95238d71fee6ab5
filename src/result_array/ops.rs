//! arithmetic on result arrays, outputs inherit the owner
use std::ops::{Add, Div, Mul, Sub};

use ndarray::{DimMax, Dimension, ScalarOperand};

use super::ResultArray;

/// Implements element wise operators between two result arrays of same dimensionality
/// and between a result array and a scalar.
/// Output owner is the left operand's one, or the right operand's if the left has none.
macro_rules! result_array_binary_op {
    ($trt:ident, $mth:ident) => {
        impl<'a, A, D> $trt<&'a ResultArray<A, D>> for &'a ResultArray<A, D>
        where
            A: Clone + $trt<A, Output = A>,
            D: Dimension + DimMax<D, Output = D>,
        {
            type Output = ResultArray<A, D>;

            fn $mth(self, rhs: &'a ResultArray<A, D>) -> Self::Output {
                let data = $trt::$mth(self.as_array(), rhs.as_array());
                let source = if self.has_owner() { self } else { rhs };
                ResultArray::derived_from(source, data.into_shared())
            }
        }

        impl<'a, A, D> $trt<A> for &'a ResultArray<A, D>
        where
            A: Clone + ScalarOperand + $trt<A, Output = A>,
            D: Dimension,
        {
            type Output = ResultArray<A, D>;

            fn $mth(self, rhs: A) -> Self::Output {
                let data = $trt::$mth(self.as_array(), rhs);
                ResultArray::derived_from(self, data.into_shared())
            }
        }
    };
}

result_array_binary_op!(Add, add);
result_array_binary_op!(Sub, sub);
result_array_binary_op!(Mul, mul);
result_array_binary_op!(Div, div);
