#[cfg(test)]
mod tests {
    use std::sync::Arc;
    use std::sync::atomic::{AtomicUsize, Ordering};

    use anyhow::Result;
    use arrow::array::ListArray;
    use arrow::datatypes::Float64Type;
    use ndarray::{Axis, s};
    use test_log::test;

    use crate::column::TakeColumn;
    use crate::result_array::{ResultArray, ResultHandle};
    use crate::shape::{all_same_length, is_ragged};
    use crate::type_name::{TemplatePattern, is_templated_instance, type_repr_of};

    /// native Take result counting its releases
    struct TakeResult {
        values: Vec<Vec<f64>>,
        released: Arc<AtomicUsize>,
    }

    impl Drop for TakeResult {
        fn drop(&mut self) {
            self.released.fetch_add(1, Ordering::SeqCst);
        }
    }

    fn take_result(values: Vec<Vec<f64>>) -> (Arc<TakeResult>, Arc<AtomicUsize>) {
        let released = Arc::new(AtomicUsize::new(0));
        let result = Arc::new(TakeResult {
            values,
            released: released.clone(),
        });
        (result, released)
    }

    #[test]
    fn take_result_lifetime() -> Result<()> {
        let (result, released) = take_result(vec![vec![1., 2.], vec![3., 4.], vec![5., 6.]]);
        let owner = ResultHandle::from_arc(result.clone());
        let column = TakeColumn::from_rows(&result.values, Some(owner))?;
        drop(result);
        let TakeColumn::Regular(array) = column else {
            panic!("rows have the same length");
        };
        let last_row = array.index_axis(Axis(0), 2);
        let scaled = &last_row * 10.;
        drop(array);
        drop(last_row);
        assert_eq!(released.load(Ordering::SeqCst), 0);
        assert_eq!(scaled.to_vec(), vec![50., 60.]);
        let native = scaled
            .owner()
            .and_then(|owner| owner.downcast_ref::<TakeResult>())
            .expect("owner is the take result");
        assert_eq!(native.values.len(), 3);
        drop(scaled);
        assert_eq!(released.load(Ordering::SeqCst), 1);
        Ok(())
    }

    #[test]
    fn ragged_take_result_lifetime() -> Result<()> {
        let (result, released) = take_result(vec![vec![1.], vec![2., 3.]]);
        assert!(is_ragged(&result.values));
        assert!(!all_same_length(&result.values));
        let owner = ResultHandle::from_arc(result.clone());
        let column = TakeColumn::from_rows(&result.values, Some(owner))?;
        drop(result);
        let TakeColumn::Ragged(mut rows) = column else {
            panic!("rows have different lengths");
        };
        let kept = rows.pop().expect("two rows");
        drop(rows);
        assert_eq!(released.load(Ordering::SeqCst), 0);
        assert_eq!(kept.owner().map(ResultHandle::holders), Some(1));
        drop(kept);
        assert_eq!(released.load(Ordering::SeqCst), 1);
        Ok(())
    }

    #[test]
    fn arrow_take_to_views() -> Result<()> {
        let owner = ResultHandle::new(String::from("Take<ROOT::VecOps::RVec<double>>"));
        let list = ListArray::from_iter_primitive::<Float64Type, _, _>(vec![
            Some(vec![Some(1.), Some(2.), Some(3.)]),
            Some(vec![Some(4.), Some(5.), Some(6.)]),
        ]);
        let column = TakeColumn::from_arrow_list::<Float64Type, _>(&list, Some(owner.clone()))?;
        assert!(!column.is_ragged());
        let TakeColumn::Regular(array) = column else {
            panic!("rows have the same length");
        };
        let view = array.slice(s![.., 1..]).t().reshape(4)?;
        assert_eq!(view.to_vec(), vec![2., 5., 3., 6.]);
        assert!(view.owner().is_some_and(|o| o.ptr_eq(&owner)));
        Ok(())
    }

    #[test]
    fn no_owner_stays_absent() {
        let array = ResultArray::from_vec(vec![1_u16, 2, 3, 4], None);
        let derived = array.slice(s![..;2]).mapv(u32::from);
        assert!(derived.owner().is_none());
        assert_eq!(derived.to_vec(), vec![1, 3]);
    }

    #[test]
    fn result_array_type_is_templated() {
        let array = ResultArray::from_vec(vec![0.5_f32], None);
        let type_repr = type_repr_of(&array);
        let pattern = TemplatePattern::new("rdfutils::result_array::ResultArray").unwrap();
        assert!(pattern.matches(&type_repr));
        assert!(
            pattern
                .template_arguments(&type_repr)
                .is_some_and(|args| args.starts_with("f32, "))
        );
        assert!(is_templated_instance(
            &array,
            "rdfutils::result_array::ResultArray"
        ));
    }
}
