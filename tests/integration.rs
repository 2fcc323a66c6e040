use approx::assert_relative_eq;
use num_complex::Complex64;
use rand::{rngs::StdRng, Rng, SeedableRng};
use tiled_rs::pmap::derive_seed;
use tiled_rs::{
    AssignmentPlan, BlockEngine, BlockExpr, BlockExprError, BlockView, CollectingSink,
    ElementOp, HashPmap, LocalArray, LocalEngine, Pmap, ProcessGroup,
    RankGatedSink, TileRange,
};

/// Writes only the destination tiles owned by one rank of a hash map.
///
/// Running it once per rank of a group must reproduce a single
/// unrestricted assignment.
struct OwnerEngine<'p> {
    pmap: &'p HashPmap,
}

fn ordinal(range: &TileRange, index: &[usize]) -> usize {
    let extents = range.extents();
    index
        .iter()
        .zip(range.lower())
        .zip(&extents)
        .fold(0, |acc, ((i, l), e)| acc * e + (i - l))
}

impl BlockEngine<LocalArray<f64>> for OwnerEngine<'_> {
    fn evaluate_into(
        &self,
        plan: &AssignmentPlan,
        expr: &BlockExpr<'_, LocalArray<f64>>,
        dest: &BlockView<'_, LocalArray<f64>>,
    ) -> tiled_rs::expr::Result<()> {
        let array = dest.array();
        let scratch = LocalArray::<f64>::zeros(array.range().clone());
        let staged = BlockView::new_unchecked(
            &scratch,
            dest.annotation().clone(),
            dest.lower_bound(),
            dest.upper_bound(),
        );
        LocalEngine.evaluate_into(plan, expr, &staged)?;

        let (lower, upper) = (dest.lower_bound(), dest.upper_bound());
        for i in lower[0]..upper[0] {
            for j in lower[1]..upper[1] {
                let index = [i, j];
                if self.pmap.is_local(ordinal(array.range(), &index)) {
                    let value = scratch.get(&index).unwrap_or_default();
                    array.set(&index, value)?;
                }
            }
        }
        Ok(())
    }
}

#[test]
fn test_owner_computes_assignment_matches_local() {
    let extents = [5, 6];
    let range = TileRange::from_extents(&extents);
    let size = range.volume();
    let a = LocalArray::from_fn(range.clone(), |i| (i[0] * 10 + i[1]) as f64);
    let expected = LocalArray::<f64>::zeros(range.clone());
    let distributed = LocalArray::<f64>::zeros(range.clone());

    let src = BlockView::new(&a, "i,j", &[1, 0], &[4, 4]).unwrap();
    BlockView::new(&expected, "j,i", &[0, 2], &[4, 5])
        .unwrap()
        .assign(src.clone() * 3.0, &LocalEngine)
        .unwrap();

    let procs = 3;
    let dst = BlockView::new(&distributed, "j,i", &[0, 2], &[4, 5]).unwrap();
    for group in ProcessGroup::new(0, procs).unwrap().peers() {
        let mut pmap = HashPmap::new(group, size);
        pmap.set_seed(derive_seed(&extents));
        dst.assign(src.clone() * 3.0, &OwnerEngine { pmap: &pmap })
            .unwrap();
    }

    assert_eq!(distributed.to_vec(), expected.to_vec());
}

#[test]
fn test_partial_ranks_leave_unowned_tiles() {
    let range = TileRange::from_extents(&[4, 4]);
    let a = LocalArray::from_fn(range.clone(), |_| 1.0);
    let b = LocalArray::<f64>::zeros(range.clone());

    let mut pmap = HashPmap::new(ProcessGroup::new(0, 2).unwrap(), range.volume());
    pmap.set_seed(7);
    BlockView::full(&b, "i,j")
        .unwrap()
        .assign(BlockView::full(&a, "i,j").unwrap(), &OwnerEngine { pmap: &pmap })
        .unwrap();

    for i in 0..4 {
        for j in 0..4 {
            let owned = pmap.owner(i * 4 + j) == 0;
            assert_eq!(b.get(&[i, j]), Some(if owned { 1.0 } else { 0.0 }));
        }
    }
}

#[cfg(not(feature = "unchecked"))]
#[test]
fn test_only_reporting_rank_prints_diagnostics() {
    let a = LocalArray::<f64>::zeros(TileRange::from_extents(&[4, 4]));
    let sinks: Vec<_> = ProcessGroup::new(0, 4)
        .unwrap()
        .peers()
        .map(|group| RankGatedSink::new(group, CollectingSink::new()))
        .collect();

    for sink in &sinks {
        let err = BlockView::with_sink(&a, "i,j", &[0, 0], &[5, 4], sink).unwrap_err();
        assert!(matches!(err, BlockExprError::InvalidBlockRange { .. }));
    }

    assert_eq!(sinks[0].inner().len(), 1);
    assert!(sinks[0].inner().messages()[0].contains("not a sub-block"));
    for sink in &sinks[1..] {
        assert!(sink.inner().is_empty());
    }
}

#[test]
fn test_scaled_conjugated_assignment_with_random_scalars() {
    let mut rng = StdRng::seed_from_u64(11);
    let range = TileRange::from_extents(&[3, 4]);
    let a = LocalArray::from_fn(range.clone(), |_| {
        Complex64::new(rng.gen_range(-1.0..1.0), rng.gen_range(-1.0..1.0))
    });
    let out = LocalArray::<Complex64>::zeros(range.clone());
    let src = BlockView::full(&a, "i,j").unwrap();
    let dst = BlockView::full(&out, "i,j").unwrap();

    for _ in 0..10 {
        let s = Complex64::new(rng.gen_range(-2.0..2.0), rng.gen_range(-2.0..2.0));
        let t = Complex64::new(rng.gen_range(-2.0..2.0), rng.gen_range(-2.0..2.0));
        // conj(s * x) * t, negated twice
        let expr = -(-((src.clone() * s).conj() * t));
        assert_eq!(expr.op(), ElementOp::Conj);
        dst.assign(expr, &LocalEngine).unwrap();

        for (x, y) in a.to_vec().iter().zip(out.to_vec()) {
            let want = (s * x).conj() * t;
            assert_relative_eq!(y.re, want.re, epsilon = 1e-12);
            assert_relative_eq!(y.im, want.im, epsilon = 1e-12);
        }
    }
}

#[test]
fn test_expression_tree_sum_of_blocks() {
    let range = TileRange::from_extents(&[2, 6]);
    let a = LocalArray::from_fn(range.clone(), |i| (i[0] * 6 + i[1]) as f64);
    let out = LocalArray::<f64>::zeros(TileRange::from_extents(&[2, 2]));

    let left = BlockView::new(&a, "i,j", &[0, 0], &[2, 2]).unwrap();
    let mid = BlockView::new(&a, "i,j", &[0, 2], &[2, 4]).unwrap();
    let right = BlockView::new(&a, "i,j", &[0, 4], &[2, 6]).unwrap();

    let expr = left + mid * 2.0 - right.conj();
    assert_eq!(expr.num_leaves(), 3);
    BlockView::full(&out, "i,j")
        .unwrap()
        .assign(expr, &LocalEngine)
        .unwrap();

    for i in 0..2 {
        for j in 0..2 {
            let at = |c: usize| (i * 6 + c) as f64;
            assert_eq!(out.get(&[i, j]), Some(at(j) + 2.0 * at(j + 2) - at(j + 4)));
        }
    }
}

#[test]
fn test_pmap_seed_reuse_across_shapes() {
    let group = ProcessGroup::new(0, 4).unwrap();
    let mut square = HashPmap::new(group, 64);
    let mut wide = HashPmap::new(group, 64);
    square.set_seed(derive_seed(&[8, 8]));
    wide.set_seed(derive_seed(&[4, 16]));
    assert_ne!(square.seed(), wide.seed());
    assert_ne!(square.local(), wide.local());

    let boxed: Box<dyn Pmap> = Pmap::clone_unseeded(&square);
    assert_eq!(boxed.seed(), 0);
    assert!(boxed.is_empty());
    assert_eq!(square.local_size() > 0, !square.is_empty());
}
