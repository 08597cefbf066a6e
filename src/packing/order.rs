use std::cmp::Ordering;

use super::timsort::sort_by_less;

/// Compare two item sizes for packing order.
///
/// Two landscape items (`w > h`) put the taller one first, two portrait items
/// (`h > w`) put the wider one first. Any other pairing, including squares,
/// puts the larger area first. `Equal` means "keep input order".
///
/// The orientation branches make this relation non-transitive across classes,
/// so it must only be fed to [`packing_order`], never to `slice::sort_by`,
/// which may panic or pick a different order on an inconsistent comparator.
pub fn compare_sizes(a: (u32, u32), b: (u32, u32)) -> Ordering {
    let (aw, ah) = a;
    let (bw, bh) = b;

    if aw > ah && bw > bh {
        bh.cmp(&ah)
    } else if ah > aw && bh > bw {
        bw.cmp(&aw)
    } else {
        let area_a = u64::from(aw) * u64::from(ah);
        let area_b = u64::from(bw) * u64::from(bh);
        area_b.cmp(&area_a)
    }
}

/// Stable packing order for `sizes`, as a permutation of input indices.
///
/// Because [`compare_sizes`] can form cycles, the order is defined by the
/// exact comparisons the run-merging sort makes, not just by the relation.
pub fn packing_order(sizes: &[(u32, u32)]) -> Vec<usize> {
    let mut indices: Vec<usize> = (0..sizes.len()).collect();
    sort_by_less(&mut indices, |a, b| {
        compare_sizes(sizes[*a], sizes[*b]) == Ordering::Less
    });
    indices
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_landscape_pair_orders_by_height() {
        assert_eq!(compare_sizes((20, 15), (30, 10)), Ordering::Less);
        assert_eq!(compare_sizes((30, 10), (20, 15)), Ordering::Greater);
        assert_eq!(packing_order(&[(30, 10), (20, 15)]), vec![1, 0]);
    }

    #[test]
    fn test_portrait_pair_orders_by_width() {
        assert_eq!(packing_order(&[(10, 30), (15, 20)]), vec![1, 0]);
    }

    #[test]
    fn test_mixed_orientation_orders_by_area() {
        // Portrait area 300 vs landscape area 400
        assert_eq!(packing_order(&[(10, 30), (40, 10)]), vec![1, 0]);
        // Square against landscape falls back to area too
        assert_eq!(packing_order(&[(10, 10), (30, 5)]), vec![1, 0]);
    }

    #[test]
    fn test_equal_area_mixed_pair_keeps_input_order() {
        assert_eq!(packing_order(&[(100, 50), (50, 100)]), vec![0, 1]);
        assert_eq!(packing_order(&[(50, 100), (100, 50)]), vec![0, 1]);
    }

    #[test]
    fn test_not_equivalent_to_area_sort() {
        // Both landscape: the shorter-but-larger item goes last
        let sizes = [(200, 5), (20, 10)];
        assert_eq!(packing_order(&sizes), vec![1, 0]);
    }

    #[test]
    fn test_ties_are_stable() {
        let sizes = [(16, 16), (8, 8), (16, 16), (8, 8), (16, 16)];
        assert_eq!(packing_order(&sizes), vec![0, 2, 4, 1, 3]);
        // Same multiset, same answer every time
        assert_eq!(packing_order(&sizes), packing_order(&sizes));
    }

    #[test]
    fn test_inconsistent_comparator_does_not_panic() {
        // (10,9) before (100,1) by height, (100,1) before (5,19) by area and
        // (5,19) before (10,9) by area: a cycle across orientation classes
        let sizes = [(10, 9), (100, 1), (5, 19), (10, 9), (100, 1), (5, 19), (1, 1)];
        let order = packing_order(&sizes);

        assert_eq!(order, vec![0, 1, 2, 3, 4, 5, 6]);
        assert_eq!(order, packing_order(&sizes));
    }

    #[test]
    fn test_cyclic_sizes_follow_run_merging_order() {
        // (20,15) before (100,10) by height, (100,10) before (18,18) by area
        // and (18,18) before (20,15) by area. The input opens with a
        // descending pair, which gets reversed before insertion.
        assert_eq!(packing_order(&[(100, 10), (20, 15), (18, 18)]), vec![2, 1, 0]);

        let sizes = [(40, 17), (10, 3), (22, 21), (24, 9), (25, 25), (30, 34)];
        assert_eq!(packing_order(&sizes), vec![5, 2, 0, 4, 3, 1]);

        let sizes = [(5, 28), (8, 29), (34, 17), (7, 34), (24, 24), (29, 19)];
        assert_eq!(packing_order(&sizes), vec![2, 4, 5, 1, 3, 0]);

        let sizes = [(26, 13), (35, 34), (11, 37), (12, 13), (17, 24)];
        assert_eq!(packing_order(&sizes), vec![1, 4, 3, 2, 0]);
    }

    #[test]
    fn test_cyclic_sizes_across_merged_runs() {
        // Long enough for two runs and a galloping merge
        let sizes: Vec<(u32, u32)> = (0..70u32)
            .map(|i| {
                if i % 20 < 12 {
                    ((i * 13) % 9 + 1, (i * 5) % 11 + 1)
                } else {
                    ((i * 7) % 40 + 1, (i * 3) % 40 + 1)
                }
            })
            .collect();

        let expected = vec![
            39, 38, 34, 33, 37, 36, 13, 53, 32, 17, 57, 16, 56, 19, 59, 2, 4, 6, 18, 58, 8, 35,
            1, 10, 12, 15, 24, 26, 14, 28, 46, 52, 65, 55, 67, 47, 54, 48, 69, 68, 49, 60, 3, 21,
            30, 29, 50, 40, 41, 51, 20, 42, 5, 23, 31, 43, 61, 62, 64, 11, 22, 7, 25, 44, 9, 27,
            45, 63, 66, 0,
        ];
        assert_eq!(packing_order(&sizes), expected);
    }

    #[test]
    fn test_empty_and_single() {
        assert!(packing_order(&[]).is_empty());
        assert_eq!(packing_order(&[(3, 4)]), vec![0]);
    }
}
