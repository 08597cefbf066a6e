//! Stable run-merging sort that makes the same comparisons, in the same
//! order, as CPython's `list.sort` (3.11: powersort merge policy, binary
//! insertion below `minrun`, galloping merges).
//!
//! With a consistent comparator any stable sort gives the same answer. The
//! packing comparator is not transitive across orientation classes, so the
//! result depends on exactly which pairs get compared; this keeps it equal to
//! what a Python `sorted(..., key=cmp_to_key(...))` produces.

const MIN_GALLOP: usize = 7;

#[derive(Debug, Clone, Copy)]
struct Run {
    base: usize,
    len: usize,
    power: u32,
}

/// Sort `v` where `less(a, b)` means `a` goes strictly before `b`
pub(super) fn sort_by_less<T, F>(v: &mut [T], less: F)
where
    T: Copy,
    F: Fn(&T, &T) -> bool,
{
    let n = v.len();
    if n < 2 {
        return;
    }

    let mut ms = MergeState {
        v,
        less,
        tmp: Vec::new(),
        min_gallop: MIN_GALLOP,
        runs: Vec::new(),
    };

    let minrun = compute_minrun(n);
    let mut lo = 0;
    let mut remaining = n;
    while remaining > 0 {
        let (mut len, descending) = ms.count_run(lo, lo + remaining);
        if descending {
            ms.v[lo..lo + len].reverse();
        }
        if len < minrun {
            let force = remaining.min(minrun);
            ms.binary_insertion(lo, lo + force, lo + len);
            len = force;
        }

        if let Some(top) = ms.runs.last().copied() {
            let power = node_power(top.base, top.len, len, n);
            while ms.runs.len() > 1 && ms.runs[ms.runs.len() - 2].power > power {
                ms.merge_at(ms.runs.len() - 2);
            }
            if let Some(top) = ms.runs.last_mut() {
                top.power = power;
            }
        }
        ms.runs.push(Run {
            base: lo,
            len,
            power: 0,
        });

        lo += len;
        remaining -= len;
    }

    while ms.runs.len() > 1 {
        let mut i = ms.runs.len() - 2;
        if i > 0 && ms.runs[i - 1].len < ms.runs[i + 1].len {
            i -= 1;
        }
        ms.merge_at(i);
    }
}

fn compute_minrun(mut n: usize) -> usize {
    let mut r = 0;
    while n >= 64 {
        r |= n & 1;
        n >>= 1;
    }
    n + r
}

/// Depth of the boundary between run `[s1, s1+n1)` and the next `n2` items
fn node_power(s1: usize, n1: usize, n2: usize, n: usize) -> u32 {
    let mut power = 0;
    let mut a = 2 * s1 + n1;
    let mut b = a + n1 + n2;
    loop {
        power += 1;
        if a >= n {
            a -= n;
            b -= n;
        } else if b >= n {
            break;
        }
        a <<= 1;
        b <<= 1;
    }
    power
}

/// Leftmost position in `run` where `key` could be inserted
fn gallop_left<T, F: Fn(&T, &T) -> bool>(key: &T, run: &[T], hint: usize, less: &F) -> usize {
    let n = run.len();
    let mut last_ofs = 0;
    let mut ofs = 1;

    if less(&run[hint], key) {
        let max_ofs = n - hint;
        while ofs < max_ofs && less(&run[hint + ofs], key) {
            last_ofs = ofs;
            ofs = (ofs << 1) + 1;
        }
        ofs = ofs.min(max_ofs);
        last_ofs += hint + 1;
        ofs += hint;
    } else {
        let max_ofs = hint + 1;
        while ofs < max_ofs && !less(&run[hint - ofs], key) {
            last_ofs = ofs;
            ofs = (ofs << 1) + 1;
        }
        ofs = ofs.min(max_ofs);
        // `hint - ofs` may be -1 here; the +1 keeps it in range
        let lower = hint + 1 - ofs;
        ofs = hint - last_ofs;
        last_ofs = lower;
    }

    while last_ofs < ofs {
        let m = last_ofs + ((ofs - last_ofs) >> 1);
        if less(&run[m], key) {
            last_ofs = m + 1;
        } else {
            ofs = m;
        }
    }
    ofs
}

/// Rightmost position in `run` where `key` could be inserted
fn gallop_right<T, F: Fn(&T, &T) -> bool>(key: &T, run: &[T], hint: usize, less: &F) -> usize {
    let n = run.len();
    let mut last_ofs = 0;
    let mut ofs = 1;

    if less(key, &run[hint]) {
        let max_ofs = hint + 1;
        while ofs < max_ofs && less(key, &run[hint - ofs]) {
            last_ofs = ofs;
            ofs = (ofs << 1) + 1;
        }
        ofs = ofs.min(max_ofs);
        let lower = hint + 1 - ofs;
        ofs = hint - last_ofs;
        last_ofs = lower;
    } else {
        let max_ofs = n - hint;
        while ofs < max_ofs && !less(key, &run[hint + ofs]) {
            last_ofs = ofs;
            ofs = (ofs << 1) + 1;
        }
        ofs = ofs.min(max_ofs);
        last_ofs += hint + 1;
        ofs += hint;
    }

    while last_ofs < ofs {
        let m = last_ofs + ((ofs - last_ofs) >> 1);
        if less(key, &run[m]) {
            ofs = m;
        } else {
            last_ofs = m + 1;
        }
    }
    ofs
}

enum LoExit {
    Done,
    /// One item of the left run remains and belongs after all of the right run
    LastA,
}

enum HiExit {
    Done,
    /// One item of the right run remains and belongs before all of the left run
    FirstB,
}

struct MergeState<'a, T, F> {
    v: &'a mut [T],
    less: F,
    tmp: Vec<T>,
    min_gallop: usize,
    runs: Vec<Run>,
}

impl<T, F> MergeState<'_, T, F>
where
    T: Copy,
    F: Fn(&T, &T) -> bool,
{
    /// Length of the run starting at `lo`, and whether it is strictly descending
    fn count_run(&self, lo: usize, hi: usize) -> (usize, bool) {
        if lo + 1 == hi {
            return (1, false);
        }
        let less = &self.less;
        let v = &*self.v;

        let descending = less(&v[lo + 1], &v[lo]);
        let mut end = lo + 2;
        while end < hi && less(&v[end], &v[end - 1]) == descending {
            end += 1;
        }
        (end - lo, descending)
    }

    /// Insert `v[start..hi]` one by one into the sorted prefix `v[lo..start]`
    fn binary_insertion(&mut self, lo: usize, hi: usize, start: usize) {
        let less = &self.less;
        let v = &mut *self.v;

        let start = if lo == start { start + 1 } else { start };
        for i in start..hi {
            let pivot = v[i];
            let (mut l, mut r) = (lo, i);
            while l < r {
                let p = l + ((r - l) >> 1);
                if less(&pivot, &v[p]) {
                    r = p;
                } else {
                    l = p + 1;
                }
            }
            v.copy_within(l..i, l + 1);
            v[l] = pivot;
        }
    }

    fn merge_at(&mut self, i: usize) {
        let Run { base: pa, len: na, .. } = self.runs[i];
        let Run { base: pb, len: nb, .. } = self.runs[i + 1];
        self.runs[i].len = na + nb;
        self.runs.remove(i + 1);

        // Items of the left run already below the right run's first stay put
        let k = gallop_right(&self.v[pb], &self.v[pa..pa + na], 0, &self.less);
        let pa = pa + k;
        let na = na - k;
        if na == 0 {
            return;
        }

        // Items of the right run above the left run's last stay put
        let nb = gallop_left(&self.v[pa + na - 1], &self.v[pb..pb + nb], nb - 1, &self.less);
        if nb == 0 {
            return;
        }

        if na <= nb {
            self.merge_lo(pa, na, pb, nb);
        } else {
            self.merge_hi(pa, na, pb, nb);
        }
    }

    /// Merge from the left, buffering the (shorter) left run
    fn merge_lo(&mut self, pa: usize, na: usize, pb: usize, nb: usize) {
        self.tmp.clear();
        self.tmp.extend_from_slice(&self.v[pa..pa + na]);

        let less = &self.less;
        let tmp = &self.tmp;
        let v = &mut *self.v;

        let a_end = na;
        let b_end = pb + nb;
        let mut ia = 0;
        let mut pb = pb;
        let mut dest = pa;

        v[dest] = v[pb];
        dest += 1;
        pb += 1;

        let mut mg = self.min_gallop;
        let exit = 'merge: {
            if pb == b_end {
                break 'merge LoExit::Done;
            }
            if a_end - ia == 1 {
                break 'merge LoExit::LastA;
            }

            loop {
                let mut acount = 0;
                let mut bcount = 0;
                loop {
                    if less(&v[pb], &tmp[ia]) {
                        v[dest] = v[pb];
                        dest += 1;
                        pb += 1;
                        bcount += 1;
                        acount = 0;
                        if pb == b_end {
                            break 'merge LoExit::Done;
                        }
                        if bcount >= mg {
                            break;
                        }
                    } else {
                        v[dest] = tmp[ia];
                        dest += 1;
                        ia += 1;
                        acount += 1;
                        bcount = 0;
                        if a_end - ia == 1 {
                            break 'merge LoExit::LastA;
                        }
                        if acount >= mg {
                            break;
                        }
                    }
                }

                mg += 1;
                loop {
                    mg -= usize::from(mg > 1);
                    self.min_gallop = mg;

                    let k = gallop_right(&v[pb], &tmp[ia..a_end], 0, less);
                    acount = k;
                    if k > 0 {
                        v[dest..dest + k].copy_from_slice(&tmp[ia..ia + k]);
                        dest += k;
                        ia += k;
                        if a_end - ia == 1 {
                            break 'merge LoExit::LastA;
                        }
                        // Only reachable with an inconsistent comparator
                        if ia == a_end {
                            break 'merge LoExit::Done;
                        }
                    }
                    v[dest] = v[pb];
                    dest += 1;
                    pb += 1;
                    if pb == b_end {
                        break 'merge LoExit::Done;
                    }

                    let k = gallop_left(&tmp[ia], &v[pb..b_end], 0, less);
                    bcount = k;
                    if k > 0 {
                        v.copy_within(pb..pb + k, dest);
                        dest += k;
                        pb += k;
                        if pb == b_end {
                            break 'merge LoExit::Done;
                        }
                    }
                    v[dest] = tmp[ia];
                    dest += 1;
                    ia += 1;
                    if a_end - ia == 1 {
                        break 'merge LoExit::LastA;
                    }

                    if acount < MIN_GALLOP && bcount < MIN_GALLOP {
                        break;
                    }
                }
                mg += 1;
                self.min_gallop = mg;
            }
        };

        match exit {
            LoExit::Done => {
                let rest = a_end - ia;
                v[dest..dest + rest].copy_from_slice(&tmp[ia..a_end]);
            }
            LoExit::LastA => {
                let rest = b_end - pb;
                v.copy_within(pb..b_end, dest);
                v[dest + rest] = tmp[ia];
            }
        }
    }

    /// Merge from the right, buffering the (shorter) right run.
    ///
    /// `dest`, `a_end` and `b_end` are exclusive ends of the unwritten output,
    /// the unmerged left run `v[pa..a_end]` and the unmerged `tmp[..b_end]`.
    fn merge_hi(&mut self, pa: usize, na: usize, pb: usize, nb: usize) {
        self.tmp.clear();
        self.tmp.extend_from_slice(&self.v[pb..pb + nb]);

        let less = &self.less;
        let tmp = &self.tmp;
        let v = &mut *self.v;

        let mut a_end = pa + na;
        let mut b_end = nb;
        let mut dest = pb + nb;

        dest -= 1;
        a_end -= 1;
        v[dest] = v[a_end];

        let mut mg = self.min_gallop;
        let exit = 'merge: {
            if a_end == pa {
                break 'merge HiExit::Done;
            }
            if b_end == 1 {
                break 'merge HiExit::FirstB;
            }

            loop {
                let mut acount = 0;
                let mut bcount = 0;
                loop {
                    if less(&tmp[b_end - 1], &v[a_end - 1]) {
                        dest -= 1;
                        a_end -= 1;
                        v[dest] = v[a_end];
                        acount += 1;
                        bcount = 0;
                        if a_end == pa {
                            break 'merge HiExit::Done;
                        }
                        if acount >= mg {
                            break;
                        }
                    } else {
                        dest -= 1;
                        b_end -= 1;
                        v[dest] = tmp[b_end];
                        bcount += 1;
                        acount = 0;
                        if b_end == 1 {
                            break 'merge HiExit::FirstB;
                        }
                        if bcount >= mg {
                            break;
                        }
                    }
                }

                mg += 1;
                loop {
                    mg -= usize::from(mg > 1);
                    self.min_gallop = mg;

                    let na = a_end - pa;
                    let k = na - gallop_right(&tmp[b_end - 1], &v[pa..a_end], na - 1, less);
                    acount = k;
                    if k > 0 {
                        dest -= k;
                        a_end -= k;
                        v.copy_within(a_end..a_end + k, dest);
                        if a_end == pa {
                            break 'merge HiExit::Done;
                        }
                    }
                    dest -= 1;
                    b_end -= 1;
                    v[dest] = tmp[b_end];
                    if b_end == 1 {
                        break 'merge HiExit::FirstB;
                    }

                    let k = b_end - gallop_left(&v[a_end - 1], &tmp[..b_end], b_end - 1, less);
                    bcount = k;
                    if k > 0 {
                        dest -= k;
                        b_end -= k;
                        v[dest..dest + k].copy_from_slice(&tmp[b_end..b_end + k]);
                        if b_end == 1 {
                            break 'merge HiExit::FirstB;
                        }
                        // Only reachable with an inconsistent comparator
                        if b_end == 0 {
                            break 'merge HiExit::Done;
                        }
                    }
                    dest -= 1;
                    a_end -= 1;
                    v[dest] = v[a_end];
                    if a_end == pa {
                        break 'merge HiExit::Done;
                    }

                    if acount < MIN_GALLOP && bcount < MIN_GALLOP {
                        break;
                    }
                }
                mg += 1;
                self.min_gallop = mg;
            }
        };

        match exit {
            HiExit::Done => {
                v[dest - b_end..dest].copy_from_slice(&tmp[..b_end]);
            }
            HiExit::FirstB => {
                let na = a_end - pa;
                v.copy_within(pa..a_end, dest - na);
                v[dest - na - 1] = tmp[0];
            }
        }
    }
}
