//! Lexicographic k-combination enumeration over index ranges.

/// Number of k-subsets of an n-set, or `None` if it does not fit in a `u64`.
pub fn binomial(n: usize, k: usize) -> Option<u64> {
    if k > n {
        return Some(0);
    }
    let k = k.min(n - k);
    let mut acc: u128 = 1;
    for i in 0..k {
        // acc * (n - i) / (i + 1) is exact at every step: acc is C(n, i).
        acc = acc.checked_mul((n - i) as u128)? / (i as u128 + 1);
    }
    u64::try_from(acc).ok()
}

/// Iterator over every `k`-element subset of `0..n`, as ascending index
/// vectors, in lexicographic order.
///
/// `(0..4, k=2)` yields `[0,1] [0,2] [0,3] [1,2] [1,3] [2,3]`.
#[derive(Clone, Debug)]
pub struct Combinations {
    n:       usize,
    indices: Vec<usize>,
    started: bool,
    done:    bool,
}

impl Combinations {
    pub fn new(n: usize, k: usize) -> Self {
        Self {
            n,
            indices: (0..k).collect(),
            started: false,
            done:    k > n,
        }
    }

    /// Advance `indices` to the next combination in place.
    fn advance(&mut self) -> bool {
        let k = self.indices.len();
        let n = self.n;
        // Rightmost position that can still move right.
        let Some(i) = (0..k).rev().find(|&i| self.indices[i] < n - k + i) else {
            return false;
        };
        self.indices[i] += 1;
        for j in i + 1..k {
            self.indices[j] = self.indices[j - 1] + 1;
        }
        true
    }
}

impl Iterator for Combinations {
    type Item = Vec<usize>;

    fn next(&mut self) -> Option<Vec<usize>> {
        if self.done {
            return None;
        }
        if !self.started {
            self.started = true;
        } else if !self.advance() {
            self.done = true;
            return None;
        }
        Some(self.indices.clone())
    }
}
