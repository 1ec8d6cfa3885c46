use crate::grid::ProductId;
use tracing::debug;

/// Swap mutation: with probability `rate`, exchange two distinct loci.
pub fn swap_mutation(genes: &mut [ProductId], rate: f64, rng: &mut fastrand::Rng) {
    if genes.len() < 2 {
        return;
    }
    if rng.f64() < rate {
        let i = rng.usize(0..genes.len());
        let mut j = rng.usize(0..genes.len());
        while j == i {
            j = rng.usize(0..genes.len());
        }
        genes.swap(i, j);
    }
}

/// True when `genes` is a permutation of 1..=len.
pub fn is_permutation(genes: &[ProductId]) -> bool {
    let n = genes.len();
    let mut seen = vec![false; n + 1];
    for &g in genes {
        if g == 0 || g as usize > n || seen[g as usize] {
            return false;
        }
        seen[g as usize] = true;
    }
    true
}

/// Deterministic permutation repair: missing ids, taken in ascending order,
/// overwrite duplicate or out-of-domain slots in ascending index order.
/// Downstream indexing assumes a bijection, so a broken offspring is never
/// allowed through. Returns true when anything changed.
pub fn repair(genes: &mut [ProductId]) -> bool {
    let n = genes.len();
    let mut count = vec![0u32; n + 1];
    for &g in genes.iter() {
        if g >= 1 && g as usize <= n {
            count[g as usize] += 1;
        }
    }

    let missing_ids: Vec<ProductId> = (1..=n as ProductId)
        .filter(|&v| count[v as usize] == 0)
        .collect();
    let mut missing = missing_ids.into_iter();
    let mut changed = false;

    for slot in 0..n {
        let g = genes[slot];
        let surplus = g == 0 || g as usize > n || count[g as usize] > 1;
        if !surplus {
            continue;
        }
        if let Some(replacement) = missing.next() {
            if g >= 1 && g as usize <= n {
                count[g as usize] -= 1;
            }
            genes[slot] = replacement;
            changed = true;
        }
    }

    if changed {
        debug!("repaired non-permutation offspring");
    }
    changed
}
