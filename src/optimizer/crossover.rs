use crate::grid::ProductId;

/// Partially-Mapped Crossover. Each child copies one parent's segment
/// between two random cut points, places the other parent's segment genes by
/// following the index chain between the parents, and fills the remainder
/// from the other parent. Both outputs are valid permutations.
pub fn pmx(
    a: &[ProductId],
    b: &[ProductId],
    rng: &mut fastrand::Rng,
) -> (Vec<ProductId>, Vec<ProductId>) {
    debug_assert_eq!(a.len(), b.len());
    let size = a.len();
    if size < 2 {
        return (a.to_vec(), b.to_vec());
    }

    let cut1 = rng.usize(0..size - 1);
    let cut2 = rng.usize(cut1 + 1..size);

    (pmx_child(a, b, cut1, cut2), pmx_child(b, a, cut1, cut2))
}

fn pmx_child(first: &[ProductId], second: &[ProductId], cut1: usize, cut2: usize) -> Vec<ProductId> {
    let size = first.len();
    let mut child: Vec<Option<ProductId>> = vec![None; size];
    let mut in_segment = vec![false; size + 1];

    for i in cut1..=cut2 {
        child[i] = Some(first[i]);
        in_segment[first[i] as usize] = true;
    }

    let mut pos_in_second = vec![0usize; size + 1];
    for (i, &v) in second.iter().enumerate() {
        pos_in_second[v as usize] = i;
    }

    // Resolve each displaced segment gene of `second` through the
    // first->second index chain until a free slot appears. Terminates for
    // any pair of permutations.
    for i in cut1..=cut2 {
        let gene = second[i];
        if in_segment[gene as usize] {
            continue;
        }
        let mut pos = i;
        loop {
            let blocking = first[pos];
            pos = pos_in_second[blocking as usize];
            if child[pos].is_none() {
                child[pos] = Some(gene);
                break;
            }
        }
    }

    child
        .into_iter()
        .enumerate()
        .map(|(i, v)| v.unwrap_or(second[i]))
        .collect()
}

/// Cycle Crossover. Indices are partitioned into cycles through the
/// parent-to-parent index mapping; children take alternating cycles from
/// alternating parents, so every gene keeps a position it held in one
/// parent.
pub fn cycle(a: &[ProductId], b: &[ProductId]) -> (Vec<ProductId>, Vec<ProductId>) {
    debug_assert_eq!(a.len(), b.len());
    let size = a.len();

    let mut pos_in_b = vec![0usize; size + 1];
    for (i, &v) in b.iter().enumerate() {
        pos_in_b[v as usize] = i;
    }

    let mut child_a = vec![0 as ProductId; size];
    let mut child_b = vec![0 as ProductId; size];
    let mut visited = vec![false; size];
    let mut cycle_idx = 0usize;

    for start in 0..size {
        if visited[start] {
            continue;
        }
        let mut pos = start;
        loop {
            visited[pos] = true;
            if cycle_idx % 2 == 0 {
                child_a[pos] = a[pos];
                child_b[pos] = b[pos];
            } else {
                child_a[pos] = b[pos];
                child_b[pos] = a[pos];
            }
            pos = pos_in_b[a[pos] as usize];
            if pos == start {
                break;
            }
        }
        cycle_idx += 1;
    }

    (child_a, child_b)
}
