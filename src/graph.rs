//! Topological ordering of precedence graphs.
//!
//! Kahn's in-degree queue, shared by the CPM pass and the interactive
//! auto-fix. Ordering is deterministic: ties are released in input order.
//! Edges mentioning unknown nodes are ignored — the live model may hold
//! links whose endpoints were deleted in the same edit burst.
//!
//! # Reference
//! Kahn (1962), "Topological sorting of large networks";
//! Cormen et al. (2009), "Introduction to Algorithms", Ch. 22.4

use std::collections::{HashMap, VecDeque};

/// The precedence graph has no valid topological order.
///
/// Carries the nodes still caught in cycles. Callers recover by falling
/// back to input order (logged, never fatal — see `cpm` and
/// `interactive::auto_fix`).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CycleError {
    /// Nodes that could not be ordered.
    pub stuck: Vec<String>,
}

/// Orders `nodes` so every edge `(from, to)` has `from` before `to`.
///
/// `nodes` is the authoritative node set and its order breaks ties.
/// Returns [`CycleError`] when a cycle prevents a complete order.
pub fn topological_order(
    nodes: &[&str],
    edges: impl IntoIterator<Item = (String, String)>,
) -> Result<Vec<String>, CycleError> {
    let index: HashMap<&str, usize> = nodes.iter().enumerate().map(|(i, &n)| (n, i)).collect();
    let mut successors: Vec<Vec<usize>> = vec![Vec::new(); nodes.len()];
    let mut in_degree: Vec<usize> = vec![0; nodes.len()];

    for (from, to) in edges {
        let (Some(&f), Some(&t)) = (index.get(from.as_str()), index.get(to.as_str())) else {
            continue;
        };
        successors[f].push(t);
        in_degree[t] += 1;
    }

    let mut queue: VecDeque<usize> = (0..nodes.len()).filter(|&i| in_degree[i] == 0).collect();
    let mut order = Vec::with_capacity(nodes.len());

    while let Some(i) = queue.pop_front() {
        order.push(nodes[i].to_string());
        for &next in &successors[i] {
            in_degree[next] -= 1;
            if in_degree[next] == 0 {
                queue.push_back(next);
            }
        }
    }

    if order.len() == nodes.len() {
        Ok(order)
    } else {
        Err(CycleError {
            stuck: (0..nodes.len())
                .filter(|&i| in_degree[i] > 0)
                .map(|i| nodes[i].to_string())
                .collect(),
        })
    }
}
