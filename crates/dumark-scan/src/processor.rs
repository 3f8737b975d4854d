//! Size aggregation, pruning and ordering of a walked tree.

use std::cmp::Ordering;

use dumark_core::{NodeId, ProcessError, UsageTree};

/// Turn a raw walked tree into a navigable one.
///
/// 1. Every directory's size becomes the sum of its children, bottom-up.
/// 2. Children smaller than `limit` bytes are dropped from each listing.
///    Sizes were aggregated first, so totals still include them.
/// 3. Surviving children are sorted by size descending, then name ascending.
///
/// The root is never pruned. Pruned nodes stay in the arena. The tree must
/// be processed only once: a second pass would aggregate over the pruned
/// listings.
pub fn process(tree: &mut UsageTree, limit: u64) -> Result<(), ProcessError> {
    let order = post_order(tree)?;

    for &id in &order {
        if tree[id].is_dir() {
            let total: u64 = tree.children(id).iter().map(|&c| tree[c].size).sum();
            if let Some(node) = tree.get_mut(id) {
                node.size = total;
            }
        }
    }

    for &id in &order {
        if !tree[id].is_dir() {
            continue;
        }
        let mut kept: Vec<NodeId> = tree
            .children(id)
            .iter()
            .copied()
            .filter(|&c| tree[c].size >= limit)
            .collect();
        kept.sort_by(|&a, &b| display_order(tree, a, b));
        if let Some(node) = tree.get_mut(id) {
            node.children = kept;
        }
    }

    tracing::debug!(
        nodes = tree.len(),
        total = tree.total_size(),
        limit,
        "tree processed"
    );
    Ok(())
}

/// Size descending, ties by name ascending.
fn display_order(tree: &UsageTree, a: NodeId, b: NodeId) -> Ordering {
    let (a, b) = (&tree[a], &tree[b]);
    b.size.cmp(&a.size).then_with(|| a.name.cmp(&b.name))
}

/// Validate the tree and list every reachable node children-first.
fn post_order(tree: &UsageTree) -> Result<Vec<NodeId>, ProcessError> {
    let root = tree.root_node().ok_or(ProcessError::EmptyTree)?;
    if root.parent.is_some() {
        return Err(ProcessError::RootHasParent);
    }

    let mut visited = vec![false; tree.len()];
    let mut order = Vec::with_capacity(tree.len());
    let mut stack = vec![(UsageTree::ROOT, false)];
    visited[UsageTree::ROOT.index()] = true;

    while let Some((id, expanded)) = stack.pop() {
        if expanded {
            order.push(id);
            continue;
        }
        stack.push((id, true));

        let node = &tree[id];
        if node.is_file() && !node.children.is_empty() {
            return Err(ProcessError::FileWithChildren { node: id });
        }

        for &child in &node.children {
            let child_node = tree.get(child).ok_or(ProcessError::MissingChild { parent: id, child })?;
            if child_node.parent != Some(id) {
                return Err(ProcessError::BrokenParentLink {
                    parent: id,
                    child,
                    actual: child_node.parent,
                });
            }
            if std::mem::replace(&mut visited[child.index()], true) {
                return Err(ProcessError::DuplicateNode { node: child });
            }
            stack.push((child, false));
        }
    }

    Ok(order)
}
