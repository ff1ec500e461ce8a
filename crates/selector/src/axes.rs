//! Contains pure functions for collecting nodes along each selector axis.
//!
//! Every collector appends in document order, including the reverse axes:
//! `ancestor` yields the root first and the parent last.

use crate::node::Node;
use crate::token::Axis;

/// Collects the nodes reachable from `node` along `axis`, in document order.
pub fn collect<N: Node>(axis: Axis, node: &N) -> Vec<N> {
    let mut results = Vec::new();
    match axis {
        Axis::Absolute => results.push(node.root()),
        Axis::Ancestor => collect_ancestor_nodes(node, &mut results),
        Axis::AncestorOrSelf => collect_ancestor_or_self_nodes(node, &mut results),
        Axis::Children => collect_child_nodes(node, &mut results),
        Axis::Descendant => collect_descendant_nodes(node, &mut results),
        Axis::DescendantOrSelf => collect_descendant_or_self_nodes(node, &mut results),
        Axis::FirstChild => results.extend(node.children().next()),
        Axis::Following => collect_following_nodes(node, &mut results),
        Axis::FollowingSibling => collect_following_sibling_nodes(node, &mut results),
        Axis::LastChild => results.extend(node.children().last()),
        Axis::Parent => results.extend(node.parent()),
        Axis::Preceding => collect_preceding_nodes(node, &mut results),
        Axis::PrecedingSibling => collect_preceding_sibling_nodes(node, &mut results),
        Axis::SelfAxis => results.push(node.clone()),
    }
    results
}

pub fn collect_child_nodes<N: Node>(node: &N, results: &mut Vec<N>) {
    results.extend(node.children());
}

pub fn collect_descendant_nodes<N: Node>(node: &N, results: &mut Vec<N>) {
    for child in node.children() {
        results.push(child.clone());
        collect_descendant_nodes(&child, results);
    }
}

pub fn collect_descendant_or_self_nodes<N: Node>(node: &N, results: &mut Vec<N>) {
    results.push(node.clone());
    collect_descendant_nodes(node, results);
}

pub fn collect_ancestor_nodes<N: Node>(node: &N, results: &mut Vec<N>) {
    let start = results.len();
    let mut current = node.parent();
    while let Some(p) = current {
        current = p.parent();
        results.push(p);
    }
    results[start..].reverse();
}

pub fn collect_ancestor_or_self_nodes<N: Node>(node: &N, results: &mut Vec<N>) {
    collect_ancestor_nodes(node, results);
    results.push(node.clone());
}

pub fn collect_following_sibling_nodes<N: Node>(node: &N, results: &mut Vec<N>) {
    if let Some(parent) = node.parent() {
        results.extend(parent.children().skip_while(|sibling| sibling != node).skip(1));
    }
}

pub fn collect_preceding_sibling_nodes<N: Node>(node: &N, results: &mut Vec<N>) {
    if let Some(parent) = node.parent() {
        results.extend(parent.children().take_while(|sibling| sibling != node));
    }
}

/// Everything after `node` in document order, excluding its descendants.
pub fn collect_following_nodes<N: Node>(node: &N, results: &mut Vec<N>) {
    let mut current = Some(node.clone());
    while let Some(c) = current {
        let parent = c.parent();
        if let Some(p) = &parent {
            for sibling in p.children().skip_while(|sibling| *sibling != c).skip(1) {
                collect_descendant_or_self_nodes(&sibling, results);
            }
        }
        current = parent;
    }
}

/// Everything before `node` in document order, excluding its ancestors.
pub fn collect_preceding_nodes<N: Node>(node: &N, results: &mut Vec<N>) {
    let mut path = Vec::new();
    collect_ancestor_or_self_nodes(node, &mut path);
    // Walking down from the root keeps the output in document order.
    for c in path.iter().skip(1) {
        if let Some(p) = c.parent() {
            for sibling in p.children().take_while(|sibling| sibling != c) {
                collect_descendant_or_self_nodes(&sibling, results);
            }
        }
    }
}
