//! Bounding Volume Hierarchy (BVH) construction.
//!
//! Builds a binary tree of `Intersectable::Branch` nodes over the bounded
//! geometries. Unbounded geometries (planes, tubes) cannot be placed in the
//! tree and sit next to it in a flat group.

use crate::geometry::Geometry;
use crate::Intersectable;
use lumen_math::BoundingBox;

/// Build an accelerated scene graph from a list of geometries.
///
/// The result set of any query equals that of a flat group over the same
/// geometries; only the number of primitives tested changes.
pub fn build(geometries: Vec<Geometry>) -> Intersectable {
    let total = geometries.len();
    let (bounded, unbounded): (Vec<_>, Vec<_>) = geometries
        .into_iter()
        .partition(|g| g.bounding_box().is_some());

    let bounded: Vec<(Geometry, BoundingBox)> = bounded
        .into_iter()
        .filter_map(|g| g.bounding_box().map(|b| (g, b)))
        .collect();
    let bounded_count = bounded.len();

    let tree = build_node(bounded);
    log::debug!(
        "BVH built: {} geometries, {} in tree (depth {}), {} unbounded",
        total,
        bounded_count,
        depth(&tree),
        unbounded.len()
    );

    if unbounded.is_empty() {
        return tree;
    }

    let mut members: Vec<Intersectable> =
        unbounded.into_iter().map(Intersectable::Primitive).collect();
    if !matches!(tree, Intersectable::Empty) {
        members.push(tree);
    }
    Intersectable::Group {
        members,
        bbox: None,
    }
}

/// Recursive median split.
///
/// The split axis is the one with the greatest spread of box centroids;
/// members are sorted along it and halved.
fn build_node(mut items: Vec<(Geometry, BoundingBox)>) -> Intersectable {
    if items.len() <= 1 {
        return items
            .pop()
            .map_or(Intersectable::Empty, |(geometry, _)| Intersectable::Primitive(geometry));
    }

    let bbox = items
        .iter()
        .skip(1)
        .fold(items[0].1, |acc, (_, b)| BoundingBox::surrounding(&acc, b));

    let axis = split_axis(&items);
    items.sort_unstable_by(|(_, a), (_, b)| {
        a.center()
            .axis(axis)
            .partial_cmp(&b.center().axis(axis))
            .unwrap_or(std::cmp::Ordering::Equal)
    });

    let mid = items.len() / 2;
    let right_items = items.split_off(mid);
    let left = build_node(items);
    let right = build_node(right_items);

    Intersectable::Branch {
        left: Box::new(left),
        right: Box::new(right),
        bbox,
    }
}

/// Axis (0=X, 1=Y, 2=Z) with the largest centroid spread.
fn split_axis(items: &[(Geometry, BoundingBox)]) -> usize {
    let centroids = items.iter().map(|(_, b)| b.center());
    let Some(bounds) = BoundingBox::enclosing(centroids) else {
        return 0;
    };
    (0..3)
        .max_by(|&a, &b| {
            bounds
                .axis_interval(a)
                .size()
                .partial_cmp(&bounds.axis_interval(b).size())
                .unwrap_or(std::cmp::Ordering::Equal)
        })
        .unwrap_or(0)
}

fn depth(node: &Intersectable) -> usize {
    match node {
        Intersectable::Empty | Intersectable::Primitive(_) => 0,
        Intersectable::Group { members, .. } => {
            1 + members.iter().map(depth).max().unwrap_or(0)
        }
        Intersectable::Branch { left, right, .. } => 1 + depth(left).max(depth(right)),
    }
}
