//! The rewrite pass that fuses bit-vector children of boolean composites.
//!
//! The tree is processed bottom-up. At every AND, OR and AND-NOT node the
//! [`BitVectorIterator`](crate::BitVectorIterator) children are gathered in their
//! original order, whether adjacent or not, and replaced by a single
//! [`MultiBitVectorIterator`] placed at the position of the first gathered child:
//!
//! - AND gathers every bit-vector child into an AND-fused node.
//! - OR gathers every bit-vector child into an OR-fused node.
//! - AND-NOT whose positive child is a bit vector first gathers it together with
//!   the bit-vector negatives into an AND-fused node over the complemented
//!   negatives. Negatives covering fewer documents than the positive are skipped.
//! - AND-NOT then gathers its remaining bit-vector negatives into an OR-fused
//!   node.
//!
//! Fused nodes are never gathered again, so optimizing an optimized tree changes
//! nothing.

use crate::{
    config::OptimizerConfig,
    multi_bit_vector::{BitOp, BitSource, MultiBitVectorIterator},
    multi_search::MultiSearch,
    search_iterator::{IteratorKind, SearchIterator},
    unpack_info::UnpackInfo,
};

/// Optimizes `root` with the default [`OptimizerConfig`].
///
/// Never fails. When nothing can be fused the same root allocation is returned.
pub fn optimize(root: Box<dyn SearchIterator>) -> Box<dyn SearchIterator> {
    optimize_with(root, &OptimizerConfig::default())
}

/// Optimizes `root` with an explicit configuration.
pub fn optimize_with(
    root: Box<dyn SearchIterator>,
    config: &OptimizerConfig,
) -> Box<dyn SearchIterator> {
    if !config.enabled {
        log::trace!("bit vector fusion disabled, keeping {}", root.class_name());
        return root;
    }
    optimize_node(root, config)
}

fn optimize_node(
    mut node: Box<dyn SearchIterator>,
    config: &OptimizerConfig,
) -> Box<dyn SearchIterator> {
    match node.kind() {
        IteratorKind::And | IteratorKind::Or | IteratorKind::AndNot => {
            node.transform_children(&mut |child| optimize_node(child, config));
            fuse_children(node, config)
        }
        _ => node,
    }
}

/// One gathering rule applied to the children of a composite.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Step {
    /// Every bit-vector child.
    All(BitOp),
    /// A bit-vector positive together with the negatives covering at least as
    /// many documents, complemented.
    Positive,
    /// The bit-vector negatives still present.
    Negatives,
}

/// The children of a composite selected for fusion.
struct Plan {
    op: BitOp,
    indices: Vec<usize>,
    /// Members at these positions of `indices` take part complemented.
    negated_from: usize,
    /// Only the member at position 0 of `indices` may need unpack.
    positive_only_unpack: bool,
}

fn steps(kind: IteratorKind) -> &'static [Step] {
    match kind {
        IteratorKind::And => &[Step::All(BitOp::And)],
        IteratorKind::Or => &[Step::All(BitOp::Or)],
        IteratorKind::AndNot => &[Step::Positive, Step::Negatives],
        _ => &[],
    }
}

fn plan(step: Step, multi: &MultiSearch) -> Option<Plan> {
    let children = multi.children();
    let bit_vectors = |from: usize| {
        (from..children.len())
            .filter(|&i| children[i].as_bit_vector().is_some())
            .collect::<Vec<_>>()
    };
    match step {
        Step::All(op) => Some(Plan {
            op,
            indices: bit_vectors(0),
            negated_from: usize::MAX,
            positive_only_unpack: false,
        }),
        Step::Positive => {
            let limit = children.first()?.as_bit_vector()?.doc_id_limit();
            let mut indices = vec![0];
            indices.extend(bit_vectors(1).into_iter().filter(|&i| {
                children[i]
                    .as_bit_vector()
                    .is_some_and(|negative| negative.doc_id_limit() >= limit)
            }));
            Some(Plan {
                op: BitOp::And,
                indices,
                negated_from: 1,
                positive_only_unpack: true,
            })
        }
        Step::Negatives => Some(Plan {
            op: BitOp::Or,
            indices: bit_vectors(1),
            negated_from: usize::MAX,
            positive_only_unpack: true,
        }),
    }
}

/// Applies the gathering rules of `node`'s kind in order. Every rule only
/// gathers plain bit-vector children, so the rules leave nothing behind that a
/// later pass could still fuse.
fn fuse_children(
    mut node: Box<dyn SearchIterator>,
    config: &OptimizerConfig,
) -> Box<dyn SearchIterator> {
    for &step in steps(node.kind()) {
        node = match fuse_step(node, step, config) {
            Fused::Into(node) => node,
            Fused::Replaced(fused) => return fused,
        };
    }
    node
}

enum Fused {
    /// The (possibly rewritten) composite.
    Into(Box<dyn SearchIterator>),
    /// The fused node standing in for a composite left without other children.
    Replaced(Box<dyn SearchIterator>),
}

fn fuse_step(mut node: Box<dyn SearchIterator>, step: Step, config: &OptimizerConfig) -> Fused {
    let class_name = node.class_name();
    let id = node.id();
    let Some(multi) = node.as_multi_mut() else {
        return Fused::Into(node);
    };
    if multi.children().len() < 2 {
        return Fused::Into(node);
    }
    let Some(plan) = plan(step, multi) else {
        return Fused::Into(node);
    };
    if plan.indices.len() < config.min_bit_vectors {
        log::trace!(
            "{class_name}: {} bit vector children for {step:?}, not fusing",
            plan.indices.len()
        );
        return Fused::Into(node);
    }

    let mut unpack_info = UnpackInfo::new();
    if multi.unpack_info().unpack_all() && !plan.positive_only_unpack {
        unpack_info.force_all();
    } else {
        for (member, &index) in plan.indices.iter().enumerate() {
            let unpackable = !plan.positive_only_unpack || index == 0;
            if unpackable && multi.need_unpack(index) {
                unpack_info.add(member);
            }
        }
    }

    let sources = plan
        .indices
        .iter()
        .enumerate()
        .filter_map(|(member, &index)| {
            multi.children()[index]
                .as_bit_vector()
                .map(|bit_vector| BitSource::of(bit_vector, member >= plan.negated_from))
        })
        .collect::<Vec<_>>();
    let mut members = plan
        .indices
        .iter()
        .rev()
        .map(|&index| multi.remove(index))
        .collect::<Vec<_>>();
    members.reverse();

    let position = plan.indices[0];
    let mut fused = MultiBitVectorIterator::new(plan.op, members, sources, unpack_info);
    log::debug!(
        "{class_name}: fused {} bit vector children at position {position} into {}",
        plan.indices.len(),
        fused.class_name()
    );
    if multi.children().is_empty() {
        fused.set_id(id);
        return Fused::Replaced(Box::new(fused));
    }
    multi.insert(position, Box::new(fused));
    Fused::Into(node)
}
