//! Human readable dumps of iterator trees.

use std::fmt::Write;

use crate::search_iterator::SearchIterator;

/// Renders `root` and its descendants, one node per line, indented two spaces per
/// level:
///
/// ```text
/// AndSearchNoStrict<FullUnpack> strict=false ids=[10] unpack=full
///   MultiBitVectorIteratorNoStrict<And> strict=false ids=[2,4,6] unpack=full
///   EmptySearch strict=true ids=[8]
/// ```
pub fn describe_tree(root: &dyn SearchIterator) -> String {
    let mut out = String::new();
    describe_node(root, 0, &mut out);
    out
}

fn describe_node(node: &dyn SearchIterator, depth: usize, out: &mut String) {
    let _ = write!(
        out,
        "{:indent$}{} strict={} ids={}",
        "",
        node.class_name(),
        node.is_strict(),
        node.make_id_ref_str(),
        indent = depth * 2
    );
    if let Some(multi) = node.as_multi() {
        let _ = write!(out, " unpack={}", multi.unpack_info());
    }
    out.push('\n');
    for child in node.children() {
        describe_node(&**child, depth + 1, out);
    }
}
