//! Navigator contract
//!
//! The engine never sees a concrete tree. It walks whatever the caller
//! exposes through [`NodeNavigator`], snapshotting positions with `clone`
//! while it explores alternative paths.

/// Node categories the engine distinguishes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum NodeType {
    /// The document (or anything folded into it)
    Root,
    Element,
    Attribute,
    Text,
    Comment,
}

/// A movable cursor over a tree.
///
/// Every `move_*` method returns `false` and leaves the cursor unchanged
/// when the move is impossible.
pub trait NodeNavigator: Clone {
    /// Category of the node at the current position
    fn node_type(&self) -> NodeType;

    /// Local name of the current node
    fn local_name(&self) -> &str;

    /// Namespace prefix of the current node
    fn prefix(&self) -> &str;

    /// String value of the current node
    fn value(&self) -> String;

    /// Return to the node the navigator was created on
    fn move_to_root(&mut self);

    fn move_to_parent(&mut self) -> bool;

    /// Advance to the next attribute of the current element
    fn move_to_next_attribute(&mut self) -> bool;

    /// Move to the first child
    fn move_to_child(&mut self) -> bool;

    /// Move to the first sibling in document order
    fn move_to_first(&mut self) -> bool;

    fn move_to_next(&mut self) -> bool;

    fn move_to_previous(&mut self) -> bool;

    /// Adopt the position of `other` if both navigate the same tree
    fn move_to(&mut self, other: &Self) -> bool;

    /// Whether both cursors denote the same node
    fn is_same_position(&self, other: &Self) -> bool;

    /// Sort key for the current position in document order, if the tree
    /// keeps one. Distinct positions must get distinct keys, and an
    /// element's attributes sort after it and before its children.
    ///
    /// Without it, ordering a node-set walks every node up to the top.
    fn document_position(&self) -> Option<(usize, usize)> {
        None
    }
}
