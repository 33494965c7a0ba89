//! Internal pages and the leaf/internal page variant (spec.md §4.2, §9
//! "Variant over page kind" / "Arrays with mixed element kinds").
//!
//! Children and separator keys are kept as parallel arrays
//! (`children: Vec<Node>`, `keys: Vec<i64>`) rather than the alternating
//! `[c0, k0, c1, ...]` layout — the Design Notes call this an equivalent
//! representation, and it lets `Node` stay a plain tagged enum with no
//! base class or virtual dispatch.

use index_core::record::Record;

use crate::leaf::LeafPage;

/// Bytes charged per key slot and per child pointer in an internal page's
/// occupied size. Separate from `index_core::size`'s record-overhead
/// model: these slots hold keys and page references, not records.
const KEY_SLOT_BYTES: usize = 8;
const CHILD_POINTER_BYTES: usize = 8;

/// An internal node must retain at least this many keys after a split
/// (Open Question 1): fewer, and the retained side could end up with no
/// separator at all.
const MIN_KEYS_TO_SPLIT: usize = 3;

/// A B-tree page: either a leaf or an internal node (I4: all children of
/// an internal node share the same variant).
pub enum Node {
    Leaf(LeafPage),
    Internal(Box<InternalPage>),
}

impl Node {
    pub fn leaf() -> Self {
        Node::Leaf(LeafPage::new())
    }

    pub fn is_leaf(&self) -> bool {
        matches!(self, Node::Leaf(_))
    }

    pub fn occupied_size(&self) -> usize {
        match self {
            Node::Leaf(leaf) => leaf.occupied_size(),
            Node::Internal(internal) => internal.occupied_size(),
        }
    }

    /// Whether this node is overfull *and* eligible to be split right now.
    /// An internal node with fewer than `MIN_KEYS_TO_SPLIT` keys defers
    /// overflow rather than produce a keyless sibling (Open Question 1).
    pub fn needs_split(&self, page_size: usize) -> bool {
        if self.occupied_size() <= page_size {
            return false;
        }
        match self {
            Node::Leaf(_) => true,
            Node::Internal(internal) => internal.keys.len() >= MIN_KEYS_TO_SPLIT,
        }
    }

    /// Inserts `record`, absorbing any child split this causes.
    pub fn insert(&mut self, record: Record, page_size: usize) {
        match self {
            Node::Leaf(leaf) => leaf.insert(record),
            Node::Internal(internal) => internal.insert(record, page_size),
        }
    }

    pub fn remove(&mut self, key: i64) -> bool {
        match self {
            Node::Leaf(leaf) => leaf.remove(key),
            Node::Internal(internal) => internal.remove(key),
        }
    }

    pub fn search(&self, key: i64) -> Vec<Record> {
        match self {
            Node::Leaf(leaf) => leaf.search(key),
            Node::Internal(internal) => internal.search(key),
        }
    }

    pub fn range(&self, lo: i64, hi: i64) -> Vec<Record> {
        match self {
            Node::Leaf(leaf) => leaf.range(lo, hi),
            Node::Internal(internal) => internal.range(lo, hi),
        }
    }

    /// Splits this node, returning the sibling that should be adopted by
    /// the parent (or installed as the other half of a new root) together
    /// with the separator key the caller should promote.
    ///
    /// For a leaf child the separator is the new sibling's first key
    /// (spec.md §4.2). For an internal child it is the key removed from
    /// the middle during the split, *not* the sibling's first key — after
    /// a promote-and-remove split (see `InternalPage::split`) the
    /// sibling's first key is one slot too far right to serve as the
    /// separator.
    pub fn split(&mut self) -> (Node, i64) {
        match self {
            Node::Leaf(leaf) => {
                let sibling = leaf.split();
                let separator = sibling.first_key();
                (Node::Leaf(sibling), separator)
            }
            Node::Internal(internal) => {
                let (sibling, separator) = internal.split();
                (Node::Internal(Box::new(sibling)), separator)
            }
        }
    }

    pub fn height(&self) -> usize {
        match self {
            Node::Leaf(_) => 1,
            Node::Internal(internal) => {
                1 + internal.children.iter().map(Node::height).max().unwrap_or(0)
            }
        }
    }

    pub fn num_nodes(&self) -> usize {
        match self {
            Node::Leaf(_) => 1,
            Node::Internal(internal) => {
                1 + internal.children.iter().map(Node::num_nodes).sum::<usize>()
            }
        }
    }

    pub fn num_leaf_nodes(&self) -> usize {
        match self {
            Node::Leaf(_) => 1,
            Node::Internal(internal) => internal.children.iter().map(Node::num_leaf_nodes).sum(),
        }
    }

    pub fn num_records(&self) -> usize {
        match self {
            Node::Leaf(leaf) => leaf.len(),
            Node::Internal(internal) => internal.children.iter().map(Node::num_records).sum(),
        }
    }
}

/// Payload: `n` separator keys bounding `n + 1` children (I1–I3).
pub struct InternalPage {
    children: Vec<Node>,
    keys: Vec<i64>,
}

impl InternalPage {
    /// Builds the very first internal root out of a split leaf (or
    /// internal node) pair.
    pub fn new_root(left: Node, separator: i64, right: Node) -> Self {
        Self { children: vec![left, right], keys: vec![separator] }
    }

    pub fn occupied_size(&self) -> usize {
        self.keys.len() * KEY_SLOT_BYTES + self.children.len() * CHILD_POINTER_BYTES
    }

    /// `child_index(key)`: the first index `i` with `keys[i] > key`, or
    /// `keys.len()` if none — keys equal to a separator descend right
    /// (spec.md §4.2).
    fn child_index(&self, key: i64) -> usize {
        self.keys.partition_point(|&k| k <= key)
    }

    pub fn insert(&mut self, record: Record, page_size: usize) {
        let index = self.child_index(record.key());
        self.children[index].insert(record, page_size);
        if self.children[index].needs_split(page_size) {
            self.split_child(index);
        }
    }

    /// Splits `children[pos]` and absorbs the new sibling and separator.
    fn split_child(&mut self, pos: usize) {
        let (new_sibling, separator) = self.children[pos].split();
        self.keys.insert(pos, separator);
        self.children.insert(pos + 1, new_sibling);
    }

    pub fn remove(&mut self, key: i64) -> bool {
        let index = self.child_index(key);
        self.children[index].remove(key)
    }

    pub fn search(&self, key: i64) -> Vec<Record> {
        let index = self.child_index(key);
        self.children[index].search(key)
    }

    pub fn range(&self, lo: i64, hi: i64) -> Vec<Record> {
        self.children.iter().flat_map(|c| c.range(lo, hi)).collect()
    }

    /// Splits at the middle key, promoting and removing it (the classic
    /// B-tree split) rather than literally duplicating it into the new
    /// sibling — see `DESIGN.md` for why this diverges from the
    /// reference source's alternating-array split. Returns the new right
    /// half along with the promoted key; the caller (`split_child`, or
    /// the driver's root split) must use that key as the separator
    /// rather than re-derive one from the sibling.
    pub fn split(&mut self) -> (InternalPage, i64) {
        let total_keys = self.keys.len();
        let mid = total_keys / 2;

        let right_keys = self.keys.split_off(mid + 1);
        let promoted = self.keys.pop().expect("split requires at least one key");
        let right_children = self.children.split_off(mid + 1);

        (InternalPage { children: right_children, keys: right_keys }, promoted)
    }

    /// Collapses to the sole remaining child when a removal leaves this
    /// node with no keys (spec.md §4.3, root-collapse is the only caller).
    pub fn sole_child(mut self) -> Option<Node> {
        if self.children.len() == 1 {
            Some(self.children.pop().unwrap())
        } else {
            None
        }
    }

    pub fn child_count(&self) -> usize {
        self.children.len()
    }
}
