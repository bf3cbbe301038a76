use crate::src::Src;

/// A Node pairs an AST payload with its source span.
#[derive(PartialEq)]
pub struct Node<K> {
    pub inner: K,
    pub src: Src,
}

impl<K: std::fmt::Debug> std::fmt::Debug for Node<K> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_tuple(&format!("Node@{}+{}", self.src.offset, self.src.len))
            .field(&self.inner)
            .finish()
    }
}

/// A NodeRef is a boxed node, used to avoid infinite data structures.
pub type NodeRef<K> = Box<Node<K>>;
