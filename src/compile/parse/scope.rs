use crate::compile::tree::Tree;

/// A distinct, ordered set of [`Tree`] instances, such as the body of
/// a tag or loop.
#[derive(Debug, Clone, Default)]
pub struct Scope {
    pub data: Vec<Tree>,
}

impl Scope {
    /// Create a new Scope.
    #[inline]
    pub fn new() -> Self {
        Self { data: vec![] }
    }

    /// Return true if the Scope renders nothing.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }
}
