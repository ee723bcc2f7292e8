#[derive(Debug)]
pub(super) struct Node<T> {
    pub(super) vantage: T,
    /// Median distance from `vantage` separating the two partitions.
    pub(super) radius: f64,
    pub(super) left: Option<Box<Node<T>>>,
    pub(super) right: Option<Box<Node<T>>>,
}

impl<T> Node<T> {
    pub(super) fn depth(&self) -> usize {
        let left = self.left.as_ref().map_or(0, |node| node.depth());
        let right = self.right.as_ref().map_or(0, |node| node.depth());
        1 + left.max(right)
    }
}
