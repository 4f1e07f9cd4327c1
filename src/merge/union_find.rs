//  UNION FIND.rs
//    by Lut99
//
//  Created:
//    18 Mar 2025, 10:14:03
//  Last edited:
//    18 Mar 2025, 11:52:37
//  Auto updated?
//    Yes
//
//  Description:
//!   Implements a disjoint-set (union-find) structure over dense indices.
//


/***** LIBRARY *****/
/// A disjoint-set forest over the indices `0..n`.
///
/// Uses path compression in [`DisjointSet::find()`] and union by size in
/// [`DisjointSet::union()`].
#[derive(Clone, Debug)]
pub struct DisjointSet {
    /// The parent of every element. Roots are their own parent.
    parent: Vec<usize>,
    /// The size of the set rooted at every element. Only meaningful for roots.
    size:   Vec<usize>,
}
impl DisjointSet {
    /// Constructor for the DisjointSet that puts every element in its own set.
    ///
    /// # Arguments
    /// - `n`: The number of elements.
    ///
    /// # Returns
    /// A new DisjointSet with `n` singleton sets.
    #[inline]
    pub fn new(n: usize) -> Self { Self { parent: (0..n).collect(), size: vec![1; n] } }

    /// Finds the representative of the set containing `x`.
    ///
    /// Compresses the path from `x` to its root along the way.
    ///
    /// # Panics
    /// This function panics if `x` is out-of-bounds.
    pub fn find(&mut self, x: usize) -> usize {
        let mut root: usize = x;
        while self.parent[root] != root {
            root = self.parent[root];
        }
        let mut x: usize = x;
        while self.parent[x] != root {
            let next: usize = self.parent[x];
            self.parent[x] = root;
            x = next;
        }
        root
    }

    /// Merges the sets containing `a` and `b`.
    ///
    /// # Returns
    /// True if they were in different sets, or false if they already were together.
    ///
    /// # Panics
    /// This function panics if `a` or `b` is out-of-bounds.
    pub fn union(&mut self, a: usize, b: usize) -> bool {
        let (mut a, mut b): (usize, usize) = (self.find(a), self.find(b));
        if a == b {
            return false;
        }
        if self.size[a] < self.size[b] {
            std::mem::swap(&mut a, &mut b);
        }
        self.parent[b] = a;
        self.size[a] += self.size[b];
        true
    }

    /// Returns the number of elements (not sets).
    #[inline]
    pub fn len(&self) -> usize { self.parent.len() }

    /// Whether there are no elements.
    #[inline]
    pub fn is_empty(&self) -> bool { self.parent.is_empty() }
}





/***** TESTS *****/
