use std::collections::HashSet;
use std::hash::Hash;

/// An unordered set of unique elements.
#[derive(Debug, Clone)]
pub struct Set<T> {
    set: HashSet<T>,
}

impl<T: Eq + Hash> Set<T> {
    pub fn new() -> Self {
        Set {
            set: HashSet::new(),
        }
    }

    pub fn len(&self) -> usize {
        self.set.len()
    }

    pub fn is_empty(&self) -> bool {
        self.set.is_empty()
    }

    pub fn add(&mut self, value: T) {
        self.set.insert(value);
    }

    pub fn contains(&self, value: &T) -> bool {
        self.set.contains(value)
    }

    pub fn remove(&mut self, value: &T) {
        self.set.remove(value);
    }

    /// Calls `f` on each element until it returns `false`.
    pub fn each<F>(&self, mut f: F)
    where
        F: FnMut(&T) -> bool,
    {
        for value in &self.set {
            if !f(value) {
                return;
            }
        }
    }

    /// Adds every element of `other`.
    pub fn union(&mut self, other: &Set<T>)
    where
        T: Clone,
    {
        self.set.extend(other.set.iter().cloned());
    }
}

impl<T: Eq + Hash> Default for Set<T> {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn add_contains_remove() {
        let mut set = Set::new();
        set.add(3);
        set.add(3);
        set.add(4);

        assert_eq!(2, set.len());
        assert!(set.contains(&3));

        set.remove(&3);
        assert!(!set.contains(&3));
        assert_eq!(1, set.len());

        set.remove(&42);
        assert_eq!(1, set.len());
    }

    #[test]
    fn each_stops_early() {
        let mut set = Set::new();
        for i in 0..10 {
            set.add(i);
        }

        let mut visited = 0;
        set.each(|_| {
            visited += 1;
            visited < 3
        });
        assert_eq!(3, visited);

        let mut all = 0;
        set.each(|_| {
            all += 1;
            true
        });
        assert_eq!(10, all);
    }

    #[test]
    fn union_merges() {
        let mut a = Set::new();
        a.add("x");
        a.add("y");
        let mut b = Set::new();
        b.add("y");
        b.add("z");

        a.union(&b);
        assert_eq!(3, a.len());
        assert!(a.contains(&"z"));
        assert_eq!(2, b.len());
    }
}
