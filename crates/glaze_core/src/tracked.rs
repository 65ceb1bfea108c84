//! Explicit change tracking
//!
//! A [`Tracked`] value carries a version that only moves when an update
//! actually differs from what is stored. Caches compare versions instead of
//! re-comparing (or re-hashing) whole values every frame.

/// A value with a version counter
#[derive(Clone, Debug)]
pub struct Tracked<T> {
    value: T,
    version: u64,
}

impl<T: PartialEq> Tracked<T> {
    pub fn new(value: T) -> Self {
        Self { value, version: 0 }
    }

    pub fn get(&self) -> &T {
        &self.value
    }

    pub fn version(&self) -> u64 {
        self.version
    }

    /// Store `value`, bumping the version if it differs; returns whether it
    /// changed
    pub fn set(&mut self, value: T) -> bool {
        if self.value == value {
            return false;
        }
        self.value = value;
        self.version += 1;
        true
    }

    /// Whether the value moved past `seen`
    pub fn changed_since(&self, seen: u64) -> bool {
        self.version != seen
    }
}

impl<T: PartialEq + Default> Default for Tracked<T> {
    fn default() -> Self {
        Self::new(T::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_version_bumps_only_on_change() {
        let mut t = Tracked::new(1);
        assert!(!t.set(1));
        assert_eq!(t.version(), 0);
        assert!(t.set(2));
        assert_eq!(t.version(), 1);
        assert!(t.changed_since(0));
        assert!(!t.changed_since(1));
        assert_eq!(*t.get(), 2);
    }
}
