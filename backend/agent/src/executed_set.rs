//! Guard against the model requesting the same function over and over.
//!
//! Each function may run at most once per conversation run, which bounds the
//! loop to one dispatch per registered function.

use std::collections::HashSet;

/// Function names already executed in the current run, in execution order.
#[derive(Debug, Default, Clone)]
pub struct ExecutedSet {
    seen: HashSet<String>,
    order: Vec<String>,
}

impl ExecutedSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record `name`; returns `false` if it was already present.
    pub fn insert(&mut self, name: &str) -> bool {
        if !self.seen.insert(name.to_string()) {
            return false;
        }
        self.order.push(name.to_string());
        true
    }

    pub fn contains(&self, name: &str) -> bool {
        self.seen.contains(name)
    }

    pub fn len(&self) -> usize {
        self.order.len()
    }

    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }

    pub fn names(&self) -> &[String] {
        &self.order
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_insert_is_idempotent() {
        let mut executed = ExecutedSet::new();
        assert!(!executed.contains("get_current_weather"));
        assert!(executed.insert("get_current_weather"));
        assert!(!executed.insert("get_current_weather"));
        assert!(executed.contains("get_current_weather"));
        assert_eq!(executed.len(), 1);
    }

    #[test]
    fn test_keeps_execution_order() {
        let mut executed = ExecutedSet::new();
        executed.insert("get_current_weather");
        executed.insert("get_clothing_recommendations");
        executed.insert("get_current_weather");
        assert_eq!(
            executed.names(),
            ["get_current_weather", "get_clothing_recommendations"]
        );
    }
}
