//! The variable environment: an ordered name/value store with textual
//! substitution.
//!
//! Variables are kept sorted by descending key length. Substitution walks
//! them in that order, so a key that is a prefix of another (`$v` next to
//! `$value`) can never replace the middle of the longer key's occurrence.

/// One `$name = value` binding. Both sides are plain text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Variable {
    pub key: String,
    pub value: String,
}

/// Every variable in a run lives here: one flat pool, shared across nested
/// includes, with no per-block scoping and no removal.
#[derive(Debug, Clone, Default)]
pub struct Environment {
    /// Sorted longest-key-first; `set` maintains the order.
    variables: Vec<Variable>,
}

impl Environment {
    pub fn new() -> Self {
        Self::default()
    }

    /// Create or update a binding. New keys re-sort the pool.
    pub fn set(&mut self, key: impl Into<String>, value: impl Into<String>) {
        let key = key.into();
        let value = value.into();
        if let Some(existing) = self.variables.iter_mut().find(|v| v.key == key) {
            existing.value = value;
            return;
        }
        self.variables.push(Variable { key, value });
        self.variables
            .sort_by(|a, b| b.key.len().cmp(&a.key.len()));
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.variables
            .iter()
            .find(|v| v.key == key)
            .map(|v| v.value.as_str())
    }

    /// Replace every occurrence of every variable key in `text`, longest
    /// key first, each key exhaustively before moving to the next.
    pub fn substitute(&self, text: &str) -> String {
        let mut target = text.to_string();
        for variable in &self.variables {
            while let Some(pos) = target.find(&variable.key) {
                target.replace_range(pos..pos + variable.key.len(), &variable.value);
            }
        }
        target
    }

    pub fn is_empty(&self) -> bool {
        self.variables.is_empty()
    }

    pub fn len(&self) -> usize {
        self.variables.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn set_and_get() {
        let mut env = Environment::new();
        env.set("$name", "dust");
        assert_eq!(env.get("$name"), Some("dust"));
        assert_eq!(env.get("$other"), None);
    }

    #[test]
    fn update_in_place() {
        let mut env = Environment::new();
        env.set("$n", "0");
        env.set("$n", "1");
        assert_eq!(env.get("$n"), Some("1"));
        assert_eq!(env.len(), 1);
    }

    #[test]
    fn substitution() {
        let mut env = Environment::new();
        env.set("$who", "world");
        assert_eq!(env.substitute("hello $who"), "hello world");
    }

    #[test]
    fn substitution_is_exhaustive_per_key() {
        let mut env = Environment::new();
        env.set("$x", "7");
        assert_eq!(env.substitute("$x + $x + $x"), "7 + 7 + 7");
    }

    #[test]
    fn longer_keys_substitute_first() {
        let mut env = Environment::new();
        env.set("$v", "short");
        env.set("$value", "long");
        assert_eq!(env.substitute("$value and $v"), "long and short");

        // Same result regardless of insertion order.
        let mut env = Environment::new();
        env.set("$value", "long");
        env.set("$v", "short");
        assert_eq!(env.substitute("$value and $v"), "long and short");
    }

    #[test]
    fn ordering_holds_after_update() {
        let mut env = Environment::new();
        env.set("$v", "a");
        env.set("$value", "b");
        env.set("$v", "c");
        assert_eq!(env.substitute("$value$v"), "bc");
    }
}
