use std::collections::HashMap;

/// Key-value store the schedule cache is written to.
///
/// Writes may be staged until [`Preferences::commit`].
pub trait Preferences {
    fn get_string(&self, key: &str) -> Option<String>;
    fn get_bool(&self, key: &str, default: bool) -> bool;
    fn put_string(&mut self, key: &str, value: &str);
    fn put_bool(&mut self, key: &str, value: bool);
    fn commit(&mut self);
}

#[derive(Debug, Clone, PartialEq)]
enum Value {
    Str(String),
    Bool(bool),
}

/// In-memory [`Preferences`]; staged writes become visible on commit.
#[derive(Debug, Default)]
pub struct MemoryPreferences {
    committed: HashMap<String, Value>,
    staged: HashMap<String, Value>,
}

impl MemoryPreferences {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.committed.len()
    }

    pub fn is_empty(&self) -> bool {
        self.committed.is_empty()
    }
}

impl Preferences for MemoryPreferences {
    fn get_string(&self, key: &str) -> Option<String> {
        match self.committed.get(key) {
            Some(Value::Str(value)) => Some(value.clone()),
            _ => None,
        }
    }

    fn get_bool(&self, key: &str, default: bool) -> bool {
        match self.committed.get(key) {
            Some(Value::Bool(value)) => *value,
            _ => default,
        }
    }

    fn put_string(&mut self, key: &str, value: &str) {
        self.staged.insert(key.into(), Value::Str(value.into()));
    }

    fn put_bool(&mut self, key: &str, value: bool) {
        self.staged.insert(key.into(), Value::Bool(value));
    }

    fn commit(&mut self) {
        self.committed.extend(self.staged.drain());
    }
}
