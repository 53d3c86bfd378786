use crate::value::Value;

/// A multimap keyed by scalar runtime values.
///
/// JSON group keys can be strings, numbers, booleans, or null, and those
/// shapes cannot share one hashable key type without inventing a universal
/// hash over the whole value model. The table instead partitions its storage
/// by shape, which directly encodes the legal-key invariant: arrays and the
/// `Missing` sentinel are simply not keyable.
///
/// Storage is insertion-ordered within each shape, so one run's enumeration
/// order is stable. [`Table::keys`] enumerates string keys, then numbers,
/// then booleans, then the null key if present.
pub struct Table<T> {
    strings: Vec<(String, T)>,
    numbers: Vec<(f64, T)>,
    bools: Vec<(bool, T)>,
    null: Option<T>,
}

impl<T> Default for Table<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> Table<T> {
    pub fn new() -> Self {
        Table {
            strings: Vec::new(),
            numbers: Vec::new(),
            bools: Vec::new(),
            null: None,
        }
    }

    /// Whether a value is a legal key shape.
    pub fn supports(key: &Value) -> bool {
        matches!(
            key,
            Value::String(_) | Value::Number(_) | Value::Boolean(_) | Value::Null
        )
    }

    /// Insert or overwrite. Returns false (and stores nothing) for
    /// unsupported key shapes.
    pub fn set(&mut self, key: &Value, value: T) -> bool {
        match key {
            Value::String(s) => {
                match self.strings.iter_mut().find(|(k, _)| k == s) {
                    Some((_, slot)) => *slot = value,
                    None => self.strings.push((s.clone(), value)),
                }
                true
            }
            Value::Number(n) => {
                match self.numbers.iter_mut().find(|(k, _)| k == n) {
                    Some((_, slot)) => *slot = value,
                    None => self.numbers.push((*n, value)),
                }
                true
            }
            Value::Boolean(b) => {
                match self.bools.iter_mut().find(|(k, _)| k == b) {
                    Some((_, slot)) => *slot = value,
                    None => self.bools.push((*b, value)),
                }
                true
            }
            Value::Null => {
                self.null = Some(value);
                true
            }
            Value::Array(_) | Value::Missing => false,
        }
    }

    pub fn get(&self, key: &Value) -> Option<&T> {
        match key {
            Value::String(s) => self.strings.iter().find(|(k, _)| k == s).map(|(_, v)| v),
            Value::Number(n) => self.numbers.iter().find(|(k, _)| k == n).map(|(_, v)| v),
            Value::Boolean(b) => self.bools.iter().find(|(k, _)| k == b).map(|(_, v)| v),
            Value::Null => self.null.as_ref(),
            Value::Array(_) | Value::Missing => None,
        }
    }

    pub fn get_mut(&mut self, key: &Value) -> Option<&mut T> {
        match key {
            Value::String(s) => self
                .strings
                .iter_mut()
                .find(|(k, _)| k == s)
                .map(|(_, v)| v),
            Value::Number(n) => self
                .numbers
                .iter_mut()
                .find(|(k, _)| k == n)
                .map(|(_, v)| v),
            Value::Boolean(b) => self.bools.iter_mut().find(|(k, _)| k == b).map(|(_, v)| v),
            Value::Null => self.null.as_mut(),
            Value::Array(_) | Value::Missing => None,
        }
    }

    pub fn has(&self, key: &Value) -> bool {
        self.get(key).is_some()
    }

    /// Fetch the slot for `key`, inserting `default()` first if absent.
    /// Returns `None` for unsupported key shapes.
    pub fn entry_or(&mut self, key: &Value, default: impl FnOnce() -> T) -> Option<&mut T> {
        if !Self::supports(key) {
            return None;
        }
        if !self.has(key) {
            self.set(key, default());
        }
        self.get_mut(key)
    }

    /// Enumerate keys: strings, then numbers, then booleans, then null.
    pub fn keys(&self) -> Vec<Value> {
        let mut keys = Vec::new();
        for (k, _) in &self.strings {
            keys.push(Value::String(k.clone()));
        }
        for (k, _) in &self.numbers {
            keys.push(Value::Number(*k));
        }
        for (k, _) in &self.bools {
            keys.push(Value::Boolean(*k));
        }
        if self.null.is_some() {
            keys.push(Value::Null);
        }
        keys
    }

    pub fn len(&self) -> usize {
        self.strings.len()
            + self.numbers.len()
            + self.bools.len()
            + usize::from(self.null.is_some())
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

#[test]
fn test_shapes_do_not_collide() {
    let mut table: Table<i32> = Table::new();
    table.set(&Value::String("1".to_string()), 10);
    table.set(&Value::Number(1.0), 20);
    table.set(&Value::Boolean(true), 30);
    table.set(&Value::Null, 40);

    assert_eq!(table.get(&Value::String("1".to_string())), Some(&10));
    assert_eq!(table.get(&Value::Number(1.0)), Some(&20));
    assert_eq!(table.get(&Value::Boolean(true)), Some(&30));
    assert_eq!(table.get(&Value::Null), Some(&40));
    assert_eq!(table.len(), 4);
}

#[test]
fn test_keys_enumerate_shape_order() {
    let mut table: Table<i32> = Table::new();
    table.set(&Value::Null, 1);
    table.set(&Value::Number(2.0), 2);
    table.set(&Value::String("a".to_string()), 3);
    table.set(&Value::Boolean(false), 4);

    let keys = table.keys();
    assert_eq!(
        keys,
        vec![
            Value::String("a".to_string()),
            Value::Number(2.0),
            Value::Boolean(false),
            Value::Null,
        ]
    );
}

#[test]
fn test_arrays_are_not_keyable() {
    let mut table: Table<i32> = Table::new();
    assert!(!table.set(&Value::Array(vec![]), 1));
    assert!(!table.has(&Value::Array(vec![])));
    assert!(!table.set(&Value::Missing, 1));
}
