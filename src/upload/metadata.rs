//! User-defined object metadata
//!
//! S3 treats metadata keys case-insensitively and sends them lower-cased
//! after the `x-amz-meta-` prefix, so keys are normalised on the way in.
//! A key can carry several values; inserting again appends.

/// Case-insensitive, insertion-ordered multimap of metadata entries
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash)]
pub struct UserMetadata {
    /// (lower-cased key, values) in first-seen key order
    entries: Vec<(String, Vec<String>)>,
}

impl UserMetadata {
    /// Create an empty metadata map
    pub fn new() -> Self {
        Self::default()
    }

    /// Append `value` to the values stored under `key`
    pub fn insert(&mut self, key: impl AsRef<str>, value: impl Into<String>) {
        let key = key.as_ref().to_ascii_lowercase();
        let value = value.into();

        match self.entries.iter_mut().find(|(k, _)| *k == key) {
            Some((_, values)) => values.push(value),
            None => self.entries.push((key, vec![value])),
        }
    }

    /// Append every `(key, value)` pair
    pub fn extend<I, K, V>(&mut self, pairs: I)
    where
        I: IntoIterator<Item = (K, V)>,
        K: AsRef<str>,
        V: Into<String>,
    {
        for (key, value) in pairs {
            self.insert(key, value);
        }
    }

    /// All values for `key`, empty if the key was never set
    pub fn get_all(&self, key: &str) -> &[String] {
        self.entries
            .iter()
            .find(|(k, _)| k.eq_ignore_ascii_case(key))
            .map(|(_, values)| values.as_slice())
            .unwrap_or(&[])
    }

    /// First value for `key`
    pub fn get(&self, key: &str) -> Option<&str> {
        self.get_all(key).first().map(String::as_str)
    }

    pub fn contains_key(&self, key: &str) -> bool {
        !self.get_all(key).is_empty()
    }

    /// Number of distinct keys
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Iterate `(key, values)` in first-seen key order
    pub fn iter(&self) -> impl Iterator<Item = (&str, &[String])> {
        self.entries
            .iter()
            .map(|(k, values)| (k.as_str(), values.as_slice()))
    }

    /// Iterate flattened `(key, value)` pairs, one per stored value
    pub fn iter_pairs(&self) -> impl Iterator<Item = (&str, &str)> {
        self.entries
            .iter()
            .flat_map(|(k, values)| values.iter().map(move |v| (k.as_str(), v.as_str())))
    }
}

impl<'a> IntoIterator for &'a UserMetadata {
    type Item = (&'a str, &'a str);
    type IntoIter = Box<dyn Iterator<Item = (&'a str, &'a str)> + 'a>;

    fn into_iter(self) -> Self::IntoIter {
        Box::new(self.iter_pairs())
    }
}

impl<K, V> FromIterator<(K, V)> for UserMetadata
where
    K: AsRef<str>,
    V: Into<String>,
{
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut metadata = UserMetadata::new();
        metadata.extend(iter);
        metadata
    }
}
