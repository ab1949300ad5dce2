use serde::ser::{Serialize, SerializeMap, Serializer};

/// Insertion-ordered field name to value mapping for signed gateway messages.
///
/// Field order is load-bearing: fingerprints are computed over the values in
/// exactly the order the fields were inserted, and the gateway receives the
/// fields in that same order. Inserting an existing name replaces the value
/// in place without moving the field.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FieldMap(Vec<(String, String)>);

impl FieldMap {
    pub fn new() -> Self {
        FieldMap(Vec::new())
    }

    pub fn insert(&mut self, name: impl Into<String>, value: impl Into<String>) {
        let name = name.into();
        let value = value.into();
        match self.0.iter_mut().find(|(n, _)| *n == name) {
            Some(entry) => entry.1 = value,
            None => self.0.push((name, value)),
        }
    }

    pub fn get(&self, name: &str) -> Option<&str> {
        self.0
            .iter()
            .find(|(n, _)| n == name)
            .map(|(_, v)| v.as_str())
    }

    pub fn contains(&self, name: &str) -> bool {
        self.get(name).is_some()
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.0.iter().map(|(n, _)| n.as_str())
    }

    pub fn values(&self) -> impl Iterator<Item = &str> {
        self.0.iter().map(|(_, v)| v.as_str())
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.0.iter().map(|(n, v)| (n.as_str(), v.as_str()))
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// The comma-joined key list, which is the gateway's encoding of a
    /// fingerprint order.
    pub fn order(&self) -> String {
        self.keys().collect::<Vec<_>>().join(",")
    }
}

impl FromIterator<(String, String)> for FieldMap {
    fn from_iter<I: IntoIterator<Item = (String, String)>>(iter: I) -> Self {
        let mut map = FieldMap::new();
        for (name, value) in iter {
            map.insert(name, value);
        }
        map
    }
}

impl Serialize for FieldMap {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        let mut map = serializer.serialize_map(Some(self.0.len()))?;
        for (name, value) in &self.0 {
            map.serialize_entry(name, value)?;
        }
        map.end()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn preserves_insertion_order() {
        let mut fields = FieldMap::new();
        fields.insert("b", "2");
        fields.insert("a", "1");
        fields.insert("c", "3");
        assert_eq!(fields.keys().collect::<Vec<_>>(), vec!["b", "a", "c"]);
        assert_eq!(fields.order(), "b,a,c");
    }

    #[test]
    fn insert_replaces_value_in_place() {
        let mut fields = FieldMap::new();
        fields.insert("first", "");
        fields.insert("second", "x");
        fields.insert("first", "replaced");
        assert_eq!(fields.keys().collect::<Vec<_>>(), vec!["first", "second"]);
        assert_eq!(fields.get("first"), Some("replaced"));
    }

    #[test]
    fn form_encodes_in_order() {
        let mut fields = FieldMap::new();
        fields.insert("command", "deposit");
        fields.insert("amount", "19.90");
        let encoded = serde_urlencoded::to_string(&fields).unwrap();
        assert_eq!(encoded, "command=deposit&amount=19.90");
    }
}
