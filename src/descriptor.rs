//! Media query descriptor: the ordered feature map built while resolving
//! one branch of a query key.

/// Prefix marking entries that render verbatim as `(value)`.
const VERBATIM_PREFIX: char = ':';

/// Key of the media type entry, rendered bare and first.
pub const MEDIA_KEY: &str = "media";

/// Value stored under a descriptor key.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DescriptorValue {
    /// Rendered as `(key: value)`.
    Text(String),
    /// `true` renders `(key)`, `false` is omitted.
    Flag(bool),
    /// Rendered as `(value)` without a key.
    Verbatim(String),
}

/// Ordered mapping from media feature to value.
///
/// Re-assigning an existing key keeps its original position, so the rendered
/// clause order is the order in which features were first mentioned.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MediaQueryDescriptor {
    entries: Vec<(String, DescriptorValue)>,
    unresolved: bool,
}

impl MediaQueryDescriptor {
    pub fn new() -> Self {
        Self::default()
    }

    /// Set a `(key: value)` feature.
    pub fn set(&mut self, key: impl Into<String>, value: impl Into<String>) {
        self.insert(key.into(), DescriptorValue::Text(value.into()));
    }

    /// Set a boolean feature; `false` suppresses the clause.
    pub fn set_flag(&mut self, key: impl Into<String>, on: bool) {
        self.insert(key.into(), DescriptorValue::Flag(on));
    }

    /// Store a clause rendered verbatim inside parentheses.
    ///
    /// `slot` identifies the clause so it can be replaced later; two clauses
    /// with the same slot collapse into the last one written.
    pub fn set_verbatim(&mut self, slot: &str, clause: impl Into<String>) {
        self.insert(
            format!("{VERBATIM_PREFIX}{slot}"),
            DescriptorValue::Verbatim(clause.into()),
        );
    }

    pub fn set_media(&mut self, media: impl Into<String>) {
        self.set(MEDIA_KEY, media);
    }

    pub fn media(&self) -> Option<&str> {
        match self.get(MEDIA_KEY) {
            Some(DescriptorValue::Text(media)) => Some(media),
            _ => None,
        }
    }

    pub fn get(&self, key: &str) -> Option<&DescriptorValue> {
        self.entries
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, value)| value)
    }

    pub fn remove(&mut self, key: &str) -> Option<DescriptorValue> {
        let position = self.entries.iter().position(|(k, _)| k == key)?;
        Some(self.entries.remove(position).1)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &DescriptorValue)> {
        self.entries.iter().map(|(k, v)| (k.as_str(), v))
    }

    /// Mark the branch as unresolvable; rendering keeps only the media type.
    pub fn mark_unresolved(&mut self) {
        self.unresolved = true;
    }

    pub fn is_unresolved(&self) -> bool {
        self.unresolved
    }

    /// Render the branch as `media and (clause) and ...`.
    pub fn render(&self) -> String {
        let mut parts: Vec<String> = Vec::with_capacity(self.entries.len());

        if let Some(media) = self.media().filter(|m| !m.is_empty()) {
            parts.push(media.to_string());
        }

        if !self.unresolved {
            for (key, value) in &self.entries {
                if key == MEDIA_KEY {
                    continue;
                }
                match value {
                    DescriptorValue::Flag(true) => parts.push(format!("({key})")),
                    DescriptorValue::Flag(false) => {}
                    DescriptorValue::Text(text) => parts.push(format!("({key}: {text})")),
                    DescriptorValue::Verbatim(clause) => parts.push(format!("({clause})")),
                }
            }
        }

        parts.join(" and ")
    }

    fn insert(&mut self, key: String, value: DescriptorValue) {
        match self.entries.iter_mut().find(|(k, _)| *k == key) {
            Some(slot) => slot.1 = value,
            None => self.entries.push((key, value)),
        }
    }
}
