//! Question → answer map that remembers insertion order

use serde::de::{MapAccess, Visitor};
use serde::ser::SerializeMap;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;

/// Answers keyed by question, in the order the questions were asked.
///
/// Serialises as a JSON object whose keys keep that order. Inserting an
/// existing question replaces its answer without moving it.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Findings {
    entries: Vec<(String, String)>,
}

impl Findings {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert or replace; returns the previous answer if any.
    pub fn insert(&mut self, question: impl Into<String>, answer: impl Into<String>) -> Option<String> {
        let question = question.into();
        let answer = answer.into();
        match self.entries.iter_mut().find(|(q, _)| *q == question) {
            Some((_, existing)) => Some(std::mem::replace(existing, answer)),
            None => {
                self.entries.push((question, answer));
                None
            }
        }
    }

    pub fn get(&self, question: &str) -> Option<&str> {
        self.entries
            .iter()
            .find(|(q, _)| q == question)
            .map(|(_, a)| a.as_str())
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn questions(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|(q, _)| q.as_str())
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.entries.iter().map(|(q, a)| (q.as_str(), a.as_str()))
    }

    /// Merge another set of findings, replacing answers for repeated questions.
    pub fn extend(&mut self, other: Findings) {
        for (q, a) in other.entries {
            self.insert(q, a);
        }
    }

    /// Two-space indented JSON object, as embedded in the report prompt.
    pub fn to_pretty_json(&self) -> serde_json::Result<String> {
        serde_json::to_string_pretty(self)
    }
}

impl<Q: Into<String>, A: Into<String>> FromIterator<(Q, A)> for Findings {
    fn from_iter<I: IntoIterator<Item = (Q, A)>>(iter: I) -> Self {
        let mut findings = Findings::new();
        for (q, a) in iter {
            findings.insert(q, a);
        }
        findings
    }
}

impl Serialize for Findings {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.entries.len()))?;
        for (q, a) in &self.entries {
            map.serialize_entry(q, a)?;
        }
        map.end()
    }
}

impl<'de> Deserialize<'de> for Findings {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        struct FindingsVisitor;

        impl<'de> Visitor<'de> for FindingsVisitor {
            type Value = Findings;

            fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str("a map of question to answer")
            }

            fn visit_map<M: MapAccess<'de>>(self, mut access: M) -> Result<Findings, M::Error> {
                let mut findings = Findings::new();
                while let Some((q, a)) = access.next_entry::<String, String>()? {
                    findings.insert(q, a);
                }
                Ok(findings)
            }
        }

        deserializer.deserialize_map(FindingsVisitor)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_insertion_order_survives_serialization() {
        let findings: Findings = [("zebra?", "z"), ("apple?", "a"), ("mango?", "m")]
            .into_iter()
            .collect();

        let json = serde_json::to_string(&findings).unwrap();
        assert_eq!(json, r#"{"zebra?":"z","apple?":"a","mango?":"m"}"#);

        let back: Findings = serde_json::from_str(&json).unwrap();
        assert_eq!(back.questions().collect::<Vec<_>>(), vec!["zebra?", "apple?", "mango?"]);
    }

    #[test]
    fn test_replace_keeps_position() {
        let mut findings = Findings::new();
        findings.insert("q1", "first");
        findings.insert("q2", "second");
        assert_eq!(findings.insert("q1", "updated"), Some("first".to_string()));

        assert_eq!(findings.len(), 2);
        assert_eq!(findings.iter().next(), Some(("q1", "updated")));
        assert_eq!(findings.get("q2"), Some("second"));
        assert_eq!(findings.get("q3"), None);
    }

    #[test]
    fn test_pretty_json() {
        let findings: Findings = [("q", "a")].into_iter().collect();
        assert_eq!(findings.to_pretty_json().unwrap(), "{\n  \"q\": \"a\"\n}");
    }
}
