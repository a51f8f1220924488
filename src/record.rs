//! Repository record - the single cached entity

use serde::ser::{Serialize, SerializeTuple, Serializer};

/// One cached repository, keyed by the id the search API assigned to it
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RepoRecord {
    pub external_id: i64,
    pub name: String,
    pub description: Option<String>,
    pub url: String,
    pub created_at: String,
    pub pushed_at: String,
    pub star_count: u32,
}

impl RepoRecord {
    pub fn new(external_id: i64, name: impl Into<String>, url: impl Into<String>, star_count: u32) -> Self {
        Self {
            external_id,
            name: name.into(),
            description: None,
            url: url.into(),
            created_at: String::new(),
            pushed_at: String::new(),
            star_count,
        }
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    pub fn with_dates(mut self, created_at: impl Into<String>, pushed_at: impl Into<String>) -> Self {
        self.created_at = created_at.into();
        self.pushed_at = pushed_at.into();
        self
    }
}

/// Records go over the wire as fixed-order arrays:
/// `[external_id, name, description, url, created_at, pushed_at, star_count]`
impl Serialize for RepoRecord {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut tuple = serializer.serialize_tuple(7)?;
        tuple.serialize_element(&self.external_id)?;
        tuple.serialize_element(&self.name)?;
        tuple.serialize_element(&self.description)?;
        tuple.serialize_element(&self.url)?;
        tuple.serialize_element(&self.created_at)?;
        tuple.serialize_element(&self.pushed_at)?;
        tuple.serialize_element(&self.star_count)?;
        tuple.end()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_serializes_as_tuple() {
        let record = RepoRecord::new(42, "flask", "https://github.com/pallets/flask", 64000)
            .with_dates("2010-04-06T11:11:59Z", "2024-01-02T03:04:05Z");

        let json = serde_json::to_value(&record).unwrap();
        assert_eq!(
            json,
            serde_json::json!([
                42,
                "flask",
                null,
                "https://github.com/pallets/flask",
                "2010-04-06T11:11:59Z",
                "2024-01-02T03:04:05Z",
                64000
            ])
        );
    }

    #[test]
    fn test_description_serialized_when_present() {
        let record = RepoRecord::new(1, "a", "u", 0).with_description("web framework");
        let json = serde_json::to_value(&record).unwrap();
        assert_eq!(json[2], "web framework");
    }
}
