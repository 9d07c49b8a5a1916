//! Static table registry: which tables are served, their primary key, and
//! their delete policy. Built once at startup and immutable thereafter;
//! table and column identifiers spliced into SQL come only from here and
//! from the introspected model, never from caller input.

/// One registered table.
#[derive(Clone, Debug)]
pub struct TableSpec {
    pub name: String,
    pub primary_key_column: String,
    /// When true, delete sets `is_deleted` and reads filter on it.
    pub soft_delete: bool,
}

impl TableSpec {
    pub fn new(name: &str, primary_key_column: &str, soft_delete: bool) -> Self {
        TableSpec {
            name: name.to_string(),
            primary_key_column: primary_key_column.to_string(),
            soft_delete,
        }
    }
}

/// Ordered, immutable set of registered tables. Iteration preserves
/// registration order, which also governs the aggregate read.
#[derive(Clone, Debug)]
pub struct TableRegistry {
    tables: Vec<TableSpec>,
}

impl TableRegistry {
    pub fn new(tables: Vec<TableSpec>) -> Self {
        TableRegistry { tables }
    }

    pub fn get(&self, name: &str) -> Option<&TableSpec> {
        self.tables.iter().find(|t| t.name == name)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.get(name).is_some()
    }

    pub fn iter(&self) -> impl Iterator<Item = &TableSpec> {
        self.tables.iter()
    }

    pub fn len(&self) -> usize {
        self.tables.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tables.is_empty()
    }
}

/// The deployed schema: each table with its primary key column.
/// Comments, Messages, Posts and Users are soft-delete tables.
pub fn default_registry() -> TableRegistry {
    TableRegistry::new(vec![
        TableSpec::new("ChatbotMessages", "chat_id", false),
        TableSpec::new("Comments", "comment_id", true),
        TableSpec::new("Likes", "like_id", false),
        TableSpec::new("MentalHealthAnalysis", "record_id", false),
        TableSpec::new("Messages", "message_id", true),
        TableSpec::new("Notifications", "notification_id", false),
        TableSpec::new("Posts", "post_id", true),
        TableSpec::new("SentimentAnalysis", "analysis_id", false),
        TableSpec::new("UserInterests", "interest_id", false),
        TableSpec::new("Users", "user_id", true),
    ])
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_registry_lookup() {
        let reg = default_registry();
        assert_eq!(reg.len(), 10);
        let posts = reg.get("Posts").unwrap();
        assert_eq!(posts.primary_key_column, "post_id");
        assert!(posts.soft_delete);
        let likes = reg.get("Likes").unwrap();
        assert!(!likes.soft_delete);
        assert!(reg.get("NoSuchTable").is_none());
    }

    #[test]
    fn iteration_preserves_registration_order() {
        let reg = TableRegistry::new(vec![
            TableSpec::new("B", "id", false),
            TableSpec::new("A", "id", false),
        ]);
        let names: Vec<&str> = reg.iter().map(|t| t.name.as_str()).collect();
        assert_eq!(names, vec!["B", "A"]);
    }
}
