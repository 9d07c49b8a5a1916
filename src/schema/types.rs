//! Mapping from store-native column type names to semantic field types.

use serde::Serialize;

/// Abstract value kind of a column, independent of the store's spelling.
/// Every field is nullable; absence of a value is always representable.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum SemanticType {
    Integer,
    Float,
    Boolean,
    Text,
    Binary,
}

/// Case-insensitive substring match against a fixed rule table; first match
/// wins, unmatched types default to Text. Date/time types map to Text and
/// travel as ISO-like strings with no timezone normalization.
pub fn map_type(raw_type: &str) -> SemanticType {
    let t = raw_type.to_lowercase();
    if t.contains("int") {
        SemanticType::Integer
    } else if t.contains("decimal") || t.contains("numeric") || t.contains("money") {
        SemanticType::Float
    } else if t.contains("float") || t.contains("real") {
        SemanticType::Float
    } else if t.contains("bit") || t.contains("bool") {
        SemanticType::Boolean
    } else if t.contains("char") || t.contains("text") {
        SemanticType::Text
    } else if t.contains("date") || t.contains("time") {
        SemanticType::Text
    } else if t.contains("binary") || t.contains("image") || t.contains("bytea") {
        SemanticType::Binary
    } else {
        SemanticType::Text
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn integer_types() {
        assert_eq!(map_type("int"), SemanticType::Integer);
        assert_eq!(map_type("bigint"), SemanticType::Integer);
        assert_eq!(map_type("smallint"), SemanticType::Integer);
        assert_eq!(map_type("INTEGER"), SemanticType::Integer);
    }

    #[test]
    fn float_types() {
        assert_eq!(map_type("decimal"), SemanticType::Float);
        assert_eq!(map_type("numeric"), SemanticType::Float);
        assert_eq!(map_type("money"), SemanticType::Float);
        assert_eq!(map_type("float"), SemanticType::Float);
        assert_eq!(map_type("real"), SemanticType::Float);
    }

    #[test]
    fn boolean_types() {
        assert_eq!(map_type("bit"), SemanticType::Boolean);
        assert_eq!(map_type("boolean"), SemanticType::Boolean);
    }

    #[test]
    fn text_types() {
        assert_eq!(map_type("varchar"), SemanticType::Text);
        assert_eq!(map_type("nvarchar"), SemanticType::Text);
        assert_eq!(map_type("character varying"), SemanticType::Text);
        assert_eq!(map_type("text"), SemanticType::Text);
    }

    #[test]
    fn date_time_types_are_text() {
        assert_eq!(map_type("date"), SemanticType::Text);
        assert_eq!(map_type("datetime"), SemanticType::Text);
        assert_eq!(map_type("timestamp without time zone"), SemanticType::Text);
    }

    #[test]
    fn binary_types() {
        assert_eq!(map_type("varbinary"), SemanticType::Binary);
        assert_eq!(map_type("image"), SemanticType::Binary);
        assert_eq!(map_type("bytea"), SemanticType::Binary);
    }

    #[test]
    fn unmatched_defaults_to_text() {
        assert_eq!(map_type("geography"), SemanticType::Text);
        assert_eq!(map_type("uuid"), SemanticType::Text);
        assert_eq!(map_type(""), SemanticType::Text);
    }

    #[test]
    fn first_match_wins() {
        // "interval" is a time type but hits the "int" substring rule first.
        assert_eq!(map_type("interval"), SemanticType::Integer);
    }
}
