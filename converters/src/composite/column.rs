use serde::{Deserialize, Serialize};

/// One attribute of a table, view or composite type as reported by the catalog
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ColumnInfo {
    pub type_schema: String,
    pub type_name: String,
    pub column_name: String,
    pub column_schema: String,
    pub column_type: String,
    /// 1-based position among the type's live attributes
    pub order: i16,
    pub nullable: bool,
}

impl ColumnInfo {
    pub fn new(
        type_schema: impl Into<String>,
        type_name: impl Into<String>,
        column_name: impl Into<String>,
        column_type: impl Into<String>,
        order: i16,
    ) -> Self {
        let type_schema = type_schema.into();
        Self {
            column_schema: type_schema.clone(),
            type_schema,
            type_name: type_name.into(),
            column_name: column_name.into(),
            column_type: column_type.into(),
            order,
            nullable: true,
        }
    }

    pub fn not_null(mut self) -> Self {
        self.nullable = false;
        self
    }

    /// Whether this column belongs to `schema`.`type_name`
    pub fn belongs_to(&self, schema: &str, type_name: &str) -> bool {
        self.type_schema == schema && self.type_name == type_name
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_json_snapshot_round_trip() {
        let columns = vec![
            ColumnInfo::new("test", "Simple", "number", "int4", 1).not_null(),
            ColumnInfo::new("test", "Simple", "text", "varchar", 2),
        ];
        let json = serde_json::to_string(&columns).unwrap();
        let restored: Vec<ColumnInfo> = serde_json::from_str(&json).unwrap();
        assert_eq!(restored, columns);
        assert!(!restored[0].nullable);
        assert!(restored[1].belongs_to("test", "Simple"));
        assert!(!restored[1].belongs_to("public", "Simple"));
    }
}
