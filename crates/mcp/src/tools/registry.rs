// Tool registry: ordered, immutable catalog of descriptors

use super::{ToolDescriptor, ToolGroup};
use crate::error::{ToolError, ToolResult};
use crate::protocol::ToolSchema;
use std::collections::HashMap;

/// Catalog of every tool, in group registration order.
#[derive(Debug, Clone)]
pub struct ToolRegistry {
    tools: Vec<ToolDescriptor>,
    index: HashMap<String, usize>,
}

impl ToolRegistry {
    /// Build from groups. Duplicate names across or within groups are rejected.
    pub fn build(groups: Vec<ToolGroup>) -> ToolResult<Self> {
        let mut tools = Vec::new();
        let mut index = HashMap::new();

        for group in groups {
            let group_name = group.name();
            for descriptor in group.into_tools() {
                if index.contains_key(descriptor.name()) {
                    return Err(ToolError::configuration(format!(
                        "duplicate tool name '{}' in group '{}'",
                        descriptor.name(),
                        group_name
                    )));
                }
                index.insert(descriptor.name().to_string(), tools.len());
                tools.push(descriptor);
            }
        }

        Ok(Self { tools, index })
    }

    /// Descriptors in registration order.
    pub fn list(&self) -> &[ToolDescriptor] {
        &self.tools
    }

    /// Get a descriptor by name
    pub fn get(&self, name: &str) -> Option<&ToolDescriptor> {
        self.index.get(name).map(|&i| &self.tools[i])
    }

    /// Check if a tool exists
    pub fn contains(&self, name: &str) -> bool {
        self.index.contains_key(name)
    }

    pub fn len(&self) -> usize {
        self.tools.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tools.is_empty()
    }

    /// List all tool schemas
    pub fn list_schemas(&self) -> Vec<ToolSchema> {
        self.tools.iter().map(ToolDescriptor::to_schema).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schema::{FieldSpec, Schema};

    fn tool(name: &str) -> ToolDescriptor {
        ToolDescriptor::build(
            Schema::new().field("query", FieldSpec::string("Query string")),
            name,
            "A tool",
        )
        .unwrap()
    }

    #[test]
    fn test_preserves_group_then_declaration_order() {
        let registry = ToolRegistry::build(vec![
            ToolGroup::new("first", vec![tool("b"), tool("a")]),
            ToolGroup::new("second", vec![tool("c")]),
        ])
        .unwrap();

        let names: Vec<String> = registry.list_schemas().into_iter().map(|s| s.name).collect();
        assert_eq!(names, vec!["b", "a", "c"]);
        assert_eq!(registry.len(), 3);
    }

    #[test]
    fn test_lookup() {
        let registry = ToolRegistry::build(vec![ToolGroup::new("g", vec![tool("x")])]).unwrap();

        assert!(registry.contains("x"));
        assert_eq!(registry.get("x").unwrap().name(), "x");
        assert!(registry.get("y").is_none());
    }

    #[test]
    fn test_duplicate_across_groups_rejected() {
        let err = ToolRegistry::build(vec![
            ToolGroup::new("one", vec![tool("dup")]),
            ToolGroup::new("two", vec![tool("dup")]),
        ])
        .unwrap_err();

        assert!(matches!(err, ToolError::Configuration(_)));
        assert!(err.to_string().contains("duplicate tool name 'dup' in group 'two'"));
    }

    #[test]
    fn test_empty_registry() {
        let registry = ToolRegistry::build(Vec::new()).unwrap();
        assert!(registry.is_empty());
        assert!(registry.list_schemas().is_empty());
    }
}
