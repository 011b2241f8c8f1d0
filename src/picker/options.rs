use crate::core::field::SelectOption;
use crate::remote::ApiError;

/// Resource kinds a dynamic value can point at.
pub mod resource_type {
    pub const GATEWAY: &str = "gateway";
    pub const NODE: &str = "node";
    pub const SOURCE: &str = "source";
    pub const FIELD: &str = "field";
    pub const TASK: &str = "task";
    pub const SCHEDULE: &str = "schedule";
    pub const HANDLER: &str = "handler";
    pub const DATA_REPOSITORY: &str = "data_repository";
}

pub fn resource_type_options() -> Vec<SelectOption> {
    vec![
        SelectOption::new(resource_type::GATEWAY, "Gateway"),
        SelectOption::new(resource_type::NODE, "Node"),
        SelectOption::new(resource_type::SOURCE, "Source"),
        SelectOption::new(resource_type::FIELD, "Field"),
        SelectOption::new(resource_type::TASK, "Task"),
        SelectOption::new(resource_type::SCHEDULE, "Schedule"),
        SelectOption::new(resource_type::HANDLER, "Handler"),
        SelectOption::new(resource_type::DATA_REPOSITORY, "Data Repository"),
    ]
}

/// A quick id addresses one resource as `<type>:<id>`.
pub fn quick_id(resource_type: &str, id: &str) -> String {
    format!("{resource_type}:{id}")
}

/// Asynchronous option lookup for resource-reference fields. The embedding
/// application supplies the backing list API; the picker only forwards the
/// resource type and the user's typeahead query.
pub trait OptionsProvider: Send + Sync {
    fn options(&self, resource_type: &str, query: &str) -> Result<Vec<SelectOption>, ApiError>;
}

#[cfg(test)]
mod tests {
    use super::{quick_id, resource_type};

    #[test]
    fn quick_id_joins_type_and_id() {
        assert_eq!(quick_id(resource_type::GATEWAY, "gw-01"), "gateway:gw-01");
    }
}
