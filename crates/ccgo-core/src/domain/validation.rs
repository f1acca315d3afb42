use crate::domain::{
    entities::{BuildConfig, ProjectStructure, Template},
    error::DomainError,
};

/// Centralized domain validation.
///
/// Services call through here instead of reaching into each entity.
pub struct DomainValidator;

impl DomainValidator {
    pub fn validate_build_config(config: &BuildConfig) -> Result<(), DomainError> {
        config.validate()
    }

    pub fn validate_template(template: &Template) -> Result<(), DomainError> {
        template.validate()
    }

    pub fn validate_project_structure(structure: &ProjectStructure) -> Result<(), DomainError> {
        structure.validate()
    }
}
