//! JSON Schema validators for the two audit report shapes.
//!
//! Each shape has its own schema, compiled once into a [`SchemaValidator`].
//! [`ReportValidators`] bundles both and is meant to be built once at start-up
//! and handed to the resolver, so there is no process-wide validator state.
//!
//! The schemas only pin down the fields normalization reads. Audit tools add
//! fields between releases, so extra properties are accepted.

use super::traits::ParseError;
use serde_json::{json, Value};

/// Severity names accepted in either shape.
const SEVERITIES: [&str; 5] = ["info", "low", "moderate", "high", "critical"];

/// Schema for the `metadata.vulnerabilities` summary counts.
fn counts_schema() -> Value {
    let count = json!({ "type": "integer", "minimum": 0 });
    json!({
        "type": "object",
        "properties": {
            "info": count,
            "low": count,
            "moderate": count,
            "high": count,
            "critical": count,
            "total": count
        }
    })
}

fn metadata_schema() -> Value {
    json!({
        "type": "object",
        "required": ["vulnerabilities"],
        "properties": {
            "vulnerabilities": counts_schema()
        }
    })
}

/// Schema for the advisory-keyed report shape.
#[must_use]
pub fn legacy_schema() -> Value {
    json!({
        "$schema": "https://json-schema.org/draft/2020-12/schema",
        "title": "legacy audit report",
        "type": "object",
        "required": ["advisories", "metadata"],
        "properties": {
            "advisories": {
                "type": "object",
                "additionalProperties": {
                    "type": "object",
                    "required": ["id", "module_name", "severity", "title"],
                    "properties": {
                        "id": { "type": ["integer", "string"] },
                        "module_name": { "type": "string", "minLength": 1 },
                        "severity": { "enum": SEVERITIES },
                        "title": { "type": "string" },
                        "url": { "type": "string" },
                        "vulnerable_versions": { "type": "string" }
                    }
                }
            },
            "metadata": metadata_schema()
        }
    })
}

/// Schema for the package-keyed report shape.
#[must_use]
pub fn modern_schema() -> Value {
    json!({
        "$schema": "https://json-schema.org/draft/2020-12/schema",
        "title": "modern audit report",
        "type": "object",
        "required": ["vulnerabilities", "metadata"],
        "properties": {
            "auditReportVersion": { "type": "integer", "minimum": 2 },
            "vulnerabilities": {
                "type": "object",
                "additionalProperties": {
                    "type": "object",
                    "required": ["via"],
                    "properties": {
                        "name": { "type": "string" },
                        "severity": { "enum": SEVERITIES },
                        "via": {
                            "type": "array",
                            "items": {
                                "anyOf": [
                                    { "type": "string" },
                                    {
                                        "type": "object",
                                        "required": ["source", "title", "severity"],
                                        "properties": {
                                            "source": { "type": ["integer", "string"] },
                                            "name": { "type": "string" },
                                            "title": { "type": "string" },
                                            "url": { "type": "string" },
                                            "severity": { "enum": SEVERITIES },
                                            "range": { "type": "string" }
                                        }
                                    }
                                ]
                            }
                        }
                    }
                }
            },
            "metadata": metadata_schema()
        }
    })
}

/// A compiled JSON Schema with a name for diagnostics.
#[derive(Debug)]
pub struct SchemaValidator {
    name: &'static str,
    validator: jsonschema::Validator,
}

impl SchemaValidator {
    /// Compile `schema`.
    pub fn new(name: &'static str, schema: &Value) -> Result<Self, ParseError> {
        let validator = jsonschema::validator_for(schema).map_err(|e| ParseError::Schema {
            name: name.to_string(),
            message: e.to_string(),
        })?;
        Ok(Self { name, validator })
    }

    /// Name given at construction.
    #[must_use]
    pub const fn name(&self) -> &'static str {
        self.name
    }

    /// Validate `value`, returning every violation on failure.
    pub fn validate(&self, value: &Value) -> Result<(), Vec<String>> {
        let errors: Vec<String> = self
            .validator
            .iter_errors(value)
            .map(|e| e.to_string())
            .collect();
        if errors.is_empty() {
            Ok(())
        } else {
            Err(errors)
        }
    }

    #[must_use]
    pub fn is_valid(&self, value: &Value) -> bool {
        self.validator.is_valid(value)
    }
}

/// Validators for both report shapes.
#[derive(Debug)]
pub struct ReportValidators {
    pub legacy: SchemaValidator,
    pub modern: SchemaValidator,
}

impl ReportValidators {
    /// Compile the bundled schemas.
    pub fn new() -> Result<Self, ParseError> {
        Ok(Self {
            legacy: SchemaValidator::new("legacy", &legacy_schema())?,
            modern: SchemaValidator::new("modern", &modern_schema())?,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn validators() -> ReportValidators {
        ReportValidators::new().expect("bundled schemas compile")
    }

    #[test]
    fn test_legacy_accepts_numeric_and_string_ids() {
        let v = validators();
        let doc = json!({
            "advisories": {
                "1001": { "id": 1001, "module_name": "lodash", "severity": "critical", "title": "t" },
                "GHSA-x": { "id": "GHSA-x", "module_name": "minimist", "severity": "low", "title": "t" }
            },
            "metadata": { "vulnerabilities": { "critical": 1, "low": 1 } }
        });
        assert!(v.legacy.validate(&doc).is_ok());
        assert!(!v.modern.is_valid(&doc));
    }

    #[test]
    fn test_legacy_rejects_unknown_severity() {
        let v = validators();
        let doc = json!({
            "advisories": {
                "1": { "id": 1, "module_name": "a", "severity": "severe", "title": "t" }
            },
            "metadata": { "vulnerabilities": {} }
        });
        let errors = v.legacy.validate(&doc).expect_err("should fail");
        assert!(!errors.is_empty());
    }

    #[test]
    fn test_modern_accepts_string_and_object_via() {
        let v = validators();
        let doc = json!({
            "auditReportVersion": 2,
            "vulnerabilities": {
                "express": { "name": "express", "severity": "high", "via": ["body-parser"] },
                "body-parser": {
                    "name": "body-parser",
                    "severity": "high",
                    "via": [{ "source": 1096, "title": "DoS", "severity": "high", "range": "<1.20.3" }]
                }
            },
            "metadata": { "vulnerabilities": { "high": 2, "total": 2 } }
        });
        assert!(v.modern.validate(&doc).is_ok());
        assert!(!v.legacy.is_valid(&doc));
    }

    #[test]
    fn test_modern_rejects_via_object_without_source() {
        let v = validators();
        let doc = json!({
            "vulnerabilities": {
                "a": { "via": [{ "title": "x", "severity": "high" }] }
            },
            "metadata": { "vulnerabilities": {} }
        });
        assert!(v.modern.validate(&doc).is_err());
    }

    #[test]
    fn test_negative_counts_rejected() {
        let v = validators();
        let doc = json!({
            "advisories": {},
            "metadata": { "vulnerabilities": { "high": -1 } }
        });
        assert!(v.legacy.validate(&doc).is_err());
    }

    #[test]
    fn test_validator_names() {
        let v = validators();
        assert_eq!(v.legacy.name(), "legacy");
        assert_eq!(v.modern.name(), "modern");
    }
}
