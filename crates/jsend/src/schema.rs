use crate::error::{SchemaLoadError, SchemaViolation, Violation};
use crate::status::Status;
use jsonschema::error::ValidationErrorKind;
use jsonschema::{Draft, JSONSchema};
use once_cell::sync::OnceCell;
use serde_json::Value;
use std::fmt;
use tracing::debug;

const BASE_SCHEMA: &str = include_str!("../../../contracts/jsend/base.json");
const SUCCESS_SCHEMA: &str = include_str!("../../../contracts/jsend/success.json");
const FAIL_SCHEMA: &str = include_str!("../../../contracts/jsend/fail.json");
const ERROR_SCHEMA: &str = include_str!("../../../contracts/jsend/error.json");

static REGISTRY: OnceCell<SchemaRegistry> = OnceCell::new();

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SchemaKind {
    Base,
    Success,
    Fail,
    Error,
}

impl SchemaKind {
    pub const ALL: [SchemaKind; 4] = [
        SchemaKind::Base,
        SchemaKind::Success,
        SchemaKind::Fail,
        SchemaKind::Error,
    ];

    fn source(&self) -> &'static str {
        match self {
            SchemaKind::Base => BASE_SCHEMA,
            SchemaKind::Success => SUCCESS_SCHEMA,
            SchemaKind::Fail => FAIL_SCHEMA,
            SchemaKind::Error => ERROR_SCHEMA,
        }
    }
}

impl From<Status> for SchemaKind {
    fn from(status: Status) -> Self {
        match status {
            Status::Success => SchemaKind::Success,
            Status::Fail => SchemaKind::Fail,
            Status::Error => SchemaKind::Error,
        }
    }
}

impl fmt::Display for SchemaKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            SchemaKind::Base => "base",
            SchemaKind::Success => "success",
            SchemaKind::Fail => "fail",
            SchemaKind::Error => "error",
        };
        f.write_str(name)
    }
}

/// The compiled envelope schemas.
///
/// Parsers share one process-wide instance obtained through
/// [`SchemaRegistry::global`]; it is compiled on first use and read-only after.
pub struct SchemaRegistry {
    base: JSONSchema,
    success: JSONSchema,
    fail: JSONSchema,
    error: JSONSchema,
}

impl SchemaRegistry {
    /// Compiles a fresh set of schemas from the embedded definitions.
    pub fn load() -> Result<Self, SchemaLoadError> {
        debug!("Compiling embedded JSend schemas");

        Ok(Self {
            base: compile(SchemaKind::Base)?,
            success: compile(SchemaKind::Success)?,
            fail: compile(SchemaKind::Fail)?,
            error: compile(SchemaKind::Error)?,
        })
    }

    /// Populates the shared registry if it is not populated yet.
    ///
    /// Concurrent callers block on the same load. A failed load leaves the
    /// registry empty, so a later call tries again.
    pub fn init() -> Result<&'static SchemaRegistry, SchemaLoadError> {
        REGISTRY.get_or_try_init(Self::load)
    }

    /// The shared registry.
    ///
    /// # Panics
    ///
    /// Panics if the embedded schemas cannot be compiled, which means the
    /// crate was packaged with broken contracts. Call [`SchemaRegistry::init`]
    /// at startup to surface that as an error instead.
    pub fn global() -> &'static SchemaRegistry {
        match Self::init() {
            Ok(registry) => registry,
            Err(e) => panic!("embedded JSend schemas are unusable: {}", e),
        }
    }

    pub fn get(&self, kind: SchemaKind) -> &JSONSchema {
        match kind {
            SchemaKind::Base => &self.base,
            SchemaKind::Success => &self.success,
            SchemaKind::Fail => &self.fail,
            SchemaKind::Error => &self.error,
        }
    }

    pub fn validate(&self, kind: SchemaKind, instance: &Value) -> Result<(), SchemaViolation> {
        if let Err(errors) = self.get(kind).validate(instance) {
            let errors: Vec<Violation> = errors
                .map(|error| {
                    let message = match &error.kind {
                        ValidationErrorKind::Required { property } => format!(
                            "missing required property: {}",
                            property.as_str().map(str::to_string).unwrap_or_else(|| property.to_string())
                        ),
                        _ => error.to_string(),
                    };
                    Violation {
                        path: error.instance_path.to_string(),
                        message,
                    }
                })
                .collect();

            return Err(SchemaViolation {
                schema: kind,
                errors,
            });
        }

        Ok(())
    }

    /// Validates against the base schema and returns the discriminator.
    pub fn check_base(&self, instance: &Value) -> Result<Status, SchemaViolation> {
        self.validate(SchemaKind::Base, instance)?;

        instance
            .get("status")
            .and_then(Value::as_str)
            .ok_or_else(|| SchemaViolation::new(SchemaKind::Base, "missing required property: status"))?
            .parse::<Status>()
            .map_err(|e| SchemaViolation::new(SchemaKind::Base, e.to_string()))
    }

    /// Full envelope check: base schema, then the schema for its status.
    pub fn check_envelope(&self, instance: &Value) -> Result<Status, SchemaViolation> {
        let status = self.check_base(instance)?;
        self.validate(status.into(), instance)?;
        Ok(status)
    }
}

fn compile(kind: SchemaKind) -> Result<JSONSchema, SchemaLoadError> {
    let schema_value: Value = serde_json::from_str(kind.source())
        .map_err(|source| SchemaLoadError::InvalidJson { schema: kind, source })?;

    JSONSchema::options()
        .with_draft(Draft::Draft7)
        .compile(&schema_value)
        .map_err(|e| SchemaLoadError::CompilationFailed {
            schema: kind,
            message: e.to_string(),
        })
}
