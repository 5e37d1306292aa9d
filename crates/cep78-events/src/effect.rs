//! Execution effects and their transforms, parsed from node JSON.

use cep78_types::ClType;
use serde::Deserialize;
use serde_json::Value;

use crate::error::{EffectError, ParseError};

/// One name-to-key association added by an `AddKeys` transform.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct NamedKey {
    /// Named key.
    pub name: String,
    /// Storage key the name points at.
    pub key: String,
}

/// Operation recorded by a transform.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TransformKind {
    /// A value written under the transform key.
    Write {
        /// Declared type; [`ClType::Any`] marks a dynamically typed value.
        cl_type: ClType,
        /// Encoded value bytes.
        bytes: Vec<u8>,
    },
    /// Named keys added to an account or contract.
    AddKeys(Vec<NamedKey>),
    /// Any other operation, by name; not interpreted here.
    Other(String),
}

/// One state mutation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Transform {
    /// Storage key the operation applies to.
    pub key: String,
    /// Operation.
    pub kind: TransformKind,
}

impl Transform {
    /// `Write` transform.
    pub fn write(key: impl Into<String>, cl_type: ClType, bytes: Vec<u8>) -> Self {
        Self {
            key: key.into(),
            kind: TransformKind::Write { cl_type, bytes },
        }
    }

    /// `AddKeys` transform.
    pub fn add_keys(key: impl Into<String>, named_keys: Vec<NamedKey>) -> Self {
        Self {
            key: key.into(),
            kind: TransformKind::AddKeys(named_keys),
        }
    }

    /// Parses one `{"key", "transform"}` entry.
    pub fn from_json(value: &Value) -> Result<Self, ParseError> {
        let raw: RawTransform = serde_json::from_value(value.clone())?;
        let kind = match raw.transform {
            Value::String(name) => TransformKind::Other(name),
            Value::Object(mut fields) => {
                if let Some(write) = fields.remove("WriteCLValue") {
                    let write: RawClValue = serde_json::from_value(write)?;
                    let bytes = hex::decode(&write.bytes).map_err(|source| ParseError::InvalidHex {
                        key: raw.key.clone(),
                        source,
                    })?;
                    TransformKind::Write {
                        cl_type: write.cl_type,
                        bytes,
                    }
                } else if let Some(added) = fields.remove("AddKeys") {
                    TransformKind::AddKeys(serde_json::from_value(added)?)
                } else {
                    let name = fields.keys().next().cloned().unwrap_or_default();
                    TransformKind::Other(name)
                }
            }
            _ => return Err(ParseError::MissingField("transform")),
        };
        Ok(Self { key: raw.key, kind })
    }
}

#[derive(Deserialize)]
struct RawTransform {
    key: String,
    transform: Value,
}

#[derive(Deserialize)]
struct RawClValue {
    cl_type: ClType,
    bytes: String,
}

/// Outcome of executing a transaction.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome {
    /// Execution succeeded.
    Success,
    /// Execution failed.
    Failure {
        /// Reason reported by the node.
        error_message: String,
    },
}

/// Ordered transforms produced by one execution, with its outcome.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExecutionEffect {
    /// Success or failure.
    pub outcome: Outcome,
    /// Transforms in execution order.
    pub transforms: Vec<Transform>,
}

impl ExecutionEffect {
    /// Successful effect.
    pub fn success(transforms: Vec<Transform>) -> Self {
        Self {
            outcome: Outcome::Success,
            transforms,
        }
    }

    /// Failed effect.
    pub fn failure(error_message: impl Into<String>, transforms: Vec<Transform>) -> Self {
        Self {
            outcome: Outcome::Failure {
                error_message: error_message.into(),
            },
            transforms,
        }
    }

    /// True for successful executions.
    pub fn is_success(&self) -> bool {
        self.outcome == Outcome::Success
    }

    /// Transforms usable for extraction.
    ///
    /// Failed executions only record fee handling, so their transforms are
    /// never handed out.
    pub fn usable_transforms(&self) -> Result<&[Transform], EffectError> {
        match &self.outcome {
            Outcome::Success => Ok(&self.transforms),
            Outcome::Failure { error_message } => Err(EffectError::NoEffectData {
                error_message: error_message.clone(),
            }),
        }
    }

    /// Parses `{"Success": {"effect": {"transforms": […]}}}` or
    /// `{"Failure": {"error_message": …, "effect": …}}`.
    pub fn from_execution_result(value: &Value) -> Result<Self, ParseError> {
        if let Some(success) = value.get("Success") {
            return Ok(Self::success(parse_transforms(success)?));
        }
        if let Some(failure) = value.get("Failure") {
            let error_message = failure
                .get("error_message")
                .and_then(Value::as_str)
                .unwrap_or_default()
                .to_string();
            return Ok(Self::failure(error_message, parse_transforms(failure)?));
        }
        Err(ParseError::MissingField("Success"))
    }
}

fn parse_transforms(result: &Value) -> Result<Vec<Transform>, ParseError> {
    match result.get("effect").and_then(|effect| effect.get("transforms")) {
        Some(Value::Array(entries)) => entries.iter().map(Transform::from_json).collect(),
        Some(_) => Err(ParseError::MissingField("transforms")),
        None => Ok(Vec::new()),
    }
}

/// A processed deploy from the node's event stream.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeployProcessed {
    /// Deploy hash as reported by the node.
    pub deploy_hash: String,
    /// Execution effect.
    pub effect: ExecutionEffect,
}

/// Parses a `DeployProcessed` stream item, optionally wrapped in `body`.
///
/// Returns `Ok(None)` for other stream items.
pub fn parse_deploy_processed(value: &Value) -> Result<Option<DeployProcessed>, ParseError> {
    let value = value.get("body").unwrap_or(value);
    let processed = match value.get("DeployProcessed") {
        Some(processed) => processed,
        None => return Ok(None),
    };
    let deploy_hash = processed
        .get("deploy_hash")
        .and_then(Value::as_str)
        .ok_or(ParseError::MissingField("deploy_hash"))?
        .to_string();
    let result = processed
        .get("execution_result")
        .ok_or(ParseError::MissingField("execution_result"))?;
    Ok(Some(DeployProcessed {
        deploy_hash,
        effect: ExecutionEffect::from_execution_result(result)?,
    }))
}
