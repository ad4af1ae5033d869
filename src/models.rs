use serde::{Serialize, Deserialize};
use chrono::{DateTime, Utc};
use serde_json::Value;
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// Body of one `/generate` submission. All four fields are required; they
/// are kept as plain strings because input arrives untyped from the
/// presentation layer and is only validated when a submission starts.
#[derive(Debug, Serialize, Deserialize, Clone, Default, PartialEq)]
pub struct GenerationRequest {
    pub url: String,
    pub platform: String,
    pub form_name: String,
    pub language: String,
}

/// The four editable fields of a [`GenerationRequest`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Field {
    Url,
    Platform,
    FormName,
    Language,
}

#[derive(Debug, Error)]
#[error("unknown field: {0}")]
pub struct UnknownField(pub String);

impl FromStr for Field {
    type Err = UnknownField;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "url" => Ok(Field::Url),
            "platform" => Ok(Field::Platform),
            "form_name" => Ok(Field::FormName),
            "language" => Ok(Field::Language),
            other => Err(UnknownField(other.to_string())),
        }
    }
}

/// Output languages the generation service supports.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum Language {
    Python,
    Java,
    Csharp,
}

impl Language {
    pub fn as_str(&self) -> &'static str {
        match self {
            Language::Python => "python",
            Language::Java => "java",
            Language::Csharp => "csharp",
        }
    }
}

impl fmt::Display for Language {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Error)]
#[error("unsupported language: {0:?} (expected python, java or csharp)")]
pub struct UnknownLanguage(pub String);

impl FromStr for Language {
    type Err = UnknownLanguage;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "python" => Ok(Language::Python),
            "java" => Ok(Language::Java),
            "csharp" => Ok(Language::Csharp),
            other => Err(UnknownLanguage(other.to_string())),
        }
    }
}

/// Lifecycle stage of the current submission.
///
/// `idle → submitting → succeeded | failed`; a later submission re-enters
/// `submitting`, so there is no terminal stage.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum Phase {
    Idle,
    Submitting,
    Succeeded,
    Failed,
}

impl fmt::Display for Phase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Phase::Idle => write!(f, "idle"),
            Phase::Submitting => write!(f, "submitting"),
            Phase::Succeeded => write!(f, "succeeded"),
            Phase::Failed => write!(f, "failed"),
        }
    }
}

/// One consistent view of the workflow, cheap to hand to a UI layer.
///
/// `result` is the opaque payload returned by the service and is present
/// only when `phase` is `succeeded`; `error_message` only when `failed`.
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct WorkflowSnapshot {
    pub request: GenerationRequest,
    pub phase: Phase,
    pub result: Option<Value>,
    pub error_message: Option<String>,
    pub updated_at: DateTime<Utc>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn language_parses_the_closed_set() {
        assert_eq!("python".parse::<Language>().unwrap(), Language::Python);
        assert_eq!("java".parse::<Language>().unwrap(), Language::Java);
        assert_eq!("csharp".parse::<Language>().unwrap(), Language::Csharp);
        assert!("ruby".parse::<Language>().is_err());
        assert!("".parse::<Language>().is_err());
        assert!("Python".parse::<Language>().is_err());
    }

    #[test]
    fn language_serializes_lowercase() {
        assert_eq!(serde_json::to_string(&Language::Csharp).unwrap(), "\"csharp\"");
    }

    #[test]
    fn field_parses_wire_names() {
        assert_eq!("form_name".parse::<Field>().unwrap(), Field::FormName);
        assert!("formName".parse::<Field>().is_err());
    }
}
