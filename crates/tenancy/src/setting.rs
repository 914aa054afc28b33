//! Global key/value configuration rows with a declared value kind.

use serde::{Deserialize, Serialize};

use contaerp_core::{AuditContext, AuditStamp, DomainError, DomainResult, EntityId};

/// How a [`Setting`] value should be interpreted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SettingKind {
    String,
    Integer,
    Float,
    Boolean,
    Json,
}

impl SettingKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            SettingKind::String => "string",
            SettingKind::Integer => "integer",
            SettingKind::Float => "float",
            SettingKind::Boolean => "boolean",
            SettingKind::Json => "json",
        }
    }

    pub fn parse(s: &str) -> DomainResult<Self> {
        match s {
            "string" => Ok(SettingKind::String),
            "integer" => Ok(SettingKind::Integer),
            "float" => Ok(SettingKind::Float),
            "boolean" => Ok(SettingKind::Boolean),
            "json" => Ok(SettingKind::Json),
            other => Err(DomainError::validation(format!(
                "unknown setting kind: {other}"
            ))),
        }
    }
}

/// System-wide configuration entry. `key` is globally unique.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Setting {
    pub id: EntityId,
    pub key: String,
    pub value: String,
    pub description: Option<String>,
    pub kind: SettingKind,
    pub audit: AuditStamp,
}

impl Setting {
    pub fn new(
        key: impl Into<String>,
        value: impl Into<String>,
        kind: SettingKind,
        ctx: &AuditContext,
    ) -> DomainResult<Self> {
        let key = key.into();
        if key.trim().is_empty() {
            return Err(DomainError::validation("setting key cannot be empty"));
        }
        Ok(Self {
            id: EntityId::new(),
            key,
            value: value.into(),
            description: None,
            kind,
            audit: AuditStamp::new(ctx),
        })
    }

    /// Parse `value` as an integer; fails unless `kind` is `Integer`.
    pub fn as_integer(&self) -> DomainResult<i64> {
        if self.kind != SettingKind::Integer {
            return Err(DomainError::validation("setting is not an integer"));
        }
        self.value
            .parse()
            .map_err(|_| DomainError::validation("setting value is not a valid integer"))
    }

    /// Parse `value` as a boolean; fails unless `kind` is `Boolean`.
    pub fn as_boolean(&self) -> DomainResult<bool> {
        if self.kind != SettingKind::Boolean {
            return Err(DomainError::validation("setting is not a boolean"));
        }
        match self.value.as_str() {
            "true" | "1" => Ok(true),
            "false" | "0" => Ok(false),
            _ => Err(DomainError::validation(
                "setting value is not a valid boolean",
            )),
        }
    }

    /// Parse `value` as JSON; fails unless `kind` is `Json`.
    pub fn as_json(&self) -> DomainResult<serde_json::Value> {
        if self.kind != SettingKind::Json {
            return Err(DomainError::validation("setting is not json"));
        }
        serde_json::from_str(&self.value)
            .map_err(|e| DomainError::validation(format!("setting value is not valid json: {e}")))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use contaerp_core::UserId;

    fn ctx() -> AuditContext {
        AuditContext::now(UserId::new())
    }

    #[test]
    fn typed_accessors_respect_kind() {
        let s = Setting::new("fiscal.year_start", "7", SettingKind::Integer, &ctx()).unwrap();
        assert_eq!(s.as_integer().unwrap(), 7);
        assert!(s.as_boolean().is_err());
    }

    #[test]
    fn boolean_accepts_numeric_tokens() {
        let s = Setting::new("feature.x", "1", SettingKind::Boolean, &ctx()).unwrap();
        assert!(s.as_boolean().unwrap());
    }

    #[test]
    fn kind_tokens_roundtrip() {
        for kind in [
            SettingKind::String,
            SettingKind::Integer,
            SettingKind::Float,
            SettingKind::Boolean,
            SettingKind::Json,
        ] {
            assert_eq!(SettingKind::parse(kind.as_str()).unwrap(), kind);
        }
    }
}
