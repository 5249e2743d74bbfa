//! Structural validation of request bodies.
//!
//! Runs on the raw JSON before it is bound to a request type, so the client
//! learns which field is missing or ill-typed instead of a generic parse
//! failure. The first failing field wins.

use std::sync::LazyLock;

use regex::Regex;
use serde_json::Value;
use unicode_normalization::UnicodeNormalization;

use crate::errors::domain::DomainError;

pub const MAX_NICK_LEN: usize = 32;
pub const MAX_PASSWORD_LEN: usize = 128;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldKind {
    /// Non-empty string.
    Text,
    /// Non-negative integer.
    Index,
}

#[derive(Debug, Clone, Copy)]
pub struct Field {
    pub name: &'static str,
    pub kind: FieldKind,
}

impl Field {
    pub const fn text(name: &'static str) -> Self {
        Self {
            name,
            kind: FieldKind::Text,
        }
    }

    pub const fn index(name: &'static str) -> Self {
        Self {
            name,
            kind: FieldKind::Index,
        }
    }
}

/// Request bodies declare the fields they require.
pub trait Validate {
    const FIELDS: &'static [Field];
}

/// Checks that `body` is an object carrying every field in `fields` with
/// the expected shape.
pub fn validate(body: &Value, fields: &[Field]) -> Result<(), DomainError> {
    let object = body
        .as_object()
        .ok_or_else(|| DomainError::malformed("Request body must be a JSON object"))?;

    for field in fields {
        let value = match object.get(field.name) {
            None | Some(Value::Null) => {
                return Err(DomainError::malformed(format!("{} is undefined", field.name)))
            }
            Some(v) => v,
        };
        let ok = match field.kind {
            FieldKind::Text => value.as_str().is_some_and(|s| !s.trim().is_empty()),
            FieldKind::Index => value.as_u64().is_some(),
        };
        if !ok {
            return Err(DomainError::malformed(format!(
                "{} is not a valid {}",
                field.name,
                match field.kind {
                    FieldKind::Text => "string",
                    FieldKind::Index => "integer",
                }
            )));
        }
    }
    Ok(())
}

fn nick_regex() -> &'static Regex {
    static NICK_REGEX: LazyLock<Regex> = LazyLock::new(|| {
        #[allow(clippy::unwrap_used)]
        Regex::new(r"^[\p{L}\p{N}_.\-]+$").unwrap()
    });
    &NICK_REGEX
}

/// Trims and NFC-normalizes a nick so visually equal nicks map to one
/// account, then checks its length and alphabet.
pub fn normalize_nick(raw: &str) -> Result<String, DomainError> {
    let nick: String = raw.trim().nfc().collect();
    if nick.is_empty() {
        return Err(DomainError::malformed("nick is undefined"));
    }
    if nick.chars().count() > MAX_NICK_LEN || !nick_regex().is_match(&nick) {
        return Err(DomainError::malformed(format!("Invalid nick '{nick}'")));
    }
    Ok(nick)
}

pub fn check_password(password: &str) -> Result<(), DomainError> {
    if password.is_empty() {
        return Err(DomainError::malformed("password is undefined"));
    }
    if password.len() > MAX_PASSWORD_LEN {
        return Err(DomainError::malformed("password is too long"));
    }
    Ok(())
}
