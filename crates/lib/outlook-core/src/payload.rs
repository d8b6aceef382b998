//! Request body shaping for Graph calls.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value, json};

/// Graph `emailAddress` resource.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EmailAddress {
    pub address: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
}

impl EmailAddress {
    #[must_use]
    pub fn new(address: impl Into<String>) -> Self {
        Self {
            address: address.into(),
            name: None,
        }
    }

    #[must_use]
    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }
}

/// Wraps an address in the Graph `recipient` shape.
#[must_use]
pub fn recipient(address: &EmailAddress) -> Value {
    let mut email = Map::new();
    email.insert("address".to_string(), json!(address.address));
    if let Some(name) = address.name.as_ref() {
        email.insert("name".to_string(), json!(name));
    }
    json!({ "emailAddress": Value::Object(email) })
}

/// Maps plain e-mail strings to `[{"emailAddress": {"address": ...}}]`.
#[must_use]
pub fn recipients(addresses: &[String]) -> Value {
    Value::Array(
        addresses
            .iter()
            .map(|address| json!({ "emailAddress": { "address": address } }))
            .collect(),
    )
}

#[must_use]
pub fn named_recipients(addresses: &[EmailAddress]) -> Value {
    Value::Array(addresses.iter().map(recipient).collect())
}

/// Message body; content is always sent as HTML.
#[must_use]
pub fn html_body(content: &str) -> Value {
    json!({ "contentType": "HTML", "content": content })
}

/// JSON object builder that leaves absent fields out entirely.
///
/// Graph treats PATCH bodies as partial updates, so `None` must never be
/// serialized as `null`. Present values, including empty lists, are kept.
#[derive(Debug, Clone, Default)]
pub struct Payload {
    fields: Map<String, Value>,
}

impl Payload {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn field(mut self, key: &str, value: impl Into<Value>) -> Self {
        self.fields.insert(key.to_string(), value.into());
        self
    }

    #[must_use]
    pub fn optional<T: Into<Value>>(self, key: &str, value: Option<T>) -> Self {
        match value {
            Some(value) => self.field(key, value),
            None => self,
        }
    }

    #[must_use]
    pub fn recipients(self, key: &str, addresses: Option<&[String]>) -> Self {
        match addresses {
            Some(addresses) => self.field(key, recipients(addresses)),
            None => self,
        }
    }

    #[must_use]
    pub fn recipient(self, key: &str, address: Option<&EmailAddress>) -> Self {
        match address {
            Some(address) => self.field(key, recipient(address)),
            None => self,
        }
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    #[must_use]
    pub fn into_value(self) -> Value {
        Value::Object(self.fields)
    }
}
