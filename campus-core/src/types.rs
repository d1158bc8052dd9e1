use serde::{Deserialize, Serialize};

/// Maximum allowed size for inline binary data (10 MB).
pub const MAX_INLINE_DATA_SIZE: usize = 10 * 1024 * 1024;

/// Speaker of a conversation turn.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    User,
    Model,
}

impl Role {
    pub fn as_str(&self) -> &'static str {
        match self {
            Role::User => "user",
            Role::Model => "model",
        }
    }
}

impl std::fmt::Display for Role {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FunctionResponseData {
    pub name: String,
    pub response: serde_json::Value,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Content {
    pub role: Role,
    pub parts: Vec<Part>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Part {
    Text {
        text: String,
    },
    InlineData {
        mime_type: String,
        // Ensures Vec<u8> serializes to a base64 string, not an integer array.
        #[serde(with = "base64_serde")]
        data: Vec<u8>,
    },
    FunctionCall {
        name: String,
        args: serde_json::Value,
    },
    #[serde(rename_all = "camelCase")]
    FunctionResponse {
        function_response: FunctionResponseData,
    },
}

impl Content {
    pub fn new(role: Role) -> Self {
        Self { role, parts: Vec::new() }
    }

    pub fn user(text: impl Into<String>) -> Self {
        Self::new(Role::User).with_text(text)
    }

    pub fn model(text: impl Into<String>) -> Self {
        Self::new(Role::Model).with_text(text)
    }

    pub fn with_text(mut self, text: impl Into<String>) -> Self {
        self.parts.push(Part::Text { text: text.into() });
        self
    }

    pub fn with_part(mut self, part: Part) -> Self {
        self.parts.push(part);
        self
    }

    /// Add inline binary data safely.
    /// Returns an Error instead of panicking if the payload exceeds 10MB.
    pub fn try_with_inline_data(
        mut self,
        mime_type: impl Into<String>,
        data: Vec<u8>,
    ) -> Result<Self, &'static str> {
        self.parts.push(Part::try_inline_data(mime_type, data)?);
        Ok(self)
    }

    /// Concatenated text of every text part, or `None` when there is none.
    pub fn text(&self) -> Option<String> {
        let texts: Vec<&str> = self.parts.iter().filter_map(Part::text).collect();
        if texts.is_empty() { None } else { Some(texts.concat()) }
    }
}

impl Part {
    /// Returns the text content if this is a Text part, None otherwise
    pub fn text(&self) -> Option<&str> {
        match self {
            Part::Text { text } => Some(text.as_str()),
            _ => None,
        }
    }

    /// Returns the MIME type if this part carries inline data
    pub fn mime_type(&self) -> Option<&str> {
        match self {
            Part::InlineData { mime_type, .. } => Some(mime_type.as_str()),
            _ => None,
        }
    }

    pub fn is_function_call(&self) -> bool {
        matches!(self, Part::FunctionCall { .. })
    }

    pub fn text_part(text: impl Into<String>) -> Self {
        Part::Text { text: text.into() }
    }

    pub fn function_call(name: impl Into<String>, args: serde_json::Value) -> Self {
        Part::FunctionCall { name: name.into(), args }
    }

    pub fn function_response(name: impl Into<String>, response: serde_json::Value) -> Self {
        Part::FunctionResponse {
            function_response: FunctionResponseData { name: name.into(), response },
        }
    }

    pub fn try_inline_data(
        mime_type: impl Into<String>,
        data: Vec<u8>,
    ) -> Result<Self, &'static str> {
        if data.len() > MAX_INLINE_DATA_SIZE {
            return Err("Inline data size exceeds maximum allowed size of 10 MB");
        }
        Ok(Part::InlineData { mime_type: mime_type.into(), data })
    }
}

/// Utility module to enforce Base64 Serialization for Vec<u8>
mod base64_serde {
    use base64::{Engine as _, engine::general_purpose::STANDARD};
    use serde::{Deserialize, Deserializer, Serializer};

    pub fn serialize<S: Serializer>(bytes: &[u8], s: S) -> Result<S::Ok, S::Error> {
        s.serialize_str(&STANDARD.encode(bytes))
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(d: D) -> Result<Vec<u8>, D::Error> {
        let b64 = String::deserialize(d)?;
        STANDARD.decode(b64.as_bytes()).map_err(serde::de::Error::custom)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_role_serialization() {
        assert_eq!(serde_json::to_string(&Role::User).unwrap(), "\"user\"");
        assert_eq!(serde_json::to_string(&Role::Model).unwrap(), "\"model\"");
        let role: Role = serde_json::from_str("\"model\"").unwrap();
        assert_eq!(role, Role::Model);
        assert!(serde_json::from_str::<Role>("\"assistant\"").is_err());
    }

    #[test]
    fn test_content_text_concatenates_parts() {
        let content = Content::model("Hello, ").with_text("world");
        assert_eq!(content.text().as_deref(), Some("Hello, world"));

        let call = Content::new(Role::Model)
            .with_part(Part::function_call("getLocationInfo", serde_json::json!({})));
        assert_eq!(call.text(), None);
    }

    #[test]
    fn test_inline_data_base64_serialization() {
        use base64::{Engine as _, engine::general_purpose::STANDARD};

        let data = vec![1, 2, 3, 4, 5];
        let part = Part::try_inline_data("audio/wav", data.clone()).unwrap();
        let json = serde_json::to_string(&part).unwrap();
        assert!(json.contains(&STANDARD.encode(&data)));
        assert!(!json.contains("[1,2,3,4,5]"));
    }

    #[test]
    fn test_try_inline_data_limit() {
        let large_data = vec![0u8; MAX_INLINE_DATA_SIZE + 1];
        assert!(Part::try_inline_data("audio/wav", large_data).is_err());
        assert!(Content::user("x").try_with_inline_data("audio/wav", vec![0u8; 16]).is_ok());
    }

    #[test]
    fn test_function_response_uses_camel_case() {
        let part = Part::function_response("getLocationInfo", serde_json::json!({"ok": true}));
        let json = serde_json::to_value(&part).unwrap();
        assert_eq!(json["functionResponse"]["name"], "getLocationInfo");
    }
}
