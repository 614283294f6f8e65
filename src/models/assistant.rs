use serde::{Deserialize, Serialize};

/// An assistant as listed by `GET /assistants/list`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AssistantInfo {
    pub name: String,
    /// Backend model family, e.g. `OpenAIModel` or `OllamaModel`.
    pub model_type: String,
    #[serde(default)]
    pub system_message: String,
    /// Whether retrieval over uploaded documents is attached.
    #[serde(default)]
    pub has_rag: bool,
}

impl AssistantInfo {
    /// One-line summary for listings.
    pub fn summary(&self) -> String {
        if self.has_rag {
            format!("{} ({}, rag)", self.name, self.model_type)
        } else {
            format!("{} ({})", self.name, self.model_type)
        }
    }
}

/// Body served at the service root.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ServiceBanner {
    #[serde(default)]
    pub message: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub docs_url: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_assistant_info_deserialize() {
        let json = r#"[
            {"name": "helper", "model_type": "OpenAIModel", "system_message": "Be nice.", "has_rag": true},
            {"name": "local", "model_type": "OllamaModel"}
        ]"#;
        let list: Vec<AssistantInfo> = serde_json::from_str(json).unwrap();

        assert_eq!(list.len(), 2);
        assert_eq!(list[0].name, "helper");
        assert!(list[0].has_rag);
        assert_eq!(list[1].system_message, "");
        assert!(!list[1].has_rag);
    }

    #[test]
    fn test_summary() {
        let info = AssistantInfo {
            name: "helper".to_string(),
            model_type: "OpenAIModel".to_string(),
            system_message: String::new(),
            has_rag: true,
        };
        assert_eq!(info.summary(), "helper (OpenAIModel, rag)");
    }

    #[test]
    fn test_banner_ignores_extra_fields() {
        let banner: ServiceBanner = serde_json::from_str(
            r#"{"message": "Welcome", "docs_url": "/docs", "redoc_url": "/redoc"}"#,
        )
        .unwrap();
        assert_eq!(banner.message, "Welcome");
        assert_eq!(banner.docs_url.as_deref(), Some("/docs"));
    }
}
