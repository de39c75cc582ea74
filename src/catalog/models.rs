//! Catalog data models.

use serde::Serialize;

/// Upstream character identifier (numeric in practice).
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(untagged)]
pub enum CharacterId {
    Number(i64),
    Text(String),
}

/// Lightweight character record, without the system prompt.
#[derive(Debug, Clone, PartialEq, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CharacterSummary {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<CharacterId>,

    /// Alternate identifier accepted by the detail endpoint.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub raw_id: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,

    /// Short category string.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub short_desc: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub desc: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub hello_tip: Option<String>,

    /// Avatar URL, serialized as `null` when missing.
    pub avatar: Option<String>,

    /// Featured flag.
    pub is_star: bool,
}

impl CharacterSummary {
    /// Case-insensitive substring match over name, category and description.
    ///
    /// `needle` must already be lowercase. Missing fields match as empty.
    pub fn matches(&self, needle: &str) -> bool {
        [&self.name, &self.short_desc, &self.desc]
            .into_iter()
            .any(|field| {
                field
                    .as_deref()
                    .unwrap_or_default()
                    .to_lowercase()
                    .contains(needle)
            })
    }
}

/// Full character record including the system prompt.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CharacterDetail {
    #[serde(flatten)]
    pub summary: CharacterSummary,

    /// Complete prompt text, never truncated.
    pub system_prompt: String,

    /// Length of `system_prompt` in UTF-16 code units when it was fetched,
    /// the unit the browser client measures prompts in.
    pub prompt_length: usize,
}

impl CharacterDetail {
    pub fn new(summary: CharacterSummary, system_prompt: String) -> Self {
        let prompt_length = system_prompt.encode_utf16().count();
        Self {
            summary,
            system_prompt,
            prompt_length,
        }
    }
}
