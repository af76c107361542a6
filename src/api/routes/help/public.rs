//! Public types for the help API
use serde::{Deserialize, Deserializer, Serialize};

/// An image attached to a help request. `src` is anything the model
/// API accepts as an image reference, i.e. a `data:` URI or an
/// `https://` URL.
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
pub struct Attachment {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub src: String,
}

impl Attachment {
    pub fn new(name: &str, src: &str) -> Self {
        Self {
            name: name.into(),
            src: src.into(),
        }
    }
}

#[derive(Serialize, Deserialize, Clone, Debug, Default, PartialEq)]
pub struct HelpRequest {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub code: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ask: Option<String>,
    #[serde(default, deserialize_with = "nullable_attachments")]
    pub images: Vec<Attachment>,
}

// Browsers send `null` for an empty list or a slot that failed to
// load. Both mean "no image here".
fn nullable_attachments<'de, D>(deserializer: D) -> Result<Vec<Attachment>, D::Error>
where
    D: Deserializer<'de>,
{
    let images = Option::<Vec<Option<Attachment>>>::deserialize(deserializer)?;
    Ok(images.unwrap_or_default().into_iter().flatten().collect())
}

#[derive(Serialize, Deserialize, Debug)]
pub struct HelpResponse {
    #[serde(rename = "aiText")]
    pub ai_text: String,
}

impl HelpResponse {
    pub fn new(ai_text: &str) -> Self {
        Self {
            ai_text: ai_text.into(),
        }
    }
}

#[derive(Serialize, Deserialize, Debug)]
pub struct ErrorResponse {
    pub error: String,
}
