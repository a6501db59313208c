use std::collections::HashMap;

use serde::{Deserialize, Serialize};

/// A typed node in the block representation of synthesized content (§4.7).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BlockType {
    Heading,
    Paragraph,
    ListItem,
    Quote,
    Code,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Block {
    pub id: String,
    #[serde(rename = "type")]
    pub block_type: BlockType,
    pub text: String,
    #[serde(default)]
    pub metadata: HashMap<String, serde_json::Value>,
}

impl Block {
    pub fn new(id: impl Into<String>, block_type: BlockType, text: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            block_type,
            text: text.into(),
            metadata: HashMap::new(),
        }
    }

    pub fn heading(id: impl Into<String>, text: impl Into<String>, level: u8) -> Self {
        let mut block = Self::new(id, BlockType::Heading, text);
        block.metadata.insert("level".to_string(), serde_json::json!(level));
        block
    }
}
