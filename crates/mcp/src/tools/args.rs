// Argument decoding shared by the Canvas tools

use crate::error::{ToolError, ToolResult};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Deserializer};

/// Decode tool arguments, treating absent arguments as `{}`
pub fn parse_args<T: DeserializeOwned>(tool: &str, arguments: serde_json::Value) -> ToolResult<T> {
    let arguments = if arguments.is_null() {
        serde_json::Value::Object(Default::default())
    } else {
        arguments
    };

    serde_json::from_value(arguments)
        .map_err(|e| ToolError::InvalidArguments(format!("{}: {}", tool, e)))
}

/// Ids arrive as JSON numbers or strings
#[derive(Deserialize)]
#[serde(untagged)]
enum IdArg {
    Number(u64),
    Text(String),
}

impl IdArg {
    fn to_id(&self) -> Option<u64> {
        match self {
            Self::Number(id) => Some(*id),
            Self::Text(text) => text.trim().parse().ok(),
        }
    }
}

pub fn deserialize_id<'de, D>(deserializer: D) -> Result<u64, D::Error>
where
    D: Deserializer<'de>,
{
    let arg = IdArg::deserialize(deserializer)?;
    arg.to_id()
        .ok_or_else(|| serde::de::Error::custom("expected a numeric id"))
}

/// Optional id list. Entries that are not numeric cannot name a Canvas
/// course and are dropped.
pub fn deserialize_ids<'de, D>(deserializer: D) -> Result<Option<Vec<u64>>, D::Error>
where
    D: Deserializer<'de>,
{
    let ids: Option<Vec<IdArg>> = Option::deserialize(deserializer)?;
    Ok(ids.map(|ids| ids.iter().filter_map(IdArg::to_id).collect()))
}
