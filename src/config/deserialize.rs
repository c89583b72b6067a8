// ABOUTME: Custom serde deserializers for the repository config document.
// ABOUTME: Validates names and tags, and normalizes loosely typed JSON values.

use std::num::NonZeroU32;

use indexmap::IndexMap;
use serde::Deserialize;
use serde_json::Value;

use crate::types::{ImageTag, ResourceName};

pub fn deserialize_resource_name<'de, D>(deserializer: D) -> Result<Option<ResourceName>, D::Error>
where
    D: serde::Deserializer<'de>,
{
    let opt: Option<String> = Option::deserialize(deserializer)?;
    opt.map(|s| ResourceName::new(&s).map_err(serde::de::Error::custom))
        .transpose()
}

/// A bare number such as `2` is used as the tag `2`.
pub fn deserialize_image_tag<'de, D>(deserializer: D) -> Result<Option<ImageTag>, D::Error>
where
    D: serde::Deserializer<'de>,
{
    let opt: Option<NumberOrText> = Option::deserialize(deserializer)?;
    opt.map(|entry| {
        let tag = match entry {
            NumberOrText::Number(n) => n.to_string(),
            NumberOrText::Text(s) => s,
        };
        ImageTag::new(&tag).map_err(serde::de::Error::custom)
    })
    .transpose()
}

/// Accepts `3` as well as `"3"`; the original documents quote the count.
pub fn deserialize_node_count<'de, D>(deserializer: D) -> Result<Option<NonZeroU32>, D::Error>
where
    D: serde::Deserializer<'de>,
{
    let opt: Option<NumberOrText> = Option::deserialize(deserializer)?;
    let Some(entry) = opt else {
        return Ok(None);
    };

    let count = match entry {
        NumberOrText::Number(n) => u32::try_from(n)
            .map_err(|_| serde::de::Error::custom(format!("node count {n} is too large")))?,
        NumberOrText::Text(s) => s.trim().parse::<u32>().map_err(|_| {
            serde::de::Error::custom(format!("node count must be a number, got \"{s}\""))
        })?,
    };

    NonZeroU32::new(count)
        .map(Some)
        .ok_or_else(|| serde::de::Error::custom("node count must be at least 1"))
}

/// Property overrides keep document order. Scalar values are written
/// verbatim into the properties file, so numbers and booleans are accepted.
pub fn deserialize_config_changes<'de, D>(
    deserializer: D,
) -> Result<Option<IndexMap<String, String>>, D::Error>
where
    D: serde::Deserializer<'de>,
{
    let opt: Option<IndexMap<String, Value>> = Option::deserialize(deserializer)?;
    let Some(raw) = opt else {
        return Ok(None);
    };

    raw.into_iter()
        .map(|(key, value)| {
            if key.is_empty() || key.contains('=') || key.contains('\n') {
                return Err(serde::de::Error::custom(format!(
                    "invalid property name \"{key}\""
                )));
            }
            let value = match value {
                Value::String(s) => s,
                Value::Number(n) => n.to_string(),
                Value::Bool(b) => b.to_string(),
                other => {
                    return Err(serde::de::Error::custom(format!(
                        "property \"{key}\" must be a string, number or boolean, got {other}"
                    )));
                }
            };
            if value.contains('\n') {
                return Err(serde::de::Error::custom(format!(
                    "property \"{key}\" value cannot span multiple lines"
                )));
            }
            Ok((key, value))
        })
        .collect::<Result<IndexMap<_, _>, _>>()
        .map(Some)
}

#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum NumberOrText {
    Number(u64),
    Text(String),
}
