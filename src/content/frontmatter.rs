//! Front-matter parsing

use indexmap::IndexMap;
use serde::{Deserialize, Deserializer, Serialize};
use thiserror::Error;

/// Marker line opening and closing the metadata block
pub const DELIMITER: &str = "---";

/// Why a front-matter block could not be read
#[derive(Error, Debug)]
pub enum FrontMatterError {
    #[error("missing opening `---` delimiter on the first line")]
    MissingOpening,

    #[error("front-matter is never closed by a `---` line")]
    Unclosed,

    #[error("invalid front-matter: {0}")]
    Invalid(#[from] serde_yaml::Error),
}

/// Accepts any YAML scalar and keeps its textual form
fn scalar_string<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    use serde::de::{self, Visitor};
    use std::fmt;

    struct ScalarString;

    impl<'de> Visitor<'de> for ScalarString {
        type Value = String;

        fn expecting(&self, formatter: &mut fmt::Formatter) -> fmt::Result {
            formatter.write_str("a string, number, boolean or empty value")
        }

        fn visit_unit<E>(self) -> Result<Self::Value, E>
        where
            E: de::Error,
        {
            Ok(String::new())
        }

        fn visit_none<E>(self) -> Result<Self::Value, E>
        where
            E: de::Error,
        {
            Ok(String::new())
        }

        fn visit_str<E>(self, value: &str) -> Result<Self::Value, E>
        where
            E: de::Error,
        {
            Ok(value.to_string())
        }

        fn visit_string<E>(self, value: String) -> Result<Self::Value, E>
        where
            E: de::Error,
        {
            Ok(value)
        }

        fn visit_i64<E>(self, value: i64) -> Result<Self::Value, E>
        where
            E: de::Error,
        {
            Ok(value.to_string())
        }

        fn visit_u64<E>(self, value: u64) -> Result<Self::Value, E>
        where
            E: de::Error,
        {
            Ok(value.to_string())
        }

        fn visit_f64<E>(self, value: f64) -> Result<Self::Value, E>
        where
            E: de::Error,
        {
            Ok(value.to_string())
        }

        fn visit_bool<E>(self, value: bool) -> Result<Self::Value, E>
        where
            E: de::Error,
        {
            Ok(value.to_string())
        }
    }

    deserializer.deserialize_any(ScalarString)
}

/// Front-matter of a guide
///
/// `title` and `date` are required, `description` defaults to empty.
/// Any other key is kept in `extra`, in file order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FrontMatter {
    #[serde(deserialize_with = "scalar_string")]
    pub title: String,

    /// Displayed as written
    #[serde(deserialize_with = "scalar_string")]
    pub date: String,

    #[serde(deserialize_with = "scalar_string", default)]
    pub description: String,

    #[serde(flatten)]
    pub extra: IndexMap<String, serde_yaml::Value>,
}

impl FrontMatter {
    /// Parse front-matter from file content
    /// Returns (front_matter, body)
    pub fn parse(content: &str) -> Result<(Self, &str), FrontMatterError> {
        let (yaml, body) = Self::split(content)?;
        let fm = serde_yaml::from_str::<FrontMatter>(yaml)?;
        Ok((fm, body))
    }

    /// Split content into the raw metadata block and the body
    pub fn split(content: &str) -> Result<(&str, &str), FrontMatterError> {
        let content = content.strip_prefix('\u{feff}').unwrap_or(content);

        let mut lines = content.split_inclusive('\n');
        let first = lines.next().unwrap_or("");
        if first.trim_end() != DELIMITER {
            return Err(FrontMatterError::MissingOpening);
        }

        let mut offset = first.len();
        for line in lines {
            if line.trim_end() == DELIMITER {
                let yaml = &content[first.len()..offset];
                let body = &content[offset + line.len()..];
                return Ok((yaml, body));
            }
            offset += line.len();
        }

        Err(FrontMatterError::Unclosed)
    }

    /// Serialize back into a delimited block, keeping key order
    pub fn to_block(&self) -> Result<String, FrontMatterError> {
        let yaml = serde_yaml::to_string(self)?;
        Ok(format!("{DELIMITER}\n{yaml}{DELIMITER}\n"))
    }
}
