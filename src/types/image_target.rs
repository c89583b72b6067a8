// ABOUTME: Registry path of the image that gets built, pushed and deployed.
// ABOUTME: Derived from project id and version tag, formatted as gcr.io/<project>/loklak:<tag>.

use std::fmt;
use thiserror::Error;

/// Registry the image is published to.
pub const REGISTRY: &str = "gcr.io";

/// Repository name of the image inside the project.
pub const IMAGE_NAME: &str = "loklak";

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ImageTagError {
    #[error("image tag cannot be empty")]
    Empty,

    #[error("image tag exceeds maximum length of 128 characters")]
    TooLong,

    #[error("image tag cannot start with '{0}'")]
    InvalidStart(char),

    #[error("invalid character in image tag: '{0}'")]
    InvalidChar(char),
}

/// A container image tag such as `v1` or `2024.05-rc_1`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImageTag(String);

impl ImageTag {
    pub fn new(value: &str) -> Result<Self, ImageTagError> {
        let first = value.chars().next().ok_or(ImageTagError::Empty)?;

        if value.len() > 128 {
            return Err(ImageTagError::TooLong);
        }

        if first == '.' || first == '-' {
            return Err(ImageTagError::InvalidStart(first));
        }

        for c in value.chars() {
            if !c.is_ascii_alphanumeric() && c != '_' && c != '.' && c != '-' {
                return Err(ImageTagError::InvalidChar(c));
            }
        }

        Ok(Self(value.to_string()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ImageTag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Fully qualified image reference. Recomputed wherever it is needed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImageTarget {
    project: String,
    tag: ImageTag,
}

impl ImageTarget {
    pub fn new(project: impl Into<String>, tag: ImageTag) -> Self {
        Self {
            project: project.into(),
            tag,
        }
    }

    pub fn registry(&self) -> &str {
        REGISTRY
    }

    pub fn project(&self) -> &str {
        &self.project
    }

    pub fn name(&self) -> &str {
        IMAGE_NAME
    }

    pub fn tag(&self) -> &ImageTag {
        &self.tag
    }
}

impl fmt::Display for ImageTarget {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}/{}/{}:{}",
            self.registry(),
            self.project,
            self.name(),
            self.tag
        )
    }
}
