// ABOUTME: Names shared by the cluster, the deployment, and its exposed service.
// ABOUTME: Restricted to what both gcloud and `kubectl expose` accept.

use std::fmt;
use std::str::FromStr;

use thiserror::Error;

/// Longest name `kubectl expose` accepts for a service.
pub const MAX_NAME_LEN: usize = 63;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ResourceNameError {
    #[error("name is empty")]
    Empty,

    #[error("name is {0} characters long, at most {MAX_NAME_LEN} are allowed")]
    TooLong(usize),

    #[error("name must start with a lowercase letter, found '{0}'")]
    BadFirstChar(char),

    #[error("name must end with a lowercase letter or digit, found '{0}'")]
    BadLastChar(char),

    #[error("'{ch}' at position {position} is not allowed; use lowercase letters, digits and '-'")]
    InvalidChar { ch: char, position: usize },
}

/// Name of a cluster or deployment.
///
/// The deployment name doubles as the service name created by
/// `kubectl expose`, which must be a DNS-1035 label, and it is compared
/// verbatim against the first column of `kubectl get services`.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ResourceName(String);

impl ResourceName {
    pub fn new(value: &str) -> Result<Self, ResourceNameError> {
        let len = value.chars().count();
        if len > MAX_NAME_LEN {
            return Err(ResourceNameError::TooLong(len));
        }

        let mut chars = value.chars();
        let first = chars.next().ok_or(ResourceNameError::Empty)?;
        if !first.is_ascii_lowercase() {
            return Err(ResourceNameError::BadFirstChar(first));
        }

        if let Some((position, ch)) = value
            .char_indices()
            .find(|&(_, c)| !(c.is_ascii_lowercase() || c.is_ascii_digit() || c == '-'))
        {
            return Err(ResourceNameError::InvalidChar { ch, position });
        }

        if let Some(last) = chars.next_back().filter(|&c| c == '-') {
            return Err(ResourceNameError::BadLastChar(last));
        }

        Ok(Self(value.to_owned()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl FromStr for ResourceName {
    type Err = ResourceNameError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::new(s)
    }
}

impl AsRef<str> for ResourceName {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ResourceName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}
