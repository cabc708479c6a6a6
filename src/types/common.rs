//! Common enums and data types.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Free-form metadata attached to an uploaded object.
///
/// Sent to the server as a JSON object; values may be any JSON type.
pub type Metadata = serde_json::Map<String, serde_json::Value>;

/// HTTP methods that can be presigned for object operations.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum HttpMethod {
    /// Download or view an object.
    Get,
    /// Upload an object.
    Post,
    /// Delete an object.
    Delete,
}

impl HttpMethod {
    /// Returns the method token as it appears in the signing payload.
    pub fn as_str(&self) -> &'static str {
        match self {
            HttpMethod::Get => "GET",
            HttpMethod::Post => "POST",
            HttpMethod::Delete => "DELETE",
        }
    }

    /// Permission a key needs for a request with this method.
    pub fn required_permission(&self) -> Permission {
        match self {
            HttpMethod::Get => Permission::Read,
            HttpMethod::Post => Permission::Write,
            HttpMethod::Delete => Permission::Delete,
        }
    }
}

impl fmt::Display for HttpMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl AsRef<str> for HttpMethod {
    fn as_ref(&self) -> &str {
        self.as_str()
    }
}

impl std::str::FromStr for HttpMethod {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "GET" => Ok(HttpMethod::Get),
            "POST" => Ok(HttpMethod::Post),
            "DELETE" => Ok(HttpMethod::Delete),
            _ => Err(format!("Unsupported method: {}", s)),
        }
    }
}

/// Permissions an access key can hold.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Permission {
    /// Download objects.
    Read,
    /// Upload objects.
    Write,
    /// Delete objects.
    Delete,
}

impl Permission {
    /// All permissions.
    pub const ALL: [Permission; 3] = [Permission::Read, Permission::Write, Permission::Delete];

    /// Returns the permission name.
    pub fn as_str(&self) -> &'static str {
        match self {
            Permission::Read => "read",
            Permission::Write => "write",
            Permission::Delete => "delete",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_method_tokens() {
        assert_eq!(HttpMethod::Get.as_str(), "GET");
        assert_eq!(HttpMethod::Post.to_string(), "POST");
        assert_eq!("DELETE".parse::<HttpMethod>().unwrap(), HttpMethod::Delete);
        assert!("get".parse::<HttpMethod>().is_err());
        assert!("PUT".parse::<HttpMethod>().is_err());
    }

    #[test]
    fn test_required_permission() {
        assert_eq!(HttpMethod::Get.required_permission(), Permission::Read);
        assert_eq!(HttpMethod::Post.required_permission(), Permission::Write);
        assert_eq!(HttpMethod::Delete.required_permission(), Permission::Delete);
    }
}
