// Copyright © 2026 mailmirror.dev
// Licensed under the MailMirror License Agreement v1.0
// Unauthorized copying, modification, or distribution is prohibited.

use std::fmt;
use std::str::FromStr;

use crate::modules::error::{code::ErrorCode, MailMirrorError};
use crate::raise_error;

/// Terminal segment marking the addressed node itself rather than a child.
pub const ATTACHMENT_LEAF: i32 = -1;

/// Index path into a message's part tree. Each segment selects a child of a
/// multipart node, zero-based; the `-1` sentinel ends the path at the node
/// reached so far. Rendered with a leading dot per segment, so the second
/// child's attachment leaf is `.1.-1` and the root itself is the empty string.
#[derive(Debug, Default, Clone, Eq, PartialEq, Hash)]
pub struct ContentPath {
    segments: Vec<i32>,
}

impl ContentPath {
    pub fn root() -> Self {
        ContentPath::default()
    }

    pub fn child(&self, index: i32) -> Self {
        let mut segments = self.segments.clone();
        segments.push(index);
        ContentPath { segments }
    }

    pub fn attachment(&self) -> Self {
        self.child(ATTACHMENT_LEAF)
    }

    pub fn segments(&self) -> &[i32] {
        &self.segments
    }
}

impl fmt::Display for ContentPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for segment in &self.segments {
            write!(f, ".{}", segment)?;
        }
        Ok(())
    }
}

impl FromStr for ContentPath {
    type Err = MailMirrorError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let mut segments = Vec::new();
        for token in s.split('.').filter(|token| !token.is_empty()) {
            let segment = token.parse::<i32>().map_err(|_| {
                raise_error!(
                    format!("Invalid content path segment '{}' in '{}'", token, s),
                    ErrorCode::InvalidParameter
                )
            })?;
            segments.push(segment);
        }
        Ok(ContentPath { segments })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_root_renders_empty() {
        assert_eq!(ContentPath::root().to_string(), "");
    }

    #[test]
    fn test_child_and_attachment_render_with_leading_dots() {
        let path = ContentPath::root().child(1).child(2).attachment();
        assert_eq!(path.to_string(), ".1.2.-1");
    }

    #[test]
    fn test_parse_round_trip() {
        let path: ContentPath = ".0.3.-1".parse().unwrap();
        assert_eq!(path.segments(), &[0, 3, -1]);
        assert_eq!(path.to_string(), ".0.3.-1");
    }

    #[test]
    fn test_parse_empty_is_root() {
        let path: ContentPath = "".parse().unwrap();
        assert_eq!(path, ContentPath::root());
    }

    #[test]
    fn test_parse_rejects_garbage() {
        assert!(".a.1".parse::<ContentPath>().is_err());
    }
}
