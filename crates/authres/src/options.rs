use serde::{Deserialize, Serialize};

/// How deeply comments may nest before parsing gives up
pub const DEFAULT_MAX_COMMENT_DEPTH: usize = 64;

#[derive(Deserialize, Serialize, Clone, Copy, Debug, PartialEq, Eq)]
#[serde(default)]
pub struct ParseOptions {
    /// Comments nested deeper than this fail with
    /// `AuthResultsError::CommentTooDeep`. Zero rejects any comment.
    pub max_comment_depth: usize,
}

impl Default for ParseOptions {
    fn default() -> Self {
        Self {
            max_comment_depth: DEFAULT_MAX_COMMENT_DEPTH,
        }
    }
}

#[derive(Deserialize, Serialize, Clone, Copy, Debug, Default, PartialEq, Eq)]
#[serde(default)]
pub struct FormatOptions {
    /// Emit the version number after the identifier, `example.com 1; ...`
    pub include_version: bool,
    /// Put each result entry on its own folded line rather than
    /// separating them with `"; "`
    pub fold: bool,
}
