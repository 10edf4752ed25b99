// Comment editing
//
// An `EditPlan` is applied to decoded tags in one step: it is validated first, so a
// rejected plan leaves the tags exactly as they were.

use tracing::debug;

use crate::error::{Error, Result};
use crate::opus::OpusTags;

/// Edits to apply to the comment list
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EditPlan {
    /// Comments to append, in order
    pub additions: Vec<String>,
    /// Field names whose comments are removed
    pub deletions: Vec<String>,
    /// Remove every comment
    pub delete_all: bool,
    /// Replace the comment list with `additions`
    pub set_all: bool,
}

impl EditPlan {
    /// True when applying the plan cannot change anything
    pub fn is_empty(&self) -> bool {
        self.additions.is_empty() && self.deletions.is_empty() && !self.delete_all && !self.set_all
    }

    /// Check every addition and deletion
    pub fn validate(&self) -> Result<()> {
        for comment in &self.additions {
            validate_comment(comment)?;
        }
        for field in &self.deletions {
            validate_field_name(field)?;
        }
        Ok(())
    }

    /// Apply the plan to `tags`, or leave them untouched on error
    pub fn apply(&self, tags: &mut OpusTags) -> Result<()> {
        self.validate()?;

        let before = tags.comments.len();
        if self.delete_all || self.set_all {
            tags.comments.clear();
        } else {
            for field in &self.deletions {
                tags.delete(field);
            }
        }
        let kept = tags.comments.len();
        tags.comments
            .extend(self.additions.iter().map(|comment| comment.as_bytes().to_vec()));

        debug!(
            removed = before - kept,
            added = self.additions.len(),
            total = tags.comments.len(),
            "applied edits"
        );
        Ok(())
    }
}

/// A field name is non-empty printable ASCII without '='
pub fn validate_field_name(name: &str) -> Result<()> {
    if name.is_empty() {
        return Err(Error::bad_arguments("empty field name"));
    }
    if let Some(c) = name.chars().find(|&c| !(' '..='}').contains(&c) || c == '=') {
        return Err(Error::bad_arguments(format!(
            "invalid character {:?} in field name {:?}",
            c, name
        )));
    }
    Ok(())
}

/// A comment is a valid field name, '=', and any UTF-8 value
pub fn validate_comment(comment: &str) -> Result<()> {
    match comment.split_once('=') {
        Some((name, _)) => validate_field_name(name),
        None => Err(Error::bad_arguments(format!(
            "comment {:?} lacks a '=' separator",
            comment
        ))),
    }
}
