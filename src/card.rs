//! Notification card construction. Pure mapping, no I/O.

use serde::{Deserialize, Serialize};
use std::str::FromStr;

use crate::context::RevisionContext;
use crate::error::{NotifyError, Result};

/// Maximum commit message length before truncation
pub const MAX_COMMIT_MSG_LEN: usize = 500;

const NO_FILES_CHANGED: &str = "No files changed.";

/// Represents the reported outcome of a deployment job
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NotificationStatus {
    Success,
    Failure,
    Cancelled,
    Warning,
}

impl NotificationStatus {
    pub fn title(&self) -> &'static str {
        match self {
            Self::Success => "Deployment Successful",
            Self::Failure => "Deployment Failed",
            Self::Cancelled => "Deployment Cancelled",
            Self::Warning => "Deployment Warning",
        }
    }

    pub fn icon(&self) -> &'static str {
        match self {
            Self::Success => "✅",
            Self::Failure => "❌",
            Self::Cancelled | Self::Warning => "⚠️",
        }
    }

    pub fn detail(&self) -> &'static str {
        match self {
            Self::Success => "The deployment completed successfully.",
            Self::Failure => {
                "The deployment encountered errors. Please check the logs for details."
            }
            Self::Cancelled => "The deployment was cancelled.",
            Self::Warning => {
                "The deployment completed with warnings. Review the logs for more information."
            }
        }
    }

    /// MessageCard accent color for this status.
    pub fn theme_color(&self) -> &'static str {
        match self {
            Self::Success => "2eb67d",
            Self::Failure => "e01e5a",
            Self::Cancelled | Self::Warning => "ecb22e",
        }
    }
}

impl FromStr for NotificationStatus {
    type Err = NotifyError;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_lowercase().as_str() {
            "success" => Ok(Self::Success),
            "failure" => Ok(Self::Failure),
            "cancelled" => Ok(Self::Cancelled),
            "warning" => Ok(Self::Warning),
            _ => Err(NotifyError::InvalidStatus(s.to_string())),
        }
    }
}

/// Outbound notification document in the Teams MessageCard shape.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MessageCard {
    #[serde(rename = "@type")]
    pub card_type: String,
    #[serde(rename = "@context")]
    pub card_context: String,
    pub theme_color: String,
    pub summary: String,
    pub sections: Vec<CardSection>,
    pub potential_action: Vec<CardAction>,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CardSection {
    pub activity_title: String,
    pub activity_subtitle: String,
    pub text: String,
    pub facts: Vec<CardFact>,
    pub markdown: bool,
}

#[derive(Debug, Clone, Serialize)]
pub struct CardFact {
    pub name: String,
    pub value: String,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CardAction {
    #[serde(rename = "@type")]
    pub action_type: String,
    pub name: String,
    pub targets: Vec<ActionTarget>,
}

#[derive(Debug, Clone, Serialize)]
pub struct ActionTarget {
    pub os: String,
    pub uri: String,
}

impl CardAction {
    fn open_uri(name: &str, uri: String) -> Self {
        Self {
            action_type: "OpenUri".to_string(),
            name: name.to_string(),
            targets: vec![ActionTarget {
                os: "default".to_string(),
                uri,
            }],
        }
    }
}

/// Build the status card for one deployment run.
///
/// `changed_files` is `None` when no change set was computed; both `None`
/// and an empty listing render the fallback value, never a blank fact.
pub fn build_card(
    status: NotificationStatus,
    context: &RevisionContext,
    commit_message: &str,
    changed_files: Option<&[String]>,
) -> MessageCard {
    let repo_url = context.repo_url();

    let facts = vec![
        CardFact {
            name: "Commit Message".to_string(),
            value: clip_commit_message(commit_message.trim()),
        },
        CardFact {
            name: "Branch".to_string(),
            value: format!("[{}]({}/tree/{})", context.branch, repo_url, context.branch),
        },
        CardFact {
            name: "Changed Files".to_string(),
            value: render_changed_files(context, changed_files),
        },
    ];

    MessageCard {
        card_type: "MessageCard".to_string(),
        card_context: "https://schema.org/extensions".to_string(),
        theme_color: status.theme_color().to_string(),
        summary: format!(
            "{}: {}/{}",
            status.title(),
            context.repo_owner,
            context.repo_name
        ),
        sections: vec![CardSection {
            activity_title: format!("{} {}", status.icon(), status.title()),
            activity_subtitle: format!(
                "{}/{} (triggered by {})",
                context.repo_owner, context.repo_name, context.actor
            ),
            text: status.detail().to_string(),
            facts,
            markdown: true,
        }],
        potential_action: vec![
            CardAction::open_uri(
                "View Deployment Logs",
                format!("{}/actions/runs/{}", repo_url, context.run_id),
            ),
            CardAction::open_uri(
                "View commit diffs",
                format!("{}/commit/{}", repo_url, context.commit_sha),
            ),
        ],
    }
}

/// One markdown bullet link per changed file, pointing at the file's blob
/// on the current branch. Falls back to a literal placeholder.
fn render_changed_files(context: &RevisionContext, changed_files: Option<&[String]>) -> String {
    match changed_files {
        Some(files) if !files.is_empty() => files
            .iter()
            .map(|path| {
                format!(
                    "* [{}]({}/blob/{}/{})",
                    path,
                    context.repo_url(),
                    context.branch,
                    path
                )
            })
            .collect::<Vec<_>>()
            .join("\n"),
        _ => NO_FILES_CHANGED.to_string(),
    }
}

fn clip_commit_message(message: &str) -> String {
    if message.len() > MAX_COMMIT_MSG_LEN {
        let mut cut = MAX_COMMIT_MSG_LEN;
        while !message.is_char_boundary(cut) {
            cut -= 1;
        }
        format!("{}... (truncated)", &message[..cut])
    } else {
        message.to_string()
    }
}
