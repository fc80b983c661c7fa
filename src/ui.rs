//! Theme and toast queue
//!
//! Presentation state only. The core never raises toasts itself.

use std::fmt;

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};

use crate::ids::{IdSource, ToastId};

/// Color theme
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Theme {
    Light,
    Dark,
    #[default]
    System,
}

impl fmt::Display for Theme {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Theme::Light => "light",
            Theme::Dark => "dark",
            Theme::System => "system",
        })
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ToastKind {
    Success,
    Error,
    Info,
    Warning,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Toast {
    pub id: ToastId,
    pub message: String,
    #[serde(rename = "type")]
    pub kind: ToastKind,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Default)]
pub struct UiState {
    theme: Theme,
    toasts: Vec<Toast>,
}

impl UiState {
    pub fn new(theme: Theme) -> Self {
        Self {
            theme,
            toasts: Vec::new(),
        }
    }

    pub fn theme(&self) -> Theme {
        self.theme
    }

    pub fn set_theme(&mut self, theme: Theme) {
        self.theme = theme;
    }

    /// Oldest first
    pub fn toasts(&self) -> &[Toast] {
        &self.toasts
    }

    pub fn add_toast(
        &mut self,
        ids: &mut IdSource,
        message: impl Into<String>,
        kind: ToastKind,
    ) -> ToastId {
        let id = ids.toast_id();
        self.toasts.push(Toast {
            id: id.clone(),
            message: message.into(),
            kind,
            created_at: ids.now(),
        });
        id
    }

    pub fn remove_toast(&mut self, id: &ToastId) -> bool {
        let before = self.toasts.len();
        self.toasts.retain(|t| &t.id != id);
        self.toasts.len() != before
    }

    /// Auto-dismiss: drop toasts that have been shown for at least `ttl`.
    /// Returns how many were dropped.
    pub fn expire_toasts(&mut self, now: DateTime<Utc>, ttl: Duration) -> usize {
        let before = self.toasts.len();
        self.toasts.retain(|t| now - t.created_at < ttl);
        before - self.toasts.len()
    }
}
