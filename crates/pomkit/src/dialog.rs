//! Native dialog handling (alert, confirm, prompt, beforeunload).
//!
//! Drivers answer dialogs as they open, according to the current
//! [`DialogPolicy`], and record every dialog so page objects can verify what
//! the application said.

use serde::{Deserialize, Serialize};
use std::sync::{Arc, Mutex};

/// Type of browser dialog
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum DialogType {
    /// Alert dialog (OK button only)
    Alert,
    /// Confirm dialog (OK/Cancel buttons)
    Confirm,
    /// Prompt dialog (text input + OK/Cancel)
    Prompt,
    /// Before unload dialog (Leave/Stay buttons)
    BeforeUnload,
}

impl DialogType {
    /// Parse the CDP dialog type name
    #[must_use]
    pub fn from_cdp(name: &str) -> Self {
        match name {
            "confirm" => Self::Confirm,
            "prompt" => Self::Prompt,
            "beforeunload" => Self::BeforeUnload,
            _ => Self::Alert,
        }
    }
}

impl std::fmt::Display for DialogType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Alert => write!(f, "alert"),
            Self::Confirm => write!(f, "confirm"),
            Self::Prompt => write!(f, "prompt"),
            Self::BeforeUnload => write!(f, "beforeunload"),
        }
    }
}

/// Action taken on a dialog
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum DialogAction {
    /// Dialog was accepted (OK/Yes/Leave)
    Accept,
    /// Dialog was dismissed (Cancel/No/Stay)
    Dismiss,
    /// Dialog is pending (not yet handled)
    Pending,
}

/// How a driver answers dialogs that open during an action
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum DialogPolicy {
    /// Press OK
    #[default]
    Accept,
    /// Press Cancel
    Dismiss,
}

/// A browser dialog observed by the driver
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Dialog {
    dialog_type: DialogType,
    message: String,
    action: DialogAction,
}

impl Dialog {
    /// Create a new, unanswered dialog
    #[must_use]
    pub fn new(dialog_type: DialogType, message: impl Into<String>) -> Self {
        Self {
            dialog_type,
            message: message.into(),
            action: DialogAction::Pending,
        }
    }

    /// Create an alert dialog
    #[must_use]
    pub fn alert(message: impl Into<String>) -> Self {
        Self::new(DialogType::Alert, message)
    }

    /// Get dialog type
    #[must_use]
    pub const fn dialog_type(&self) -> DialogType {
        self.dialog_type
    }

    /// Get dialog message
    #[must_use]
    pub fn message(&self) -> &str {
        &self.message
    }

    /// Get action taken
    #[must_use]
    pub const fn action(&self) -> &DialogAction {
        &self.action
    }

    /// Check if dialog was handled
    #[must_use]
    pub const fn is_handled(&self) -> bool {
        !matches!(self.action, DialogAction::Pending)
    }

    /// Answer the dialog according to a policy
    pub fn answer(&mut self, policy: DialogPolicy) {
        self.action = match policy {
            DialogPolicy::Accept => DialogAction::Accept,
            DialogPolicy::Dismiss => DialogAction::Dismiss,
        };
    }
}

/// Shared dialog log used by drivers.
///
/// Cloning shares the log, so an event-listener task can record while the
/// driver drains.
#[derive(Debug, Clone, Default)]
pub struct DialogRecorder {
    dialogs: Arc<Mutex<Vec<Dialog>>>,
    policy: Arc<Mutex<DialogPolicy>>,
}

impl DialogRecorder {
    /// Create a recorder with the default (accept) policy
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Current policy
    #[must_use]
    pub fn policy(&self) -> DialogPolicy {
        self.policy.lock().map(|p| *p).unwrap_or_default()
    }

    /// Replace the policy for dialogs opened from now on
    pub fn set_policy(&self, policy: DialogPolicy) {
        if let Ok(mut p) = self.policy.lock() {
            *p = policy;
        }
    }

    /// Answer an incoming dialog with the current policy and record it
    pub fn handle(&self, mut dialog: Dialog) -> Dialog {
        dialog.answer(self.policy());
        if let Ok(mut dialogs) = self.dialogs.lock() {
            dialogs.push(dialog.clone());
        }
        dialog
    }

    /// Remove and return every recorded dialog
    #[must_use]
    pub fn drain(&self) -> Vec<Dialog> {
        self.dialogs
            .lock()
            .map(|mut d| std::mem::take(&mut *d))
            .unwrap_or_default()
    }

    /// Number of dialogs recorded and not yet drained
    #[must_use]
    pub fn len(&self) -> usize {
        self.dialogs.lock().map(|d| d.len()).unwrap_or(0)
    }

    /// Whether no dialogs are waiting to be drained
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
