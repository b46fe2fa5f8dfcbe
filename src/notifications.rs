//! Toast notifications - transient, dismissible messages.
//!
//! Mutation failures surface here after their optimistic change has been
//! rolled back; nothing in this subsystem treats a remote failure as fatal.

use std::time::{Duration, Instant};

/// Visual category of a toast.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ToastVariant {
    Success,
    Info,
    Warning,
    Error,
}

impl ToastVariant {
    /// How long a toast of this variant stays on screen by default.
    pub fn default_duration(&self) -> Duration {
        match self {
            ToastVariant::Success | ToastVariant::Info => Duration::from_secs(3),
            ToastVariant::Warning => Duration::from_secs(4),
            ToastVariant::Error => Duration::from_secs(5),
        }
    }

    pub fn icon(&self) -> &'static str {
        match self {
            ToastVariant::Success => "✓",
            ToastVariant::Error => "✗",
            ToastVariant::Info => "ℹ",
            ToastVariant::Warning => "⚠",
        }
    }
}

/// Follow-up action offered on a toast.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ToastAction {
    pub label: &'static str,
}

impl ToastAction {
    pub fn retry() -> Self {
        Self { label: "Retry" }
    }
}

/// A single transient message. Ids are assigned by the manager on push.
#[derive(Clone, Debug)]
pub struct Toast {
    pub id: u64,
    pub message: String,
    pub variant: ToastVariant,
    pub duration: Duration,
    pub action: Option<ToastAction>,
    created: Instant,
}

impl Toast {
    fn new(message: impl Into<String>, variant: ToastVariant) -> Self {
        Self {
            id: 0,
            message: message.into(),
            variant,
            duration: variant.default_duration(),
            action: None,
            created: Instant::now(),
        }
    }

    pub fn success(message: impl Into<String>) -> Self {
        Self::new(message, ToastVariant::Success)
    }

    pub fn info(message: impl Into<String>) -> Self {
        Self::new(message, ToastVariant::Info)
    }

    pub fn warning(message: impl Into<String>) -> Self {
        Self::new(message, ToastVariant::Warning)
    }

    pub fn error(message: impl Into<String>) -> Self {
        Self::new(message, ToastVariant::Error)
    }

    pub fn with_duration(mut self, duration: Duration) -> Self {
        self.duration = duration;
        self
    }

    pub fn with_action(mut self, action: ToastAction) -> Self {
        self.action = Some(action);
        self
    }

    pub fn is_expired(&self) -> bool {
        self.created.elapsed() >= self.duration
    }

    /// Fraction of the toast's lifetime still remaining, 0.0..=1.0.
    pub fn remaining_percent(&self) -> f32 {
        let elapsed = self.created.elapsed().as_secs_f32();
        let total = self.duration.as_secs_f32();
        if total <= 0.0 {
            return 0.0;
        }
        (1.0 - elapsed / total).clamp(0.0, 1.0)
    }

    /// Render opacity; toasts fade over their last stretch of life unless
    /// the user prefers reduced motion.
    pub fn opacity(&self, reduce_motion: bool) -> f32 {
        if reduce_motion {
            return 1.0;
        }
        const FADE_WINDOW: f32 = 0.2;
        let remaining = self.remaining_percent();
        if remaining < FADE_WINDOW {
            remaining / FADE_WINDOW
        } else {
            1.0
        }
    }
}

/// Ordered collection of live toasts.
#[derive(Default)]
pub struct ToastManager {
    toasts: Vec<Toast>,
    next_id: u64,
}

impl ToastManager {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, mut toast: Toast) {
        self.next_id += 1;
        toast.id = self.next_id;
        self.toasts.push(toast);
    }

    pub fn count(&self) -> usize {
        self.toasts.len()
    }

    pub fn toasts(&self) -> &[Toast] {
        &self.toasts
    }

    /// Dismiss a toast by id.
    pub fn remove(&mut self, id: u64) {
        self.toasts.retain(|toast| toast.id != id);
    }

    pub fn clear(&mut self) {
        self.toasts.clear();
    }

    /// Drop expired toasts; returns whether anything changed.
    pub fn prune_expired(&mut self) -> bool {
        let before = self.toasts.len();
        self.toasts.retain(|toast| !toast.is_expired());
        self.toasts.len() != before
    }
}
