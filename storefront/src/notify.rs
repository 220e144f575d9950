//! Transient user-visible notifications.

use tokio::sync::mpsc;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ToastKind {
    Success,
    Error,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Toast {
    pub kind: ToastKind,
    pub message: String,
}

/// Sending half handed to every view. Toasts sent after the receiver is gone
/// are dropped.
#[derive(Debug, Clone)]
pub struct Toaster {
    tx: mpsc::UnboundedSender<Toast>,
}

/// Receiving half owned by whoever displays the toasts.
#[derive(Debug)]
pub struct Toasts {
    rx: mpsc::UnboundedReceiver<Toast>,
}

pub fn channel() -> (Toaster, Toasts) {
    let (tx, rx) = mpsc::unbounded_channel();
    (Toaster { tx }, Toasts { rx })
}

impl Toaster {
    pub fn success(&self, message: impl Into<String>) {
        self.send(ToastKind::Success, message.into());
    }

    pub fn error(&self, message: impl Into<String>) {
        self.send(ToastKind::Error, message.into());
    }

    fn send(&self, kind: ToastKind, message: String) {
        tracing::debug!(?kind, %message, "toast");
        let _ = self.tx.send(Toast { kind, message });
    }
}

impl Toasts {
    /// Everything sent so far, oldest first.
    pub fn drain(&mut self) -> Vec<Toast> {
        let mut toasts = Vec::new();
        while let Ok(toast) = self.rx.try_recv() {
            toasts.push(toast);
        }
        toasts
    }
}
