//! Notificaciones para el usuario
//!
//! Los fallos de persistencia no se propagan como errores: se registran y se
//! avisan al usuario a través de un `Notifier`.

use serde::Serialize;
use std::sync::Mutex;

#[derive(Debug, Clone, Copy, Serialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum NotificationLevel {
    Success,
    Error,
}

#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct Notification {
    pub level: NotificationLevel,
    pub title: String,
    pub message: String,
}

impl Notification {
    pub fn success(title: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            level: NotificationLevel::Success,
            title: title.into(),
            message: message.into(),
        }
    }

    pub fn error(title: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            level: NotificationLevel::Error,
            title: title.into(),
            message: message.into(),
        }
    }
}

pub trait Notifier: Send + Sync {
    fn notify(&self, notification: Notification);
}

/// Solo deja constancia en el log
#[derive(Debug, Default, Clone, Copy)]
pub struct LogNotifier;

impl Notifier for LogNotifier {
    fn notify(&self, notification: Notification) {
        match notification.level {
            NotificationLevel::Success => {
                log::info!("🔔 {}: {}", notification.title, notification.message)
            }
            NotificationLevel::Error => {
                log::warn!("🔔 {}: {}", notification.title, notification.message)
            }
        }
    }
}

/// Acumula las notificaciones de una petición para devolverlas en la respuesta
#[derive(Debug, Default)]
pub struct NotificationBuffer {
    notifications: Mutex<Vec<Notification>>,
}

impl NotificationBuffer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn drain(&self) -> Vec<Notification> {
        match self.notifications.lock() {
            Ok(mut guard) => guard.drain(..).collect(),
            Err(poisoned) => poisoned.into_inner().drain(..).collect(),
        }
    }

    /// Último mensaje de error, si lo hay
    pub fn last_error(&self) -> Option<String> {
        let guard = match self.notifications.lock() {
            Ok(guard) => guard,
            Err(poisoned) => poisoned.into_inner(),
        };
        guard
            .iter()
            .rev()
            .find(|n| n.level == NotificationLevel::Error)
            .map(|n| n.message.clone())
    }
}

impl Notifier for NotificationBuffer {
    fn notify(&self, notification: Notification) {
        LogNotifier.notify(notification.clone());
        match self.notifications.lock() {
            Ok(mut guard) => guard.push(notification),
            Err(poisoned) => poisoned.into_inner().push(notification),
        }
    }
}
