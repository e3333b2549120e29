//! Screen state: which overlay is open, the toast slot and the search debouncer

use serde::{Deserialize, Serialize};
use std::time::{Duration, Instant};

/// What the main screen is showing on top of the list. Only one overlay can
/// be open at a time.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "mode", rename_all = "snake_case")]
pub enum UiMode {
    Browsing,
    /// Create form when `editing` is `None`
    Form { editing: Option<u64> },
    Help,
    /// Delete requested, waiting for the user to confirm
    ConfirmDelete { id: u64 },
}

impl Default for UiMode {
    fn default() -> Self {
        UiMode::Browsing
    }
}

impl UiMode {
    pub fn is_form_open(&self) -> bool {
        matches!(self, UiMode::Form { .. })
    }

    /// Id being edited, if the form is open in edit mode
    pub fn editing_id(&self) -> Option<u64> {
        match self {
            UiMode::Form { editing } => *editing,
            _ => None,
        }
    }

    pub fn pending_delete(&self) -> Option<u64> {
        match self {
            UiMode::ConfirmDelete { id } => Some(*id),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ToastKind {
    Ok,
    Err,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Toast {
    pub kind: ToastKind,
    pub message: String,
    #[serde(skip)]
    pub shown_at: Instant,
}

impl Toast {
    pub fn ok(message: impl Into<String>, now: Instant) -> Self {
        Self { kind: ToastKind::Ok, message: message.into(), shown_at: now }
    }

    pub fn err(message: impl Into<String>, now: Instant) -> Self {
        Self { kind: ToastKind::Err, message: message.into(), shown_at: now }
    }
}

/// Holds at most one toast; showing a new one replaces the old
#[derive(Debug, Clone)]
pub struct ToastSlot {
    current: Option<Toast>,
    timeout: Duration,
}

impl ToastSlot {
    pub fn new(timeout: Duration) -> Self {
        Self { current: None, timeout }
    }

    pub fn timeout(&self) -> Duration {
        self.timeout
    }

    pub fn show(&mut self, toast: Toast) {
        self.current = Some(toast);
    }

    /// The visible toast at `now`; an expired toast is dropped
    pub fn current(&mut self, now: Instant) -> Option<&Toast> {
        let expired = self
            .current
            .as_ref()
            .map_or(false, |t| now.saturating_duration_since(t.shown_at) >= self.timeout);
        if expired {
            self.current = None;
        }
        self.current.as_ref()
    }

    pub fn dismiss(&mut self) {
        self.current = None;
    }
}

/// Ticket handed out for each submitted value
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Ticket(u64);

/// Keystroke debouncer. Each `submit` cancels whatever was pending; the
/// caller waits out the quiet period and then calls `settle` with its
/// ticket, which only yields a value if nothing newer arrived meanwhile.
#[derive(Debug, Clone)]
pub struct Debouncer<T> {
    delay: Duration,
    generation: u64,
    pending: Option<T>,
}

impl<T> Debouncer<T> {
    pub fn new(delay: Duration) -> Self {
        Self { delay, generation: 0, pending: None }
    }

    pub fn delay(&self) -> Duration {
        self.delay
    }

    pub fn submit(&mut self, value: T) -> Ticket {
        self.generation += 1;
        self.pending = Some(value);
        Ticket(self.generation)
    }

    /// Take the pending value if `ticket` is still the latest
    pub fn settle(&mut self, ticket: Ticket) -> Option<T> {
        if ticket.0 != self.generation {
            return None;
        }
        self.pending.take()
    }

    /// Drop the pending value; outstanding tickets will not settle
    pub fn cancel(&mut self) {
        self.generation += 1;
        self.pending = None;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_mode_accessors() {
        assert!(!UiMode::Browsing.is_form_open());
        assert!(UiMode::Form { editing: None }.is_form_open());
        assert_eq!(UiMode::Form { editing: Some(4) }.editing_id(), Some(4));
        assert_eq!(UiMode::Help.editing_id(), None);
        assert_eq!(UiMode::ConfirmDelete { id: 9 }.pending_delete(), Some(9));
        assert_eq!(UiMode::Form { editing: Some(9) }.pending_delete(), None);
    }

    #[test]
    fn test_mode_serializes_tagged() {
        let json = serde_json::to_value(UiMode::ConfirmDelete { id: 2 }).unwrap();
        assert_eq!(json, serde_json::json!({"mode": "confirm_delete", "id": 2}));
    }

    #[test]
    fn test_new_toast_replaces_old() {
        let now = Instant::now();
        let mut slot = ToastSlot::new(Duration::from_millis(3000));

        slot.show(Toast::ok("Gasto guardado.", now));
        slot.show(Toast::err("Debe estar entre 1 y 5.", now));

        let current = slot.current(now).unwrap();
        assert_eq!(current.kind, ToastKind::Err);
        assert_eq!(current.message, "Debe estar entre 1 y 5.");
    }

    #[test]
    fn test_toast_expires() {
        let now = Instant::now();
        let mut slot = ToastSlot::new(Duration::from_millis(3000));
        slot.show(Toast::ok("Registro eliminado.", now));

        assert!(slot.current(now + Duration::from_millis(2999)).is_some());
        assert!(slot.current(now + Duration::from_millis(3000)).is_none());
        // stays gone
        assert!(slot.current(now).is_none());
    }

    #[test]
    fn test_toast_dismiss() {
        let now = Instant::now();
        let mut slot = ToastSlot::new(Duration::from_secs(3));
        slot.show(Toast::ok("x", now));
        slot.dismiss();
        assert!(slot.current(now).is_none());
    }

    #[test]
    fn test_later_keystroke_supersedes() {
        let mut debouncer = Debouncer::new(Duration::from_millis(250));
        let first = debouncer.submit("ta".to_string());
        let second = debouncer.submit("tax".to_string());

        assert_eq!(debouncer.settle(first), None);
        assert_eq!(debouncer.settle(second).as_deref(), Some("tax"));
        // already taken
        assert_eq!(debouncer.settle(second), None);
    }

    #[test]
    fn test_cancel_drops_pending() {
        let mut debouncer = Debouncer::new(Duration::from_millis(250));
        let ticket = debouncer.submit(1);
        debouncer.cancel();
        assert_eq!(debouncer.settle(ticket), None);

        let ticket = debouncer.submit(2);
        assert_eq!(debouncer.settle(ticket), Some(2));
    }
}
