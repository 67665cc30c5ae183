use std::rc::Rc;

use yew::prelude::*;

pub const TOAST_TIMEOUT_MS: u32 = 5_000;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ToastKind {
    Success,
    Error,
    Info,
}

#[derive(Clone, Debug, PartialEq)]
pub struct Toast {
    pub id: u32,
    pub kind: ToastKind,
    pub message: String,
}

pub enum ToastAction {
    Push(ToastKind, String),
    Dismiss(u32),
}

#[derive(Clone, Debug, Default, PartialEq)]
pub struct ToastQueue {
    next_id: u32,
    pub toasts: Vec<Toast>,
}

impl Reducible for ToastQueue {
    type Action = ToastAction;

    fn reduce(self: Rc<Self>, action: Self::Action) -> Rc<Self> {
        let mut next = (*self).clone();
        match action {
            ToastAction::Push(kind, message) => {
                next.next_id += 1;
                next.toasts.push(Toast {
                    id: next.next_id,
                    kind,
                    message,
                });
            }
            ToastAction::Dismiss(id) => next.toasts.retain(|t| t.id != id),
        }
        Rc::new(next)
    }
}

/// Handed to every page through context so any action can raise a toast.
#[derive(Clone, PartialEq)]
pub struct Notifier {
    queue: UseReducerDispatcher<ToastQueue>,
}

impl Notifier {
    pub fn new(queue: UseReducerDispatcher<ToastQueue>) -> Self {
        Self { queue }
    }

    pub fn success(&self, message: impl Into<String>) {
        self.queue
            .dispatch(ToastAction::Push(ToastKind::Success, message.into()));
    }

    pub fn error(&self, message: impl Into<String>) {
        let message = message.into();
        log::warn!("{}", message);
        self.queue
            .dispatch(ToastAction::Push(ToastKind::Error, message));
    }

    pub fn info(&self, message: impl Into<String>) {
        self.queue
            .dispatch(ToastAction::Push(ToastKind::Info, message.into()));
    }

    pub fn dismiss(&self, id: u32) {
        self.queue.dispatch(ToastAction::Dismiss(id));
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn push(queue: Rc<ToastQueue>, kind: ToastKind, message: &str) -> Rc<ToastQueue> {
        queue.reduce(ToastAction::Push(kind, message.to_string()))
    }

    #[test]
    fn toasts_get_increasing_ids() {
        let queue = Rc::new(ToastQueue::default());
        let queue = push(queue, ToastKind::Success, "Expense created successfully!");
        let queue = push(queue, ToastKind::Error, "Delete failed");

        let ids: Vec<u32> = queue.toasts.iter().map(|t| t.id).collect();
        assert_eq!(ids, vec![1, 2]);
    }

    #[test]
    fn dismiss_removes_only_that_toast() {
        let queue = Rc::new(ToastQueue::default());
        let queue = push(queue, ToastKind::Info, "one");
        let queue = push(queue, ToastKind::Info, "two");
        let queue = queue.reduce(ToastAction::Dismiss(1));

        assert_eq!(queue.toasts.len(), 1);
        assert_eq!(queue.toasts[0].message, "two");
    }
}
