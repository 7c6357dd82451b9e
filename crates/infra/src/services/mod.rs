mod notifier;

pub use notifier::{
    INotifier, LogNotifier, NotifyError, ReminderWebhookPayload, WebhookNotifier,
    WEBHOOK_KEY_HEADER,
};
