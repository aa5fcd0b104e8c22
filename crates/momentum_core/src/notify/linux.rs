use crate::error::AppError;
use crate::model::CompletedTask;
use crate::notify::{APP_NAME, Notifier, notification_body};
use notify_rust::Notification;

pub struct LinuxNotifier;

impl Notifier for LinuxNotifier {
    fn notify(&self, task: &CompletedTask, headline: &str) -> Result<(), AppError> {
        Notification::new()
            .appname(APP_NAME)
            .summary(headline)
            .body(&notification_body(task))
            .show()
            .map_err(|err| AppError::io(err.to_string()))?;
        Ok(())
    }
}
