use std::process::{Command, Stdio};

const APP_NAME: &str = "torrentrss";

pub fn error_message(kind: &str) -> String {
    format!("An exception of type {} occurred.", kind)
}

/// Desktop notification through `notify-send`, if it is installed. Never fails.
pub fn show_error_notification(kind: &str) {
    let Ok(notify_send) = which::which("notify-send") else {
        debug!("notify-send not found, not showing notification");
        return;
    };
    let result = Command::new(notify_send)
        .args(["--app-name", APP_NAME, APP_NAME])
        .arg(error_message(kind))
        .stdin(Stdio::null())
        .spawn();
    if let Err(e) = result {
        warn!("failed to show notification: {:?}", e);
    }
}
