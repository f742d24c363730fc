pub mod clipboard;
pub mod notifications;
pub mod tabs;

pub use clipboard::{Clipboard, ClipboardOp};
pub use notifications::{Notification, Notifications, Severity};
pub use tabs::{Tabs, ViewContext};
