mod notification;
mod submission;

pub use notification::{Notification, NotificationEvent, NotificationKind};
pub use submission::{DelayUnit, DispatchOutcome, RawSubmission, Submission};
