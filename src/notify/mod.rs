// Notification pipeline pieces: rendering, delivery and the sent history

pub mod channels;
pub mod email;
pub mod history;
pub mod template;

pub use channels::{DispatchOutcome, Mailer, dispatch};
pub use email::SmtpMailer;
pub use history::{HistoryEntry, HistoryRecorder, HistoryStatus, SentKey};
pub use template::{ExpiryNotice, NoticeTemplate, subject_line};
