//! Utilities to track the progression of a refresh

use std::fmt::{Display, Error, Formatter};

/// An event that happens during a refresh
#[derive(Clone, Debug)]
pub enum RefreshEvent {
    /// Refresh has not started
    NotStarted,
    /// Refresh has just started but no course is handled yet
    Started,
    /// Refresh is in progress
    InProgress { course: String, details: String },
    /// Refresh is finished.
    /// `success` is false when some items had to be marked unavailable along the way
    Finished { success: bool },
}

impl Display for RefreshEvent {
    fn fmt(&self, f: &mut Formatter<'_>) -> Result<(), Error> {
        match self {
            RefreshEvent::NotStarted => write!(f, "Not started"),
            RefreshEvent::Started => write!(f, "Refresh has started..."),
            RefreshEvent::InProgress { course, details } => write!(f, "[{}] {}...", course, details),
            RefreshEvent::Finished { success } => match success {
                true => write!(f, "Refresh successfully finished"),
                false => write!(f, "Refresh finished with errors"),
            },
        }
    }
}

impl Default for RefreshEvent {
    fn default() -> Self {
        Self::NotStarted
    }
}

/// See [`feedback_channel`]
pub type FeedbackSender = tokio::sync::watch::Sender<RefreshEvent>;
/// See [`feedback_channel`]
pub type FeedbackReceiver = tokio::sync::watch::Receiver<RefreshEvent>;

/// Create a feedback channel, that can be used to retrieve the current progress of a refresh
pub fn feedback_channel() -> (FeedbackSender, FeedbackReceiver) {
    tokio::sync::watch::channel(RefreshEvent::default())
}

/// A structure that tracks the progression and the errors that happen during a refresh
pub struct RefreshProgress {
    n_errors: u32,
    feedback_channel: Option<FeedbackSender>,
}

impl RefreshProgress {
    pub fn new() -> Self {
        Self { n_errors: 0, feedback_channel: None }
    }
    pub fn new_with_feedback_channel(channel: FeedbackSender) -> Self {
        Self { n_errors: 0, feedback_channel: Some(channel) }
    }

    pub fn is_success(&self) -> bool {
        self.n_errors == 0
    }

    /// Log an error
    pub fn error(&mut self, text: &str) {
        log::error!("{}", text);
        self.n_errors += 1;
    }
    /// Log a warning
    pub fn warn(&mut self, text: &str) {
        log::warn!("{}", text);
        self.n_errors += 1;
    }
    /// Log an info
    pub fn info(&mut self, text: &str) {
        log::info!("{}", text);
    }
    /// Log a debug message
    pub fn debug(&mut self, text: &str) {
        log::debug!("{}", text);
    }
    /// Send an event as a feedback to the listener (if any).
    pub fn feedback(&mut self, event: RefreshEvent) {
        self.feedback_channel
            .as_ref()
            .map(|sender| sender.send(event));
    }
}

impl Default for RefreshProgress {
    fn default() -> Self {
        Self::new()
    }
}
