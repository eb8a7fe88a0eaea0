//! Paragraph-aware debounce scheduler for AI feedback.
//!
//! Turns a stream of text edits into a small number of feedback requests.
//! Feedback fires only for settled paragraphs:
//!
//! - **paragraph completed**: the user just opened a new paragraph, so the
//!   one before it is done. Fires after the short delay.
//! - **mid edit**: the user changed an earlier paragraph. Fires after the
//!   longer delay.
//!
//! Every edit cancels both pending timers before anything new is scheduled,
//! so only the most recent settling state wins. Timers are tokio tasks;
//! outside a tokio runtime nothing is scheduled and a warning is logged.

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use tokio::runtime::Handle;
use tokio::task::JoinHandle;

use crate::text::{ends_with_paragraph_break, split_paragraphs};

/// Receives the text of a settled paragraph.
///
/// Errors (AI failures, admission denials) are the implementation's to
/// handle; the scheduler neither inspects nor retries.
#[async_trait]
pub trait FeedbackHandler: Send + Sync {
    async fn generate_feedback(&self, paragraph: String);
}

/// Debounce delays.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SchedulerConfig {
    pub paragraph_completed_delay: Duration,
    pub mid_edit_delay: Duration,
}

impl Default for SchedulerConfig {
    fn default() -> Self {
        Self { paragraph_completed_delay: Duration::from_millis(1000), mid_edit_delay: Duration::from_millis(1500) }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FeedbackTrigger {
    ParagraphCompleted,
    MidEdit,
}

/// What an edit event scheduled.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScheduledFeedback {
    pub trigger: FeedbackTrigger,
    pub paragraph_index: usize,
    /// Trimmed paragraph text handed to the feedback handler.
    pub paragraph: String,
    pub delay: Duration,
}

/// Per-session scheduler state.
pub struct FeedbackScheduler {
    config: SchedulerConfig,
    handler: Arc<dyn FeedbackHandler>,
    previous_text: String,
    last_edited_paragraph: Option<usize>,
    paragraph_timer: Option<JoinHandle<()>>,
    mid_edit_timer: Option<JoinHandle<()>>,
}

impl FeedbackScheduler {
    pub fn new(config: SchedulerConfig, handler: Arc<dyn FeedbackHandler>) -> Self {
        Self {
            config,
            handler,
            previous_text: String::new(),
            last_edited_paragraph: None,
            paragraph_timer: None,
            mid_edit_timer: None,
        }
    }

    pub fn previous_text(&self) -> &str {
        &self.previous_text
    }

    pub fn last_edited_paragraph(&self) -> Option<usize> {
        self.last_edited_paragraph
    }

    /// Whether any timer is still waiting to fire.
    pub fn has_pending(&self) -> bool {
        [&self.paragraph_timer, &self.mid_edit_timer]
            .into_iter()
            .flatten()
            .any(|timer| !timer.is_finished())
    }

    /// Feed one edit, comparing against the text recorded by the last call.
    pub fn update(&mut self, current: &str, last_edited: Option<usize>) -> Option<ScheduledFeedback> {
        let previous = std::mem::take(&mut self.previous_text);
        let scheduled = self.on_text_change(current, &previous, last_edited);
        self.previous_text = current.to_string();
        scheduled
    }

    /// Handle one edit event.
    ///
    /// `last_edited` is the paragraph index the editor reports (None when
    /// unknown). Out-of-range indices are clamped to the last paragraph.
    pub fn on_text_change(
        &mut self, current: &str, previous: &str, last_edited: Option<usize>,
    ) -> Option<ScheduledFeedback> {
        self.cancel_all();

        let current_paragraphs = split_paragraphs(current);
        let previous_paragraphs = split_paragraphs(previous);
        let last_index = current_paragraphs.len() - 1;
        let last_edited = last_edited.map(|i| i.min(last_index));
        self.last_edited_paragraph = last_edited;

        let just_created_new_paragraph = ends_with_paragraph_break(current)
            && !ends_with_paragraph_break(previous)
            && current_paragraphs.len() > previous_paragraphs.len();

        let scheduled = if just_created_new_paragraph && current_paragraphs.len() >= 2 {
            let index = current_paragraphs.len() - 2;
            settled(current_paragraphs[index]).map(|paragraph| ScheduledFeedback {
                trigger: FeedbackTrigger::ParagraphCompleted,
                paragraph_index: index,
                paragraph,
                delay: self.config.paragraph_completed_delay,
            })
        } else {
            last_edited.filter(|&index| index < last_index).and_then(|index| {
                settled(current_paragraphs[index]).map(|paragraph| ScheduledFeedback {
                    trigger: FeedbackTrigger::MidEdit,
                    paragraph_index: index,
                    paragraph,
                    delay: self.config.mid_edit_delay,
                })
            })
        };

        let feedback = scheduled?;
        let Some(timer) = self.spawn_timer(feedback.delay, feedback.paragraph.clone()) else {
            tracing::warn!(
                paragraph_index = feedback.paragraph_index,
                "no tokio runtime available, paragraph feedback not scheduled"
            );
            return None;
        };
        tracing::debug!(
            trigger = ?feedback.trigger,
            paragraph_index = feedback.paragraph_index,
            delay_ms = feedback.delay.as_millis() as u64,
            "scheduling paragraph feedback"
        );
        match feedback.trigger {
            FeedbackTrigger::ParagraphCompleted => self.paragraph_timer = Some(timer),
            FeedbackTrigger::MidEdit => self.mid_edit_timer = Some(timer),
        }

        Some(feedback)
    }

    /// Cancel both pending timers. Safe to call repeatedly.
    pub fn cancel_all(&mut self) {
        for timer in [self.paragraph_timer.take(), self.mid_edit_timer.take()]
            .into_iter()
            .flatten()
        {
            timer.abort();
        }
    }

    /// None when called outside a tokio runtime.
    fn spawn_timer(&self, delay: Duration, paragraph: String) -> Option<JoinHandle<()>> {
        let runtime = Handle::try_current().ok()?;
        let handler = Arc::clone(&self.handler);
        Some(runtime.spawn(async move {
            tokio::time::sleep(delay).await;
            // Detached so a later edit aborting this timer cannot cut off an
            // in-flight feedback call.
            tokio::spawn(async move { handler.generate_feedback(paragraph).await });
        }))
    }
}

impl Drop for FeedbackScheduler {
    fn drop(&mut self) {
        self.cancel_all();
    }
}

fn settled(paragraph: &str) -> Option<String> {
    let trimmed = paragraph.trim();
    (!trimmed.is_empty()).then(|| trimmed.to_string())
}
