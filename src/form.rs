//! Form state and its reducer.
//!
//! The whole input surface (mode, text, selected file, focus, language)
//! and the request phase live in one [`FormState`] value. It changes only
//! through [`update`], which makes every transition a plain function call
//! that tests can replay without a UI.
//!
//! While a call is in flight ([`Phase::Attempting`]) the inputs are locked:
//! every editing action and a second [`Action::Submit`] leave the state
//! unchanged. There is no queue.

use crate::error::SummarizeError;
use crate::language::Language;
use crate::output::Summary;
use crate::progress::SummaryProgressCallback;
use crate::request::{accepts_selection, assemble, InputMode, PdfAttachment, SummaryRequest};
use crate::summarize::Summarizer;
use std::sync::Arc;
use tokio::sync::mpsc;
use tracing::{debug, warn};

/// Upload slot of the form.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum FileSlot {
    #[default]
    Empty,
    /// A PDF was selected and is being read.
    Reading { name: String },
    /// The PDF is fully in memory.
    Ready(PdfAttachment),
}

/// Lifecycle of one submission.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum Phase {
    #[default]
    Idle,
    /// Attempt number in flight, 1-indexed.
    Attempting(u32),
    Success(String),
    Failed(String),
}

/// Everything the view layer shows and edits.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FormState {
    pub mode: InputMode,
    pub text: String,
    pub file: FileSlot,
    pub focus_instruction: String,
    pub language: Language,
    pub phase: Phase,
}

/// Inputs to [`update`].
#[derive(Debug, Clone)]
pub enum Action {
    SetMode(InputMode),
    SetText(String),
    SetFocus(String),
    SetLanguage(Language),
    /// The user picked a file; rejected unless it is a PDF.
    FileSelected {
        name: String,
        media_type: Option<String>,
    },
    FileLoaded(PdfAttachment),
    /// Reading the named selection failed.
    FileReadFailed { name: String, reason: String },
    ClearFile,
    /// Start a call. Ignored unless [`FormState::can_submit`].
    Submit,
    AttemptStarted(u32),
    /// The call finished: the report, or the message to show instead.
    Completed(Result<String, String>),
    /// Back to a blank form.
    Reset,
}

impl FormState {
    pub fn new(language: Language) -> Self {
        Self {
            language,
            ..Self::default()
        }
    }

    /// A call is in flight.
    pub fn is_busy(&self) -> bool {
        matches!(self.phase, Phase::Attempting(_))
    }

    /// The loaded PDF, if reading has finished.
    pub fn ready_file(&self) -> Option<&PdfAttachment> {
        match &self.file {
            FileSlot::Ready(pdf) => Some(pdf),
            _ => None,
        }
    }

    /// Build the request for the current fields.
    pub fn build_request(&self) -> Result<SummaryRequest, SummarizeError> {
        assemble(
            self.mode,
            &self.text,
            self.ready_file(),
            &self.focus_instruction,
            self.language,
        )
    }

    /// Whether the submit control is enabled.
    pub fn can_submit(&self) -> bool {
        !self.is_busy() && self.build_request().is_ok()
    }

    /// The text to render in the report area, if any.
    pub fn report(&self) -> Option<&str> {
        match &self.phase {
            Phase::Success(s) | Phase::Failed(s) => Some(s),
            _ => None,
        }
    }
}

/// Apply `action` to `state`.
pub fn update(mut state: FormState, action: Action) -> FormState {
    if state.is_busy() {
        match action {
            Action::AttemptStarted(n) => state.phase = Phase::Attempting(n),
            Action::Completed(Ok(markdown)) => state.phase = Phase::Success(markdown),
            Action::Completed(Err(message)) => state.phase = Phase::Failed(message),
            other => debug!("Ignoring {:?} while a summary is in progress", other),
        }
        return state;
    }

    match action {
        Action::SetMode(mode) => state.mode = mode,
        Action::SetText(text) => state.text = text,
        Action::SetFocus(focus) => state.focus_instruction = focus,
        Action::SetLanguage(language) => state.language = language,
        Action::FileSelected { name, media_type } => {
            if accepts_selection(&name, media_type.as_deref()) {
                state.file = FileSlot::Reading { name };
            } else {
                warn!("Rejected non-PDF selection '{}'", name);
            }
        }
        Action::FileLoaded(pdf) => {
            // A load for a selection that was since cleared or replaced is stale.
            if matches!(&state.file, FileSlot::Reading { name } if *name == pdf.name) {
                state.file = FileSlot::Ready(pdf);
            }
        }
        Action::FileReadFailed { name, reason } => {
            // Same staleness rule as FileLoaded.
            if matches!(&state.file, FileSlot::Reading { name: current } if *current == name) {
                warn!("Reading '{}' failed: {}", name, reason);
                state.file = FileSlot::Empty;
            } else {
                debug!("Ignoring read failure for stale selection '{}'", name);
            }
        }
        Action::ClearFile => state.file = FileSlot::Empty,
        Action::Submit => {
            if state.can_submit() {
                state.phase = Phase::Attempting(1);
            }
        }
        Action::AttemptStarted(_) | Action::Completed(_) => {
            debug!("Ignoring call event while idle");
        }
        Action::Reset => state = FormState::new(state.language),
    }
    state
}

/// Submit the form: assemble the request, run the call, record the result.
///
/// Returns the state unchanged when submission is not possible (busy, or
/// the inputs do not form a request).
pub async fn submit(state: FormState, summarizer: &Summarizer) -> FormState {
    submit_observed(state, summarizer, |_| {}).await.0
}

/// [`submit`], calling `observe` after every phase change: `Attempting(n)`
/// for each attempt the client starts, then `Success` or `Failed`.
///
/// Also hands back the structured outcome; it is `None` when submission
/// was refused.
pub async fn submit_observed<F>(
    state: FormState,
    summarizer: &Summarizer,
    mut observe: F,
) -> (FormState, Option<Result<Summary, SummarizeError>>)
where
    F: FnMut(&FormState),
{
    let request = match state.build_request() {
        Ok(r) if !state.is_busy() => r,
        Ok(_) => return (state, None),
        Err(e) => {
            debug!("Submit refused: {}", e);
            return (state, None);
        }
    };

    let mut state = update(state, Action::Submit);
    observe(&state);

    let (tx, mut rx) = mpsc::unbounded_channel();
    let call = summarizer.try_summarize_observed(&request, Arc::new(AttemptForwarder(tx)));
    tokio::pin!(call);

    let result = loop {
        tokio::select! {
            biased;
            Some(attempt) = rx.recv() => state = attempt_started(state, attempt, &mut observe),
            result = &mut call => break result,
        }
    };
    while let Ok(attempt) = rx.try_recv() {
        state = attempt_started(state, attempt, &mut observe);
    }

    let report = match &result {
        Ok(summary) => Ok(summary.markdown.clone()),
        Err(e) => Err(e.to_string()),
    };
    let state = update(state, Action::Completed(report));
    observe(&state);
    (state, Some(result))
}

fn attempt_started<F>(state: FormState, attempt: u32, observe: &mut F) -> FormState
where
    F: FnMut(&FormState),
{
    if state.phase == Phase::Attempting(attempt) {
        return state;
    }
    let state = update(state, Action::AttemptStarted(attempt));
    observe(&state);
    state
}

/// Turns the client's attempt events into [`Action::AttemptStarted`].
struct AttemptForwarder(mpsc::UnboundedSender<u32>);

impl SummaryProgressCallback for AttemptForwarder {
    fn on_attempt_start(&self, attempt: u32, _max_attempts: u32) {
        // The receiver outlives the call.
        let _ = self.0.send(attempt);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::request::PDF_MEDIA_TYPE;

    fn pdf(name: &str) -> PdfAttachment {
        PdfAttachment {
            name: name.into(),
            media_type: PDF_MEDIA_TYPE.into(),
            data_base64: "JVBERg==".into(),
            byte_len: 4,
        }
    }

    fn run(state: FormState, actions: Vec<Action>) -> FormState {
        actions.into_iter().fold(state, update)
    }

    #[test]
    fn non_pdf_selection_is_ignored() {
        let s = run(
            FormState::default(),
            vec![Action::FileSelected {
                name: "slides.pptx".into(),
                media_type: Some("application/vnd.ms-powerpoint".into()),
            }],
        );
        assert_eq!(s.file, FileSlot::Empty);
    }

    #[test]
    fn pdf_selection_then_load_becomes_ready() {
        let s = run(
            FormState::default(),
            vec![
                Action::FileSelected {
                    name: "paper.pdf".into(),
                    media_type: Some(PDF_MEDIA_TYPE.into()),
                },
                Action::FileLoaded(pdf("paper.pdf")),
            ],
        );
        assert_eq!(s.file, FileSlot::Ready(pdf("paper.pdf")));
        assert!(s.can_submit());
    }

    #[test]
    fn upload_not_submittable_while_reading() {
        let s = run(
            FormState::default(),
            vec![Action::FileSelected {
                name: "paper.pdf".into(),
                media_type: None,
            }],
        );
        assert!(matches!(s.file, FileSlot::Reading { .. }));
        assert!(!s.can_submit());
        let s = update(s, Action::Submit);
        assert_eq!(s.phase, Phase::Idle);
    }

    #[test]
    fn stale_load_is_dropped() {
        let s = run(
            FormState::default(),
            vec![
                Action::FileSelected {
                    name: "a.pdf".into(),
                    media_type: None,
                },
                Action::ClearFile,
                Action::FileLoaded(pdf("a.pdf")),
            ],
        );
        assert_eq!(s.file, FileSlot::Empty);
    }

    #[test]
    fn read_failure_clears_slot() {
        let s = run(
            FormState::default(),
            vec![
                Action::FileSelected {
                    name: "a.pdf".into(),
                    media_type: None,
                },
                Action::FileReadFailed {
                    name: "a.pdf".into(),
                    reason: "truncated".into(),
                },
            ],
        );
        assert_eq!(s.file, FileSlot::Empty);
    }

    #[test]
    fn stale_read_failure_is_dropped() {
        let s = run(
            FormState::default(),
            vec![
                Action::FileSelected {
                    name: "a.pdf".into(),
                    media_type: None,
                },
                Action::FileSelected {
                    name: "b.pdf".into(),
                    media_type: None,
                },
                Action::FileLoaded(pdf("b.pdf")),
                Action::FileReadFailed {
                    name: "a.pdf".into(),
                    reason: "permission denied".into(),
                },
            ],
        );
        assert_eq!(s.file, FileSlot::Ready(pdf("b.pdf")));
    }

    #[test]
    fn paste_submit_walks_the_phases() {
        let s = run(
            FormState::new(Language::English),
            vec![
                Action::SetMode(InputMode::Paste),
                Action::SetText("Lorem ipsum".into()),
                Action::Submit,
            ],
        );
        assert_eq!(s.phase, Phase::Attempting(1));
        assert!(s.is_busy());

        let s = run(
            s,
            vec![
                Action::AttemptStarted(2),
                Action::AttemptStarted(3),
                Action::Completed(Ok("# Report".into())),
            ],
        );
        assert_eq!(s.phase, Phase::Success("# Report".into()));
        assert_eq!(s.report(), Some("# Report"));
        assert!(!s.is_busy());
    }

    #[test]
    fn inputs_locked_while_busy() {
        let busy = run(
            FormState::default(),
            vec![
                Action::SetMode(InputMode::Paste),
                Action::SetText("text".into()),
                Action::Submit,
            ],
        );
        let after = run(
            busy.clone(),
            vec![
                Action::SetText("changed".into()),
                Action::SetLanguage(Language::Spanish),
                Action::SetMode(InputMode::Upload),
                Action::Submit,
                Action::Reset,
            ],
        );
        assert_eq!(after, busy);
    }

    #[test]
    fn blank_paste_cannot_submit() {
        let s = run(
            FormState::default(),
            vec![
                Action::SetMode(InputMode::Paste),
                Action::SetText("   ".into()),
                Action::Submit,
            ],
        );
        assert_eq!(s.phase, Phase::Idle);
    }

    #[test]
    fn failure_is_rendered_as_report() {
        let s = run(
            FormState::default(),
            vec![
                Action::SetMode(InputMode::Paste),
                Action::SetText("x".into()),
                Action::Submit,
                Action::Completed(Err("Summary failed after 5 attempts".into())),
            ],
        );
        assert_eq!(s.phase, Phase::Failed("Summary failed after 5 attempts".into()));
        assert_eq!(s.report(), Some("Summary failed after 5 attempts"));
    }

    #[test]
    fn reset_keeps_language() {
        let s = run(
            FormState::new(Language::Japanese),
            vec![Action::SetText("x".into()), Action::Reset],
        );
        assert_eq!(s, FormState::new(Language::Japanese));
    }
}
