//! Askama templates for the form pages.

use askama::Template;

/// Chat form with the last question and its answer.
#[derive(Template)]
#[template(path = "chat.html")]
pub struct ChatTemplate {
    pub question: String,
    pub answer: String,
}

/// Voice relay form with send feedback.
#[derive(Template)]
#[template(path = "voice.html")]
pub struct VoiceTemplate {
    pub feedback: String,
}
