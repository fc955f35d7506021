//! AutoRemote voice message formatting.

/// Command suffix telling the receiving device to speak the message.
const VOICE_COMMAND: &str = "=:=voice";

/// A message to be spoken by a named voice.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VoiceMessage {
    speaker: String,
    text: String,
}

impl VoiceMessage {
    pub fn new(speaker: impl Into<String>, text: impl Into<String>) -> Self {
        Self {
            speaker: speaker.into(),
            text: text.into(),
        }
    }

    pub fn speaker(&self) -> &str {
        &self.speaker
    }

    /// The message text with spaces replaced by commas.
    ///
    /// The first space in the payload separates the speaker from the words,
    /// so the words themselves must not contain any.
    pub fn words(&self) -> String {
        self.text.replace(' ', ",")
    }

    /// The AutoRemote `message` parameter.
    ///
    /// ```
    /// use relay_server::voice::VoiceMessage;
    ///
    /// let msg = VoiceMessage::new("jp_women", "hello there");
    /// assert_eq!(msg.payload(), "jp_women hello,there=:=voice");
    /// ```
    pub fn payload(&self) -> String {
        format!("{} {}{}", self.speaker, self.words(), VOICE_COMMAND)
    }
}
