//! LLM-backed comment classifier

use crate::classifier::CommentClassifier;
use crate::generator::TextGenerator;
use crate::response::{parse_reply, ReplyFormat};
use commentguard_core::{Result, Verdict};
use std::sync::Arc;
use std::time::Duration;
use tracing::debug;

/// Default pause before every remote call
pub const DEFAULT_REQUEST_DELAY: Duration = Duration::from_millis(500);

/// Build the moderation prompt for one comment
pub fn build_prompt(comment: &str) -> String {
    format!(
        r#"Analyze the following comment for offensive or inappropriate content:

"{comment}"

Determine if the comment is offensive or inappropriate (Yes/No).
If yes, classify the offense type into ONE of these categories:
- hate_speech (attacking specific groups)
- harassment (targeting individuals)
- profanity (explicit language)
- threat (violent intentions)
- misinformation (false claims)
- toxicity (generally negative/harmful)

Provide a brief explanation (max 20 words).

Format your response as a JSON object with these keys:
- is_offensive (boolean)
- offense_type (string, one of the categories above, or null if not offensive)
- explanation (string)
"#
    )
}

/// Classifier that delegates to a remote text generator.
///
/// Failures are returned to the caller; falling back is the moderator's job.
pub struct RemoteClassifier {
    name: String,
    generator: Arc<dyn TextGenerator>,
    request_delay: Duration,
}

impl RemoteClassifier {
    /// Create a remote classifier with the default request delay
    pub fn new(generator: Arc<dyn TextGenerator>) -> Self {
        Self {
            name: format!("remote:{}", generator.model()),
            generator,
            request_delay: DEFAULT_REQUEST_DELAY,
        }
    }

    /// Set the minimum pause before each call
    pub fn with_request_delay(mut self, delay: Duration) -> Self {
        self.request_delay = delay;
        self
    }
}

#[async_trait::async_trait]
impl CommentClassifier for RemoteClassifier {
    async fn classify(&self, text: &str) -> Result<Verdict> {
        if !self.request_delay.is_zero() {
            tokio::time::sleep(self.request_delay).await;
        }

        let reply = self.generator.generate(&build_prompt(text)).await?;
        let (verdict, format) = parse_reply(&reply)?;

        if format == ReplyFormat::FreeText {
            debug!("Remote reply was not JSON, used free-text parsing");
        }
        Ok(verdict)
    }

    fn name(&self) -> &str {
        &self.name
    }
}
