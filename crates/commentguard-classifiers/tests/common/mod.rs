//! Mock text generators for testing
//!
//! Configurable implementations of the TextGenerator trait for exercising
//! the moderator's remote path, its fallback chain, and the batch runner.

#![allow(dead_code)]

use async_trait::async_trait;
use commentguard_classifiers::TextGenerator;
use commentguard_core::dataset::{COMMENT_ID, COMMENT_TEXT, USERNAME};
use commentguard_core::{Dataset, Result, Row};
use serde_json::json;
use std::sync::atomic::{AtomicU32, Ordering};
use std::sync::Mutex;

/// Generator that returns a fixed reply and counts calls
pub struct MockGenerator {
    reply: String,
    call_count: AtomicU32,
    prompts: Mutex<Vec<String>>,
}

impl MockGenerator {
    pub fn new(reply: &str) -> Self {
        Self {
            reply: reply.to_string(),
            call_count: AtomicU32::new(0),
            prompts: Mutex::new(Vec::new()),
        }
    }

    /// Reply with a well-formed JSON verdict
    pub fn json(is_offensive: bool, offense_type: Option<&str>, explanation: &str) -> Self {
        let reply = json!({
            "is_offensive": is_offensive,
            "offense_type": offense_type,
            "explanation": explanation,
        });
        Self::new(&reply.to_string())
    }

    pub fn call_count(&self) -> u32 {
        self.call_count.load(Ordering::Relaxed)
    }

    pub fn prompts(&self) -> Vec<String> {
        self.prompts.lock().unwrap().clone()
    }
}

#[async_trait]
impl TextGenerator for MockGenerator {
    async fn generate(&self, prompt: &str) -> Result<String> {
        self.call_count.fetch_add(1, Ordering::Relaxed);
        self.prompts.lock().unwrap().push(prompt.to_string());
        Ok(self.reply.clone())
    }

    fn model(&self) -> &str {
        "mock"
    }
}

/// Generator that always fails - for testing the fallback path
pub struct FailingGenerator {
    error_message: String,
    call_count: AtomicU32,
}

impl FailingGenerator {
    pub fn new() -> Self {
        Self {
            error_message: "Simulated quota exceeded".to_string(),
            call_count: AtomicU32::new(0),
        }
    }

    pub fn with_error(mut self, message: &str) -> Self {
        self.error_message = message.to_string();
        self
    }

    pub fn call_count(&self) -> u32 {
        self.call_count.load(Ordering::Relaxed)
    }
}

#[async_trait]
impl TextGenerator for FailingGenerator {
    async fn generate(&self, _prompt: &str) -> Result<String> {
        self.call_count.fetch_add(1, Ordering::Relaxed);
        Err(commentguard_core::Error::remote(&self.error_message))
    }

    fn model(&self) -> &str {
        "failing"
    }
}

/// Dataset of `(comment_id, comment_text)` rows
pub fn comments(rows: &[(i64, &str)]) -> Dataset {
    let rows = rows
        .iter()
        .map(|(id, text)| {
            let mut row = Row::new();
            row.insert(COMMENT_ID.to_string(), json!(id));
            row.insert(USERNAME.to_string(), json!(format!("user{id}")));
            row.insert(COMMENT_TEXT.to_string(), json!(text));
            row
        })
        .collect();
    Dataset::from_rows(rows)
}
