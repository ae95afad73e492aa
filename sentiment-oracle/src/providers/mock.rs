//! Mock classifier for testing
//!
//! Provides a configurable mock oracle that can simulate failures, partial
//! outages, and fixed verdicts.

use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::Mutex;
use std::sync::atomic::{AtomicUsize, Ordering};

use crate::error::{OracleError, Result};
use crate::oracle::{Classification, SentimentOracle};

/// A deterministic stand-in for a real classifier
pub struct MockOracle {
    /// Number of times to fail before succeeding (0 = always succeed)
    fail_count: AtomicUsize,
    /// Current call count
    call_count: AtomicUsize,
    /// Error to return on failure (None = always succeed)
    fail_with: Mutex<Option<OracleError>>,
    /// Verdict returned on success
    verdict: Classification,
    /// Per-text verdicts that take precedence over `verdict`
    overrides: HashMap<String, Classification>,
    /// Texts that always fail, regardless of `fail_count`
    failing_texts: Vec<String>,
    /// Provider name for display
    name: &'static str,
}

impl MockOracle {
    fn with_state(fail_count: usize, fail_with: Option<OracleError>, verdict: Classification) -> Self {
        Self {
            fail_count: AtomicUsize::new(fail_count),
            call_count: AtomicUsize::new(0),
            fail_with: Mutex::new(fail_with),
            verdict,
            overrides: HashMap::new(),
            failing_texts: Vec::new(),
            name: "mock",
        }
    }

    /// Create an oracle that always answers with the given label and score
    pub fn always_returns(label: &str, score: f64) -> Self {
        Self::with_state(0, None, Classification::new(label, score))
    }

    /// Create an oracle that always fails with the given error
    pub fn always_fails(error: OracleError) -> Self {
        Self::with_state(usize::MAX, Some(error), Classification::new("", 0.0))
    }

    /// Create an oracle that fails `n` times with the given error, then answers
    pub fn fails_then_returns(n: usize, error: OracleError, label: &str, score: f64) -> Self {
        Self::with_state(n, Some(error), Classification::new(label, score))
    }

    /// Answer `text` with a specific verdict instead of the default one
    pub fn with_override(mut self, text: &str, label: &str, score: f64) -> Self {
        self.overrides
            .insert(text.to_string(), Classification::new(label, score));
        self
    }

    /// Make every call for `text` fail, whatever the other settings say
    pub fn failing_on(mut self, text: &str) -> Self {
        self.failing_texts.push(text.to_string());
        self
    }

    /// Get the number of times classify() was called
    pub fn call_count(&self) -> usize {
        self.call_count.load(Ordering::SeqCst)
    }

    /// Set a custom provider name
    pub fn with_name(mut self, name: &'static str) -> Self {
        self.name = name;
        self
    }
}

#[async_trait]
impl SentimentOracle for MockOracle {
    async fn classify(&self, text: &str) -> Result<Classification> {
        let call_num = self.call_count.fetch_add(1, Ordering::SeqCst);

        if self.failing_texts.iter().any(|t| t == text) {
            return Err(OracleError::ApiError {
                message: format!("mock failure for {:?}", text),
                status_code: Some(500),
            });
        }

        if call_num < self.fail_count.load(Ordering::SeqCst) {
            let error = self.fail_with.lock().unwrap();
            if let Some(err) = error.as_ref() {
                return Err(clone_error(err));
            }
        }

        Ok(self
            .overrides
            .get(text)
            .cloned()
            .unwrap_or_else(|| self.verdict.clone()))
    }

    fn name(&self) -> &'static str {
        self.name
    }

    fn model(&self) -> &str {
        "mock-model"
    }

    fn is_available(&self) -> Result<()> {
        Ok(())
    }
}

/// Clone an OracleError (needed because OracleError doesn't implement Clone)
fn clone_error(err: &OracleError) -> OracleError {
    match err {
        OracleError::ServerOverloaded { message } => OracleError::ServerOverloaded {
            message: message.clone(),
        },
        OracleError::MissingApiKey { provider, env_var } => OracleError::MissingApiKey {
            provider: provider.clone(),
            env_var: env_var.clone(),
        },
        OracleError::RateLimited { retry_after } => OracleError::RateLimited {
            retry_after: *retry_after,
        },
        OracleError::ApiError {
            message,
            status_code,
        } => OracleError::ApiError {
            message: message.clone(),
            status_code: *status_code,
        },
        OracleError::Unavailable(s) => OracleError::Unavailable(s.clone()),
        OracleError::CommandError(s) => OracleError::CommandError(s.clone()),
        OracleError::InvalidResponse(s) => OracleError::InvalidResponse(s.clone()),
        OracleError::ConfigError(s) => OracleError::ConfigError(s.clone()),
        OracleError::InvalidPreset(s) => OracleError::InvalidPreset(s.clone()),
        // For Io and Toml errors, we create a generic error since they can't be cloned
        OracleError::Io(_) => OracleError::ConfigError("IO error (mock)".to_string()),
        OracleError::TomlParse(_) => OracleError::ConfigError("TOML parse error (mock)".to_string()),
        OracleError::TomlSerialize(_) => {
            OracleError::ConfigError("TOML serialize error (mock)".to_string())
        }
    }
}
