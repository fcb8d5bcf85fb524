use async_trait::async_trait;
use std::fmt::Debug;

/// What the biometric dialog shows to the user.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct BiometricPrompt {
    prompt_message: String,
    cancel_label: String,
    allow_fallback: bool,
}

impl BiometricPrompt {
    pub fn new(prompt_message: String, cancel_label: String, allow_fallback: bool) -> Self {
        BiometricPrompt {
            prompt_message,
            cancel_label,
            allow_fallback,
        }
    }

    pub fn prompt_message(&self) -> &str {
        &self.prompt_message
    }

    pub fn cancel_label(&self) -> &str {
        &self.cancel_label
    }

    /// Whether the device may fall back to its passcode when the biometric scan is not possible.
    pub fn allow_fallback(&self) -> bool {
        self.allow_fallback
    }
}

impl Default for BiometricPrompt {
    fn default() -> Self {
        BiometricPrompt::new("Scan your fingerprint".to_string(), "Use Password".to_string(), false)
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum BiometricOutcome {
    Success,
    Failure { reason: String },
}

/// The device's biometric identity check. Implementations report their own errors as a failure.
#[async_trait]
pub trait BiometricAuthenticator: Debug + Send + Sync {
    async fn authenticate(&self, prompt: &BiometricPrompt) -> BiometricOutcome;
}
