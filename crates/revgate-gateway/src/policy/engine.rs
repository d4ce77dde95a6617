use revgate_core::error::GatewayError;
use revgate_core::review::word_count;

use crate::config::ExperimentConfig;

/// Why a submission was short-circuited.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RejectReason {
    ShortReview { min_required: usize },
}

/// Result of evaluating one submission.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Decision {
    pub word_count: usize,
    pub reject: bool,
    pub reason: Option<RejectReason>,
}

impl Decision {
    /// Client-facing error for a rejecting decision, `None` when accepted.
    pub fn rejection(&self) -> Option<GatewayError> {
        match self.reason {
            Some(RejectReason::ShortReview { min_required }) if self.reject => {
                Some(GatewayError::ShortReview { word_count: self.word_count, min_required })
            }
            _ => None,
        }
    }
}

/// Short-review gate: reject iff the warning is enabled and the text has
/// fewer than `min_words` tokens.
pub fn evaluate(text: &str, cfg: &ExperimentConfig) -> Decision {
    let word_count = word_count(text);

    if cfg.warning_enabled && word_count < cfg.min_words {
        return Decision {
            word_count,
            reject: true,
            reason: Some(RejectReason::ShortReview { min_required: cfg.min_words }),
        };
    }

    Decision { word_count, reject: false, reason: None }
}
