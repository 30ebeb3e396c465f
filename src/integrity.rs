//! Integrity Validator (C4): rejects malformed, placeholder, or
//! below-minimum-length analyses before they can influence consensus.

use crate::model::Analysis;

/// Minimum code-point length for `analysis_text` to be considered valid.
pub const MIN_ANALYSIS_TEXT_LEN: usize = 50;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RejectionReason {
    Placeholder,
    MissingField(&'static str),
    TextTooShort { min: usize, actual: usize },
    InvalidConfidence,
}

impl std::fmt::Display for RejectionReason {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Placeholder => write!(f, "placeholder analysis"),
            Self::MissingField(field) => write!(f, "missing required field '{field}'"),
            Self::TextTooShort { min, actual } => {
                write!(f, "analysis_text has {actual} chars, minimum is {min}")
            }
            Self::InvalidConfidence => write!(f, "confidence is not finite or outside [0, 1]"),
        }
    }
}

/// Validate one [`Analysis`]. Rejection when **any** holds: the
/// placeholder flag is set, any of `{analysis_text, conclusion,
/// confidence}` is absent, `analysis_text` is shorter than
/// [`MIN_ANALYSIS_TEXT_LEN`] code points, or `confidence` is non-finite or
/// outside `[0, 1]`.
pub fn validate(analysis: &Analysis) -> Result<(), RejectionReason> {
    if analysis.placeholder_flag.unwrap_or(false) {
        return Err(RejectionReason::Placeholder);
    }

    let text = analysis
        .analysis_text
        .as_deref()
        .ok_or(RejectionReason::MissingField("analysis_text"))?;

    if analysis.conclusion.is_none() {
        return Err(RejectionReason::MissingField("conclusion"));
    }

    let confidence = analysis
        .confidence
        .ok_or(RejectionReason::MissingField("confidence"))?;

    if !confidence.is_finite() || !(0.0..=1.0).contains(&confidence) {
        return Err(RejectionReason::InvalidConfidence);
    }

    let len = text.chars().count();
    if len < MIN_ANALYSIS_TEXT_LEN {
        return Err(RejectionReason::TextTooShort {
            min: MIN_ANALYSIS_TEXT_LEN,
            actual: len,
        });
    }

    Ok(())
}
