//! Form type selection.

use crate::landing::LandingCase;
use serde::{Deserialize, Serialize};

/// How much customer information the landing form asks for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FormType {
    /// Email only.
    Minimal,
    /// Name and email.
    Standard,
    /// Full identity, required for certification.
    Full,
}

impl FormType {
    pub fn as_str(&self) -> &'static str {
        match self {
            FormType::Minimal => "minimal",
            FormType::Standard => "standard",
            FormType::Full => "full",
        }
    }
}

/// Choose the form for a case and amount.
///
/// Amounts at or above the certification threshold, and every gift card
/// redemption, need the full form. Claims below the threshold get the
/// minimal form; everything else the standard one.
pub fn determine_form_type(case: LandingCase, amount: f64, threshold: f64) -> FormType {
    if amount >= threshold || case == LandingCase::D {
        FormType::Full
    } else if case.is_claim() {
        FormType::Minimal
    } else {
        FormType::Standard
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_gift_card_always_full() {
        assert_eq!(determine_form_type(LandingCase::D, 1.0, 10.0), FormType::Full);
        assert_eq!(determine_form_type(LandingCase::D, 0.0, 10.0), FormType::Full);
    }

    #[test]
    fn test_threshold_is_inclusive() {
        assert_eq!(determine_form_type(LandingCase::A, 10.0, 10.0), FormType::Full);
        assert_eq!(determine_form_type(LandingCase::F, 9.99, 10.0), FormType::Standard);
    }

    #[test]
    fn test_claims_below_threshold_are_minimal() {
        assert_eq!(determine_form_type(LandingCase::A, 1.0, 10.0), FormType::Minimal);
        assert_eq!(determine_form_type(LandingCase::B, 9.0, 10.0), FormType::Minimal);
    }

    #[test]
    fn test_other_cases_are_standard() {
        for case in [LandingCase::C, LandingCase::E, LandingCase::F, LandingCase::Admin] {
            assert_eq!(determine_form_type(case, 1.0, 10.0), FormType::Standard);
        }
    }
}
