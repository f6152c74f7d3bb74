//! Case domain types: case type, lifecycle status, and decision outcomes.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Error raised when a stored case-type code is not one of the known variants.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("Unsupported case type: {0}")]
pub struct UnsupportedCaseType(pub String);

/// Settlement modality of a case (processo).
///
/// The type is immutable after creation and drives which agreement detail
/// sub-record and which value formulas apply.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum CaseType {
    /// Offsetting tax credits against tax debits (compensação).
    #[serde(rename = "COMPENSATION")]
    Compensation,
    /// Property offered against tax debits (dação em pagamento).
    #[serde(rename = "DACAO_PAGAMENTO")]
    Dacao,
    /// Negotiated discount/installment proposal (transação excepcional).
    #[serde(rename = "EXCEPTIONAL_TRANSACTION")]
    ExceptionalTransaction,
}

impl CaseType {
    /// All case types, in display order.
    pub const ALL: [Self; 3] = [Self::Compensation, Self::Dacao, Self::ExceptionalTransaction];

    /// Returns the stable storage code for this case type.
    #[must_use]
    pub const fn code(self) -> &'static str {
        match self {
            Self::Compensation => "COMPENSATION",
            Self::Dacao => "DACAO_PAGAMENTO",
            Self::ExceptionalTransaction => "EXCEPTIONAL_TRANSACTION",
        }
    }

    /// Returns the display label for this case type.
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::Compensation => "Compensação",
            Self::Dacao => "Dação em Pagamento",
            Self::ExceptionalTransaction => "Transação Excepcional",
        }
    }
}

impl std::fmt::Display for CaseType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.code())
    }
}

impl std::str::FromStr for CaseType {
    type Err = UnsupportedCaseType;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "COMPENSATION" => Ok(Self::Compensation),
            "DACAO_PAGAMENTO" => Ok(Self::Dacao),
            "EXCEPTIONAL_TRANSACTION" => Ok(Self::ExceptionalTransaction),
            other => Err(UnsupportedCaseType(other.to_string())),
        }
    }
}

/// Lifecycle status of a case.
///
/// Transitions progress monotonically forward, except that a suspended case
/// loops back to scheduling.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CaseStatus {
    /// Received at intake (protocolado).
    Intake,
    /// Under technical analysis.
    UnderAnalysis,
    /// Included in a docket for a judgment session.
    Scheduled,
    /// Judged by the board.
    Judged,
    /// A payment agreement is in effect.
    AgreementInEffect,
    /// Suspended pending revision; returns to scheduling.
    Suspended,
    /// Concluded.
    Concluded,
    /// Archived.
    Archived,
}

impl CaseStatus {
    /// Position of this status in the forward lifecycle.
    const fn rank(self) -> u8 {
        match self {
            Self::Intake => 0,
            Self::UnderAnalysis => 1,
            Self::Scheduled | Self::Suspended => 2,
            Self::Judged => 3,
            Self::AgreementInEffect => 4,
            Self::Concluded => 5,
            Self::Archived => 6,
        }
    }

    /// Returns true if the transition from `self` to `next` is allowed.
    ///
    /// Forward moves are always allowed; the only backward move is
    /// `Suspended` back to `Scheduled`. A scheduled or judged case may be
    /// suspended.
    #[must_use]
    pub fn can_transition_to(self, next: Self) -> bool {
        match (self, next) {
            // A suspended case only resumes through scheduling.
            (Self::Suspended, to) => to == Self::Scheduled,
            // Suspension is only reachable once the case is on a docket.
            (from, Self::Suspended) => matches!(from, Self::Scheduled | Self::Judged),
            (from, to) => to.rank() > from.rank(),
        }
    }

    /// Returns true if the case no longer moves forward.
    #[must_use]
    pub fn is_terminal(self) -> bool {
        matches!(self, Self::Archived)
    }

    /// Returns the display label for this status.
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::Intake => "Protocolado",
            Self::UnderAnalysis => "Em Análise",
            Self::Scheduled => "Pautado",
            Self::Judged => "Julgado",
            Self::AgreementInEffect => "Acordo em Cumprimento",
            Self::Suspended => "Suspenso",
            Self::Concluded => "Concluído",
            Self::Archived => "Arquivado",
        }
    }

    /// Returns the display color token for this status.
    #[must_use]
    pub const fn color(self) -> &'static str {
        match self {
            Self::Intake => "gray",
            Self::UnderAnalysis => "blue",
            Self::Scheduled => "indigo",
            Self::Judged => "purple",
            Self::AgreementInEffect => "amber",
            Self::Suspended => "red",
            Self::Concluded => "green",
            Self::Archived => "slate",
        }
    }
}

/// Outcome of a board decision on a case.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DecisionOutcome {
    /// Fully granted (deferido).
    Granted,
    /// Partially granted (parcialmente deferido).
    PartiallyGranted,
    /// Denied (indeferido).
    Denied,
}

impl DecisionOutcome {
    /// All outcomes, in display order.
    pub const ALL: [Self; 3] = [Self::Granted, Self::PartiallyGranted, Self::Denied];

    /// Returns true if a case with this latest outcome is agreement-eligible.
    #[must_use]
    pub const fn allows_agreement(self) -> bool {
        matches!(self, Self::Granted | Self::PartiallyGranted)
    }

    /// Returns the display label for this outcome.
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::Granted => "Deferido",
            Self::PartiallyGranted => "Parcialmente Deferido",
            Self::Denied => "Indeferido",
        }
    }

    /// Returns the display color token for this outcome.
    #[must_use]
    pub const fn color(self) -> &'static str {
        match self {
            Self::Granted => "green",
            Self::PartiallyGranted => "amber",
            Self::Denied => "red",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;

    #[test]
    fn test_case_type_round_trip() {
        for case_type in CaseType::ALL {
            assert_eq!(CaseType::from_str(case_type.code()).unwrap(), case_type);
        }
    }

    #[test]
    fn test_case_type_unknown_code() {
        let err = CaseType::from_str("REFIS").unwrap_err();
        assert_eq!(err, UnsupportedCaseType("REFIS".to_string()));
    }

    #[test]
    fn test_forward_transitions_allowed() {
        assert!(CaseStatus::Intake.can_transition_to(CaseStatus::UnderAnalysis));
        assert!(CaseStatus::UnderAnalysis.can_transition_to(CaseStatus::Scheduled));
        assert!(CaseStatus::Scheduled.can_transition_to(CaseStatus::Judged));
        assert!(CaseStatus::Judged.can_transition_to(CaseStatus::AgreementInEffect));
        assert!(CaseStatus::AgreementInEffect.can_transition_to(CaseStatus::Concluded));
        assert!(CaseStatus::Concluded.can_transition_to(CaseStatus::Archived));
        // Skipping intermediate states is still forward.
        assert!(CaseStatus::Judged.can_transition_to(CaseStatus::Concluded));
    }

    #[test]
    fn test_backward_transitions_rejected() {
        assert!(!CaseStatus::Judged.can_transition_to(CaseStatus::Scheduled));
        assert!(!CaseStatus::Concluded.can_transition_to(CaseStatus::Intake));
        assert!(!CaseStatus::Archived.can_transition_to(CaseStatus::Concluded));
    }

    #[test]
    fn test_suspension_loops_back_to_scheduling() {
        assert!(CaseStatus::Scheduled.can_transition_to(CaseStatus::Suspended));
        assert!(CaseStatus::Judged.can_transition_to(CaseStatus::Suspended));
        assert!(CaseStatus::Suspended.can_transition_to(CaseStatus::Scheduled));

        assert!(!CaseStatus::Intake.can_transition_to(CaseStatus::Suspended));
        assert!(!CaseStatus::Concluded.can_transition_to(CaseStatus::Suspended));
        assert!(!CaseStatus::Suspended.can_transition_to(CaseStatus::Intake));
        assert!(!CaseStatus::Suspended.can_transition_to(CaseStatus::Concluded));
    }

    #[test]
    fn test_outcome_agreement_eligibility() {
        assert!(DecisionOutcome::Granted.allows_agreement());
        assert!(DecisionOutcome::PartiallyGranted.allows_agreement());
        assert!(!DecisionOutcome::Denied.allows_agreement());
    }

    #[test]
    fn test_labels_are_stable() {
        assert_eq!(CaseType::Dacao.label(), "Dação em Pagamento");
        assert_eq!(CaseStatus::UnderAnalysis.label(), "Em Análise");
        assert_eq!(DecisionOutcome::Denied.label(), "Indeferido");
        assert_eq!(DecisionOutcome::Denied.color(), "red");
    }
}
