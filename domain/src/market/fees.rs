//! Consultation-fee sizing.
//!
//! Each participating agent earns a token credit at consultation start:
//! `base_fee x complexity_multiplier x performance_multiplier`. Complexity
//! comes from the case picture; the performance multiplier rewards agents
//! with historically higher accuracy.

use crate::core::CaseInput;
use crate::market::performance::AgentPerformanceRecord;

/// Compute the consultation fee for one agent.
///
/// Agents with no performance history earn the neutral multiplier.
pub fn consultation_fee(
    base_fee: u64,
    case: &CaseInput,
    performance: Option<&AgentPerformanceRecord>,
) -> u64 {
    let performance_multiplier = performance
        .map(AgentPerformanceRecord::performance_multiplier)
        .unwrap_or(1.0);

    (base_fee as f64 * case.complexity_multiplier() * performance_multiplier).round() as u64
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::market::resolution::AgentSettlement;

    #[test]
    fn test_simple_case_pays_base_fee() {
        let case = CaseInput::new("mild strain", 1, 1);
        assert_eq!(consultation_fee(10, &case, None), 10);
    }

    #[test]
    fn test_complex_case_scales_fee() {
        let case = CaseInput::new("chronic pain", 9, 52)
            .with_comorbidities(vec!["diabetes".into(), "copd".into(), "obesity".into()]);
        // complexity 1.0 + 0.4 + 0.3 + 0.5 = 2.2
        assert_eq!(consultation_fee(10, &case, None), 22);
    }

    #[test]
    fn test_accurate_agent_earns_more() {
        let case = CaseInput::new("mild strain", 1, 1);
        let mut record = AgentPerformanceRecord::new("pain-1".into());
        record.record_settlement(&AgentSettlement {
            agent_id: "pain-1".into(),
            dimension_accuracy: vec![],
            accuracy: 1.0,
            tokens_won: 10,
            tokens_lost: 0,
            net_change: 10,
        });

        assert_eq!(consultation_fee(10, &case, Some(&record)), 15);
    }
}
