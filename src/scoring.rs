//! Cardiometabolic risk score.
//!
//! Nine independent threshold rules, each adding a fixed weight. Weights are
//! kept in hundredths so the sum is exact and the level bands are not
//! subject to float accumulation (0.15 + 0.15 + 0.1 * 4 must be 0.70).
//!
//! The model is a placeholder simulation, not a validated clinical score.

use crate::models::{ActivityLevel, PatientMetrics, RiskAssessment, RiskLevel};

pub const REC_EXERCISE: &str = "Hacer ejercicio regularmente";
pub const REC_DIET: &str = "Mantener una dieta saludable";
pub const REC_CHECKUPS: &str = "Realizar chequeos médicos frecuentes";
pub const REC_CARDIOLOGIST: &str = "Consultar a un cardiólogo";
pub const REC_QUIT_SMOKING: &str = "Dejar de fumar";

/// A single additive rule.
pub struct RiskRule {
    pub name: &'static str,
    /// Contribution in hundredths of the score.
    pub points: u32,
    pub applies: fn(&PatientMetrics) -> bool,
}

pub static RULES: [RiskRule; 9] = [
    RiskRule { name: "age_over_50", points: 10, applies: |m| m.age > 50 },
    RiskRule { name: "bmi_over_30", points: 10, applies: |m| m.bmi > 30.0 },
    RiskRule { name: "glucose_over_120", points: 15, applies: |m| m.glucose > 120 },
    RiskRule { name: "bp_over_140", points: 10, applies: |m| m.bp > 140 },
    RiskRule { name: "hdl_under_40", points: 10, applies: |m| m.hdl < 40 },
    RiskRule { name: "ldl_over_160", points: 10, applies: |m| m.ldl > 160 },
    RiskRule { name: "smoking", points: 10, applies: |m| m.smoking },
    RiskRule {
        name: "low_activity",
        points: 10,
        applies: |m| m.activity_level == ActivityLevel::Low,
    },
    RiskRule { name: "family_history", points: 15, applies: |m| m.family_history },
];

/// Names of the rules that fire for these metrics, in table order.
pub fn triggered_rules(metrics: &PatientMetrics) -> Vec<&'static str> {
    RULES
        .iter()
        .filter(|rule| (rule.applies)(metrics))
        .map(|rule| rule.name)
        .collect()
}

/// Score a submission. Pure and total.
pub fn score(metrics: &PatientMetrics) -> RiskAssessment {
    let points: u32 = RULES
        .iter()
        .filter(|rule| (rule.applies)(metrics))
        .map(|rule| rule.points)
        .sum();

    let risk_score = (f64::from(points) / 100.0).clamp(0.0, 1.0);
    let level = RiskLevel::from_score(risk_score);

    let mut recommendations: Vec<String> = [REC_EXERCISE, REC_DIET, REC_CHECKUPS]
        .iter()
        .map(|s| s.to_string())
        .collect();
    if level == RiskLevel::High {
        recommendations.push(REC_CARDIOLOGIST.to_string());
    }
    if metrics.smoking {
        recommendations.push(REC_QUIT_SMOKING.to_string());
    }

    RiskAssessment {
        risk_score,
        level,
        recommendations,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn healthy() -> PatientMetrics {
        PatientMetrics {
            age: 30,
            bmi: 22.0,
            glucose: 90,
            bp: 110,
            hdl: 55,
            ldl: 100,
            smoking: false,
            activity_level: ActivityLevel::High,
            family_history: false,
        }
    }

    fn worst() -> PatientMetrics {
        PatientMetrics {
            age: 60,
            bmi: 32.0,
            glucose: 130,
            bp: 150,
            hdl: 35,
            ldl: 170,
            smoking: true,
            activity_level: ActivityLevel::Low,
            family_history: true,
        }
    }

    #[test]
    fn weights_total_one() {
        let total: u32 = RULES.iter().map(|r| r.points).sum();
        assert_eq!(total, 100);
    }

    #[test]
    fn all_factors_present_is_high_with_every_recommendation() {
        let result = score(&worst());
        assert_eq!(result.risk_score, 1.0);
        assert_eq!(result.level, RiskLevel::High);
        assert_eq!(
            result.recommendations,
            vec![REC_EXERCISE, REC_DIET, REC_CHECKUPS, REC_CARDIOLOGIST, REC_QUIT_SMOKING]
        );
        assert_eq!(triggered_rules(&worst()).len(), 9);
    }

    #[test]
    fn healthy_values_score_zero() {
        let result = score(&healthy());
        assert_eq!(result.risk_score, 0.0);
        assert_eq!(result.level, RiskLevel::Low);
        assert_eq!(result.recommendations, vec![REC_EXERCISE, REC_DIET, REC_CHECKUPS]);
        assert!(triggered_rules(&healthy()).is_empty());
    }

    #[test]
    fn thresholds_are_strict() {
        let mut m = healthy();
        m.age = 50;
        m.bmi = 30.0;
        m.glucose = 120;
        m.bp = 140;
        m.hdl = 40;
        m.ldl = 160;
        assert_eq!(score(&m).risk_score, 0.0);

        m.age = 51;
        assert!((score(&m).risk_score - 0.10).abs() < 1e-12);
        m.glucose = 121;
        assert!((score(&m).risk_score - 0.25).abs() < 1e-12);
    }

    #[test]
    fn medium_activity_adds_nothing() {
        let mut m = healthy();
        m.activity_level = ActivityLevel::Medium;
        assert_eq!(score(&m).risk_score, 0.0);
        m.activity_level = ActivityLevel::Low;
        assert!((score(&m).risk_score - 0.10).abs() < 1e-12);
    }

    #[test]
    fn exactly_seventy_is_high() {
        // 0.15 + 0.15 + 0.10 * 4
        let mut m = healthy();
        m.glucose = 200;
        m.family_history = true;
        m.age = 70;
        m.bmi = 35.0;
        m.bp = 160;
        m.hdl = 30;
        let result = score(&m);
        assert_eq!(result.risk_score, 0.70);
        assert_eq!(result.level, RiskLevel::High);
        assert!(result.recommendations.contains(&REC_CARDIOLOGIST.to_string()));
        assert!(!result.recommendations.contains(&REC_QUIT_SMOKING.to_string()));
    }

    #[test]
    fn exactly_forty_is_moderate() {
        let mut m = healthy();
        m.age = 55;
        m.bmi = 31.0;
        m.bp = 145;
        m.hdl = 39;
        let result = score(&m);
        assert_eq!(result.risk_score, 0.40);
        assert_eq!(result.level, RiskLevel::Moderate);
        assert_eq!(result.recommendations.len(), 3);
    }

    #[test]
    fn smoker_at_low_risk_gets_quit_advice_only() {
        let mut m = healthy();
        m.smoking = true;
        let result = score(&m);
        assert_eq!(result.level, RiskLevel::Low);
        assert_eq!(
            result.recommendations,
            vec![REC_EXERCISE, REC_DIET, REC_CHECKUPS, REC_QUIT_SMOKING]
        );
    }

    #[test]
    fn every_subset_stays_in_range_and_level_matches_score() {
        let base = healthy();
        let flips: [fn(&mut PatientMetrics); 9] = [
            |m| m.age = 80,
            |m| m.bmi = 40.0,
            |m| m.glucose = 180,
            |m| m.bp = 170,
            |m| m.hdl = 20,
            |m| m.ldl = 200,
            |m| m.smoking = true,
            |m| m.activity_level = ActivityLevel::Low,
            |m| m.family_history = true,
        ];
        for mask in 0u32..(1 << flips.len()) {
            let mut m = base.clone();
            for (i, flip) in flips.iter().enumerate() {
                if mask & (1 << i) != 0 {
                    flip(&mut m);
                }
            }
            let result = score(&m);
            assert!((0.0..=1.0).contains(&result.risk_score));
            let expected = if result.risk_score >= 0.70 {
                RiskLevel::High
            } else if result.risk_score >= 0.40 {
                RiskLevel::Moderate
            } else {
                RiskLevel::Low
            };
            assert_eq!(result.level, expected, "mask {mask:#b}");
            assert_eq!(
                result.recommendations.iter().filter(|r| *r == REC_CARDIOLOGIST).count(),
                usize::from(result.level == RiskLevel::High)
            );
            assert_eq!(
                result.recommendations.iter().filter(|r| *r == REC_QUIT_SMOKING).count(),
                usize::from(m.smoking)
            );
        }
    }
}
