use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::{
    ContributionRule, ContributionTier, CreditAmount, CreditRule, InsuranceConfig,
    PensionPlanConfig, TaxBracket, TaxSchedule,
};

/// Errors found while validating a [`JurisdictionConfig`].
///
/// These are configuration mistakes, reported once when the configuration is
/// loaded or the engine is built. The calculators assume a valid config.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum JurisdictionConfigError {
    #[error("{schedule} schedule has no brackets")]
    EmptySchedule { schedule: String },

    #[error("{schedule} schedule must start at 0, first bracket starts at {found}")]
    FirstBracketNotAtZero { schedule: String, found: Decimal },

    #[error("{schedule} bracket {index} starts at {found}, expected {expected}")]
    NonContiguousBracket {
        schedule: String,
        index: usize,
        expected: Decimal,
        found: Decimal,
    },

    #[error("{schedule} bracket {index} has upper bound {max} not above lower bound {min}")]
    InvertedBracket {
        schedule: String,
        index: usize,
        min: Decimal,
        max: Decimal,
    },

    #[error("{schedule} bracket {index} is unbounded but is not the last bracket")]
    UnboundedBracketNotLast { schedule: String, index: usize },

    #[error("{schedule} schedule has no unbounded top bracket")]
    MissingTopBracket { schedule: String },

    #[error("{field} must be between 0 and 1, got {value}")]
    InvalidRate { field: String, value: Decimal },

    #[error("{field} must be non-negative, got {value}")]
    NegativeAmount { field: String, value: Decimal },

    #[error("credit '{label}' phase-out must end after it starts and not raise the amount")]
    InvalidPhaseOut { label: String },

    #[error("{rule} {tier} tier ceiling {ceiling} is below its floor {floor}")]
    InvertedTier {
        rule: &'static str,
        tier: &'static str,
        floor: Decimal,
        ceiling: Decimal,
    },

    #[error("{rule} additional tier floor {found} must equal the base tier ceiling {expected}")]
    TierMismatch {
        rule: &'static str,
        expected: Decimal,
        found: Decimal,
    },
}

/// Every constant the engine needs for one jurisdiction and taxation year.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct JurisdictionConfig {
    pub tax_year: i32,
    /// Name of the regional authority, e.g. "Manitoba".
    pub name: String,
    /// Flat corporate rate on active business income.
    pub small_business_rate: Decimal,
    pub federal: TaxSchedule,
    pub provincial: TaxSchedule,
    pub pension: PensionPlanConfig,
    pub insurance: InsuranceConfig,
}

impl Default for JurisdictionConfig {
    fn default() -> Self {
        Self::manitoba_2024()
    }
}

impl JurisdictionConfig {
    /// Federal and Manitoba rules for the 2024 taxation year.
    pub fn manitoba_2024() -> Self {
        let cpp_credit_amount = dec!(3217.50);

        let federal = TaxSchedule::new(
            "Federal",
            vec![
                TaxBracket::new(dec!(0), Some(dec!(55867)), dec!(0.15)),
                TaxBracket::new(dec!(55867), Some(dec!(111733)), dec!(0.205)),
                TaxBracket::new(dec!(111733), Some(dec!(173205)), dec!(0.26)),
                TaxBracket::new(dec!(173205), Some(dec!(246752)), dec!(0.29)),
                TaxBracket::new(dec!(246752), None, dec!(0.33)),
            ],
            vec![
                CreditRule {
                    label: "Federal basic personal amount credit".to_string(),
                    amount: CreditAmount::PhasedOut {
                        max_amount: dec!(15705),
                        min_amount: dec!(14156),
                        phase_out_start: dec!(173205),
                        phase_out_end: dec!(246752),
                    },
                    rate: dec!(0.15),
                    eligibility: Default::default(),
                },
                CreditRule::fixed("Canada employment amount credit", dec!(1433), dec!(0.15))
                    .employees_only(),
                CreditRule::fixed("CPP base contributions credit", cpp_credit_amount, dec!(0.15)),
            ],
        );

        let provincial = TaxSchedule::new(
            "Manitoba",
            vec![
                TaxBracket::new(dec!(0), Some(dec!(47000)), dec!(0.108)),
                TaxBracket::new(dec!(47000), Some(dec!(100000)), dec!(0.1275)),
                TaxBracket::new(dec!(100000), None, dec!(0.174)),
            ],
            vec![
                CreditRule::fixed(
                    "Manitoba basic personal amount credit",
                    dec!(15000),
                    dec!(0.108),
                ),
                CreditRule::fixed("CPP base contributions credit", cpp_credit_amount, dec!(0.108)),
            ],
        );

        let pension = PensionPlanConfig {
            employee: ContributionRule {
                base: ContributionTier {
                    floor: dec!(3500),
                    ceiling: dec!(68500),
                    rate: dec!(0.0595),
                    max_contribution: dec!(3867.50),
                },
                additional: ContributionTier {
                    floor: dec!(68500),
                    ceiling: dec!(73200),
                    rate: dec!(0.04),
                    max_contribution: dec!(188.00),
                },
                employer_share_deduction: dec!(0),
            },
            self_employed: ContributionRule {
                base: ContributionTier {
                    floor: dec!(3500),
                    ceiling: dec!(68500),
                    rate: dec!(0.119),
                    max_contribution: dec!(7735.00),
                },
                additional: ContributionTier {
                    floor: dec!(68500),
                    ceiling: dec!(73200),
                    rate: dec!(0.08),
                    max_contribution: dec!(376.00),
                },
                employer_share_deduction: dec!(0.5),
            },
            enhanced_deduction: dec!(838.00),
        };

        Self {
            tax_year: 2024,
            name: "Manitoba".to_string(),
            federal,
            provincial,
            pension,
            insurance: InsuranceConfig {
                rate: dec!(0.0166),
                max_premium: dec!(1049.12),
            },
            small_business_rate: dec!(0.11),
        }
    }

    /// Checks every schedule, credit and contribution rule.
    ///
    /// # Errors
    ///
    /// Returns the first [`JurisdictionConfigError`] found. Bracket tables
    /// must be a contiguous ascending partition of `[0, ∞)` ending in one
    /// unbounded bracket; rates must lie in `[0, 1]`; amounts must be
    /// non-negative; the additional pension tier must start where the base
    /// tier ends.
    pub fn validate(&self) -> Result<(), JurisdictionConfigError> {
        validate_schedule(&self.federal)?;
        validate_schedule(&self.provincial)?;
        validate_contribution_rule("employee", &self.pension.employee)?;
        validate_contribution_rule("self_employed", &self.pension.self_employed)?;
        non_negative("pension.enhanced_deduction", self.pension.enhanced_deduction)?;
        rate("insurance.rate", self.insurance.rate)?;
        non_negative("insurance.max_premium", self.insurance.max_premium)?;
        rate("small_business_rate", self.small_business_rate)?;
        Ok(())
    }
}

fn rate(
    field: &str,
    value: Decimal,
) -> Result<(), JurisdictionConfigError> {
    if value < Decimal::ZERO || value > Decimal::ONE {
        return Err(JurisdictionConfigError::InvalidRate {
            field: field.to_string(),
            value,
        });
    }
    Ok(())
}

fn non_negative(
    field: &str,
    value: Decimal,
) -> Result<(), JurisdictionConfigError> {
    if value < Decimal::ZERO {
        return Err(JurisdictionConfigError::NegativeAmount {
            field: field.to_string(),
            value,
        });
    }
    Ok(())
}

fn validate_schedule(schedule: &TaxSchedule) -> Result<(), JurisdictionConfigError> {
    let name = &schedule.name;
    let first = schedule
        .brackets
        .first()
        .ok_or_else(|| JurisdictionConfigError::EmptySchedule {
            schedule: name.clone(),
        })?;

    if first.min_income != Decimal::ZERO {
        return Err(JurisdictionConfigError::FirstBracketNotAtZero {
            schedule: name.clone(),
            found: first.min_income,
        });
    }

    let last_index = schedule.brackets.len() - 1;
    let mut expected_min = Decimal::ZERO;

    for (index, bracket) in schedule.brackets.iter().enumerate() {
        if bracket.min_income != expected_min {
            return Err(JurisdictionConfigError::NonContiguousBracket {
                schedule: name.clone(),
                index,
                expected: expected_min,
                found: bracket.min_income,
            });
        }
        rate(&format!("{name} bracket {index} rate"), bracket.tax_rate)?;

        match bracket.max_income {
            Some(max) if max <= bracket.min_income => {
                return Err(JurisdictionConfigError::InvertedBracket {
                    schedule: name.clone(),
                    index,
                    min: bracket.min_income,
                    max,
                });
            }
            Some(_) if index == last_index => {
                return Err(JurisdictionConfigError::MissingTopBracket {
                    schedule: name.clone(),
                });
            }
            Some(max) => expected_min = max,
            None if index != last_index => {
                return Err(JurisdictionConfigError::UnboundedBracketNotLast {
                    schedule: name.clone(),
                    index,
                });
            }
            None => {}
        }
    }

    for credit in &schedule.credits {
        validate_credit(credit)?;
    }

    Ok(())
}

fn validate_credit(credit: &CreditRule) -> Result<(), JurisdictionConfigError> {
    rate(&format!("credit '{}' rate", credit.label), credit.rate)?;

    match credit.amount {
        CreditAmount::Fixed { amount } => {
            non_negative(&format!("credit '{}' amount", credit.label), amount)
        }
        CreditAmount::PhasedOut {
            max_amount,
            min_amount,
            phase_out_start,
            phase_out_end,
        } => {
            non_negative(&format!("credit '{}' min_amount", credit.label), min_amount)?;
            if phase_out_end <= phase_out_start || min_amount > max_amount {
                return Err(JurisdictionConfigError::InvalidPhaseOut {
                    label: credit.label.clone(),
                });
            }
            Ok(())
        }
    }
}

fn validate_tier(
    rule: &'static str,
    tier_name: &'static str,
    tier: &ContributionTier,
) -> Result<(), JurisdictionConfigError> {
    non_negative(&format!("{rule} {tier_name} tier floor"), tier.floor)?;
    if tier.ceiling < tier.floor {
        return Err(JurisdictionConfigError::InvertedTier {
            rule,
            tier: tier_name,
            floor: tier.floor,
            ceiling: tier.ceiling,
        });
    }
    rate(&format!("{rule} {tier_name} tier rate"), tier.rate)?;
    non_negative(
        &format!("{rule} {tier_name} tier max_contribution"),
        tier.max_contribution,
    )
}

fn validate_contribution_rule(
    name: &'static str,
    rule: &ContributionRule,
) -> Result<(), JurisdictionConfigError> {
    validate_tier(name, "base", &rule.base)?;
    validate_tier(name, "additional", &rule.additional)?;
    if rule.additional.floor != rule.base.ceiling {
        return Err(JurisdictionConfigError::TierMismatch {
            rule: name,
            expected: rule.base.ceiling,
            found: rule.additional.floor,
        });
    }
    rate(
        &format!("{name} employer_share_deduction"),
        rule.employer_share_deduction,
    )
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    #[test]
    fn validate_accepts_manitoba_2024() {
        let config = JurisdictionConfig::manitoba_2024();

        assert_eq!(config.validate(), Ok(()));
    }

    #[test]
    fn self_employed_rule_doubles_employee_rule() {
        let pension = JurisdictionConfig::manitoba_2024().pension;

        assert_eq!(pension.self_employed.base.rate, pension.employee.base.rate * dec!(2));
        assert_eq!(
            pension.self_employed.max_total(),
            pension.employee.max_total() * dec!(2)
        );
    }

    #[test]
    fn validate_rejects_empty_schedule() {
        let mut config = JurisdictionConfig::manitoba_2024();
        config.provincial.brackets.clear();

        assert_eq!(
            config.validate(),
            Err(JurisdictionConfigError::EmptySchedule {
                schedule: "Manitoba".to_string()
            })
        );
    }

    #[test]
    fn validate_rejects_schedule_not_starting_at_zero() {
        let mut config = JurisdictionConfig::manitoba_2024();
        config.federal.brackets[0].min_income = dec!(100);

        assert_eq!(
            config.validate(),
            Err(JurisdictionConfigError::FirstBracketNotAtZero {
                schedule: "Federal".to_string(),
                found: dec!(100),
            })
        );
    }

    #[test]
    fn validate_rejects_gap_between_brackets() {
        let mut config = JurisdictionConfig::manitoba_2024();
        config.provincial.brackets[1].min_income = dec!(48000);

        assert_eq!(
            config.validate(),
            Err(JurisdictionConfigError::NonContiguousBracket {
                schedule: "Manitoba".to_string(),
                index: 1,
                expected: dec!(47000),
                found: dec!(48000),
            })
        );
    }

    #[test]
    fn validate_rejects_overlapping_brackets() {
        let mut config = JurisdictionConfig::manitoba_2024();
        config.provincial.brackets[1].min_income = dec!(40000);

        assert!(matches!(
            config.validate(),
            Err(JurisdictionConfigError::NonContiguousBracket { index: 1, .. })
        ));
    }

    #[test]
    fn validate_rejects_inverted_bracket() {
        let mut config = JurisdictionConfig::manitoba_2024();
        config.provincial.brackets[0].max_income = Some(dec!(0));

        assert!(matches!(
            config.validate(),
            Err(JurisdictionConfigError::InvertedBracket { index: 0, .. })
        ));
    }

    #[test]
    fn validate_rejects_unbounded_bracket_in_middle() {
        let mut config = JurisdictionConfig::manitoba_2024();
        config.provincial.brackets[1].max_income = None;

        assert_eq!(
            config.validate(),
            Err(JurisdictionConfigError::UnboundedBracketNotLast {
                schedule: "Manitoba".to_string(),
                index: 1,
            })
        );
    }

    #[test]
    fn validate_rejects_bounded_top_bracket() {
        let mut config = JurisdictionConfig::manitoba_2024();
        config.provincial.brackets[2].max_income = Some(dec!(500000));

        assert_eq!(
            config.validate(),
            Err(JurisdictionConfigError::MissingTopBracket {
                schedule: "Manitoba".to_string()
            })
        );
    }

    #[test]
    fn validate_rejects_rate_above_one() {
        let mut config = JurisdictionConfig::manitoba_2024();
        config.small_business_rate = dec!(1.1);

        assert_eq!(
            config.validate(),
            Err(JurisdictionConfigError::InvalidRate {
                field: "small_business_rate".to_string(),
                value: dec!(1.1),
            })
        );
    }

    #[test]
    fn validate_rejects_inverted_phase_out() {
        let mut config = JurisdictionConfig::manitoba_2024();
        config.federal.credits[0].amount = CreditAmount::PhasedOut {
            max_amount: dec!(15705),
            min_amount: dec!(14156),
            phase_out_start: dec!(246752),
            phase_out_end: dec!(173205),
        };

        assert_eq!(
            config.validate(),
            Err(JurisdictionConfigError::InvalidPhaseOut {
                label: "Federal basic personal amount credit".to_string()
            })
        );
    }

    #[test]
    fn validate_rejects_tier_mismatch() {
        let mut config = JurisdictionConfig::manitoba_2024();
        config.pension.self_employed.additional.floor = dec!(70000);

        assert_eq!(
            config.validate(),
            Err(JurisdictionConfigError::TierMismatch {
                rule: "self_employed",
                expected: dec!(68500),
                found: dec!(70000),
            })
        );
    }

    #[test]
    fn validate_rejects_negative_insurance_cap() {
        let mut config = JurisdictionConfig::manitoba_2024();
        config.insurance.max_premium = dec!(-1);

        assert_eq!(
            config.validate(),
            Err(JurisdictionConfigError::NegativeAmount {
                field: "insurance.max_premium".to_string(),
                value: dec!(-1),
            })
        );
    }
}
