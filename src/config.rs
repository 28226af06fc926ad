use serde::{Deserialize, Serialize};

use crate::errors::{LedgerError, Result};

/// ledger configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LedgerConfig {
    pub overpayment: OverpaymentPolicy,
    pub currency: CurrencyPolicy,
    pub allocation_scope: AllocationScope,
    #[serde(default = "default_card_validity_years")]
    pub card_validity_years: u32,
}

/// what to do with a repayment larger than the loan's outstanding balance
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OverpaymentPolicy {
    /// refuse the repayment, nothing is recorded
    Reject,
    /// record it and let the loan's outstanding amount go negative
    AllowNegative,
}

/// whether a repayment must be in the loan's currency
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CurrencyPolicy {
    RequireLoanCurrency,
    /// accept any currency without conversion
    Permissive,
}

/// which installments a repayment may be allocated to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AllocationScope {
    /// due and partially paid installments
    Outstanding,
    /// only installments with nothing paid yet
    DueOnly,
}

fn default_card_validity_years() -> u32 {
    1
}

impl LedgerConfig {
    /// guarded configuration: keeps installment and loan balances in step
    pub fn strict() -> Self {
        Self {
            overpayment: OverpaymentPolicy::Reject,
            currency: CurrencyPolicy::RequireLoanCurrency,
            allocation_scope: AllocationScope::Outstanding,
            card_validity_years: default_card_validity_years(),
        }
    }

    /// unguarded configuration matching the legacy back office behavior
    ///
    /// Overpayments drive the loan negative, currencies are not compared, and
    /// partially paid installments are skipped by later repayments.
    pub fn permissive() -> Self {
        Self {
            overpayment: OverpaymentPolicy::AllowNegative,
            currency: CurrencyPolicy::Permissive,
            allocation_scope: AllocationScope::DueOnly,
            card_validity_years: default_card_validity_years(),
        }
    }

    /// parse configuration from json
    pub fn from_json(json: &str) -> Result<Self> {
        let config: LedgerConfig = serde_json::from_str(json).map_err(|e| {
            LedgerError::InvalidConfiguration {
                message: e.to_string(),
            }
        })?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<()> {
        if self.card_validity_years == 0 {
            return Err(LedgerError::InvalidConfiguration {
                message: "card_validity_years must be at least 1".to_string(),
            });
        }
        Ok(())
    }
}

impl Default for LedgerConfig {
    fn default() -> Self {
        Self::strict()
    }
}
