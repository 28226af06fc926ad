use chrono::{DateTime, NaiveDate, Utc};
use rand::Rng;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::money::{CurrencyCode, Money};
use crate::types::{CardId, CardTransactionId, CustomerId};

/// a customer's debit card
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DebitCard {
    pub id: CardId,
    pub owner_id: CustomerId,
    pub number: String,
    /// card network, e.g. "Visa"
    #[serde(rename = "type")]
    pub card_type: String,
    pub expiration_date: NaiveDate,
    pub disabled_at: Option<DateTime<Utc>>,
    pub deleted_at: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl DebitCard {
    pub fn new(
        owner_id: CustomerId,
        card_type: String,
        expiration_date: NaiveDate,
        now: DateTime<Utc>,
    ) -> Self {
        Self {
            id: Uuid::new_v4(),
            owner_id,
            number: generate_card_number(),
            card_type,
            expiration_date,
            disabled_at: None,
            deleted_at: None,
            created_at: now,
            updated_at: now,
        }
    }

    pub fn is_active(&self) -> bool {
        self.disabled_at.is_none()
    }

    pub fn is_deleted(&self) -> bool {
        self.deleted_at.is_some()
    }

    pub fn activate(&mut self, now: DateTime<Utc>) {
        self.disabled_at = None;
        self.updated_at = now;
    }

    pub fn deactivate(&mut self, now: DateTime<Utc>) {
        self.disabled_at = Some(now);
        self.updated_at = now;
    }

    /// soft delete
    pub fn delete(&mut self, now: DateTime<Utc>) {
        self.deleted_at = Some(now);
        self.updated_at = now;
    }
}

/// a spend recorded against a debit card
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DebitCardTransaction {
    pub id: CardTransactionId,
    pub debit_card_id: CardId,
    pub amount: Money,
    pub currency_code: CurrencyCode,
    pub created_at: DateTime<Utc>,
}

impl DebitCardTransaction {
    pub fn new(
        debit_card_id: CardId,
        amount: Money,
        currency_code: CurrencyCode,
        now: DateTime<Utc>,
    ) -> Self {
        Self {
            id: Uuid::new_v4(),
            debit_card_id,
            amount,
            currency_code,
            created_at: now,
        }
    }
}

/// 16 random decimal digits
fn generate_card_number() -> String {
    let digits = rand::thread_rng().gen_range(0..10_u64.pow(16));
    format!("{:016}", digits)
}
