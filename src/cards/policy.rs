use tracing::warn;

use crate::cards::model::DebitCard;
use crate::errors::{LedgerError, Result};
use crate::types::CustomerId;

/// ownership rules for debit cards and their transactions
pub struct DebitCardPolicy;

impl DebitCardPolicy {
    /// view, update or transact: only the owner
    pub fn authorize(actor: CustomerId, card: &DebitCard) -> Result<()> {
        if card.owner_id != actor {
            warn!(actor = %actor, card_id = %card.id, "debit card access denied");
            return Err(LedgerError::Forbidden { actor });
        }
        Ok(())
    }

    /// delete: only the owner, and only while the card has no transactions
    pub fn authorize_delete(actor: CustomerId, card: &DebitCard, transaction_count: usize) -> Result<()> {
        Self::authorize(actor, card)?;
        if transaction_count > 0 {
            warn!(card_id = %card.id, transaction_count, "debit card with transactions not deleted");
            return Err(LedgerError::CardHasTransactions { id: card.id });
        }
        Ok(())
    }
}
