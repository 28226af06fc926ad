use chrono::Months;
use hourglass_rs::SafeTimeProvider;
use tracing::{info, instrument};

use crate::cards::model::{DebitCard, DebitCardTransaction};
use crate::cards::policy::DebitCardPolicy;
use crate::config::LedgerConfig;
use crate::errors::{LedgerError, Result};
use crate::events::{Event, EventStore};
use crate::money::{CurrencyCode, Money};
use crate::storage::CardStore;
use crate::types::{CardId, CardTransactionId, CustomerId};
use crate::views::CardView;

/// debit card operations on behalf of a customer
pub struct DebitCardService<S> {
    store: S,
    config: LedgerConfig,
    events: EventStore,
}

impl<S: CardStore> DebitCardService<S> {
    pub fn new(store: S, config: LedgerConfig) -> Result<Self> {
        config.validate()?;
        Ok(Self {
            store,
            config,
            events: EventStore::new(),
        })
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    /// the actor's cards, soft-deleted ones excluded
    pub fn list_cards(&self, actor: CustomerId) -> Result<Vec<DebitCard>> {
        Ok(self
            .store
            .cards_for_owner(actor)?
            .into_iter()
            .filter(|c| !c.is_deleted())
            .collect())
    }

    #[instrument(name = "ledger.card.create", skip(self, time_provider), err)]
    pub fn create_card(
        &mut self,
        actor: CustomerId,
        card_type: &str,
        time_provider: &SafeTimeProvider,
    ) -> Result<DebitCard> {
        let now = time_provider.now();
        let months = self.config.card_validity_years.saturating_mul(12);
        let expiration_date = now
            .date_naive()
            .checked_add_months(Months::new(months))
            .ok_or_else(|| LedgerError::InvalidDate {
                message: format!("card expiry {} months after {} is out of range", months, now),
            })?;

        let card = DebitCard::new(actor, card_type.to_string(), expiration_date, now);
        self.store.insert_card(&card)?;

        info!(card_id = %card.id, owner_id = %actor, "debit card created");
        self.events.emit(Event::CardCreated {
            card_id: card.id,
            owner_id: actor,
            timestamp: now,
        });

        Ok(card)
    }

    pub fn show_card(&self, actor: CustomerId, card_id: CardId) -> Result<CardView> {
        let card = self.owned_card(actor, card_id)?;
        let transactions = self.store.card_transactions(card_id)?;
        Ok(CardView::new(card, transactions))
    }

    #[instrument(name = "ledger.card.set_active", skip(self, time_provider), err)]
    pub fn set_card_active(
        &mut self,
        actor: CustomerId,
        card_id: CardId,
        is_active: bool,
        time_provider: &SafeTimeProvider,
    ) -> Result<DebitCard> {
        let mut card = self.owned_card(actor, card_id)?;
        let now = time_provider.now();

        if is_active {
            card.activate(now);
        } else {
            card.deactivate(now);
        }
        self.store.update_card(&card)?;

        info!(card_id = %card_id, is_active, "debit card status changed");
        self.events.emit(if is_active {
            Event::CardActivated { card_id, timestamp: now }
        } else {
            Event::CardDeactivated { card_id, timestamp: now }
        });
        Ok(card)
    }

    /// soft delete a card that has never been used
    #[instrument(name = "ledger.card.delete", skip(self, time_provider), err)]
    pub fn delete_card(
        &mut self,
        actor: CustomerId,
        card_id: CardId,
        time_provider: &SafeTimeProvider,
    ) -> Result<()> {
        let mut card = self.live_card(card_id)?;
        let transaction_count = self.store.card_transactions(card_id)?.len();
        DebitCardPolicy::authorize_delete(actor, &card, transaction_count)?;

        let now = time_provider.now();
        card.delete(now);
        self.store.update_card(&card)?;

        info!(card_id = %card_id, "debit card deleted");
        self.events.emit(Event::CardDeleted { card_id, timestamp: now });
        Ok(())
    }

    pub fn list_transactions(
        &self,
        actor: CustomerId,
        card_id: CardId,
    ) -> Result<Vec<DebitCardTransaction>> {
        self.owned_card(actor, card_id)?;
        self.store.card_transactions(card_id)
    }

    #[instrument(name = "ledger.card.transaction.create", skip(self, time_provider), err)]
    pub fn create_transaction(
        &mut self,
        actor: CustomerId,
        card_id: CardId,
        amount: Money,
        currency_code: CurrencyCode,
        time_provider: &SafeTimeProvider,
    ) -> Result<DebitCardTransaction> {
        self.owned_card(actor, card_id)?;
        if !amount.is_positive() {
            return Err(LedgerError::InvalidAmount { amount });
        }

        let now = time_provider.now();
        let transaction = DebitCardTransaction::new(card_id, amount, currency_code, now);
        self.store.insert_card_transaction(&transaction)?;

        self.events.emit(Event::CardTransactionRecorded {
            card_id,
            transaction_id: transaction.id,
            amount,
            currency_code,
            timestamp: now,
        });
        Ok(transaction)
    }

    pub fn show_transaction(
        &self,
        actor: CustomerId,
        transaction_id: CardTransactionId,
    ) -> Result<DebitCardTransaction> {
        let transaction = self.store.find_card_transaction(transaction_id)?;
        let card = self.store.find_card(transaction.debit_card_id)?;
        DebitCardPolicy::authorize(actor, &card)?;
        Ok(transaction)
    }

    pub fn take_events(&mut self) -> Vec<Event> {
        self.events.take_events()
    }

    fn live_card(&self, card_id: CardId) -> Result<DebitCard> {
        let card = self.store.find_card(card_id)?;
        if card.is_deleted() {
            return Err(LedgerError::CardNotFound { id: card_id });
        }
        Ok(card)
    }

    fn owned_card(&self, actor: CustomerId, card_id: CardId) -> Result<DebitCard> {
        let card = self.live_card(card_id)?;
        DebitCardPolicy::authorize(actor, &card)?;
        Ok(card)
    }
}
