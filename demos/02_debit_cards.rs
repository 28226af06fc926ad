/// debit cards - ownership, activation and transactions
use loan_ledger_rs::{
    CurrencyCode, DebitCardService, LedgerConfig, MemoryStore, Money, SafeTimeProvider,
    TimeSource, Uuid,
};

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let time = SafeTimeProvider::new(TimeSource::System);
    let mut cards = DebitCardService::new(MemoryStore::new(), LedgerConfig::default())?;

    let alice = Uuid::new_v4();
    let bob = Uuid::new_v4();

    let card = cards.create_card(alice, "Visa", &time)?;
    cards.create_transaction(alice, card.id, Money::from_minor(10_000), CurrencyCode::IDR, &time)?;
    cards.set_card_active(alice, card.id, false, &time)?;

    println!("{}", cards.show_card(alice, card.id)?.to_json_pretty()?);

    // another customer is turned away
    if let Err(e) = cards.show_card(bob, card.id) {
        println!("bob: {}", e);
    }

    // used cards stay
    if let Err(e) = cards.delete_card(alice, card.id, &time) {
        println!("alice: {}", e);
    }

    Ok(())
}
