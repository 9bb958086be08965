use memecoin_ledger::{Ledger, LedgerError, MemecoinId, NewMemecoin, TransactionKind, UserId};

fn coin(name: &str, symbol: &str, description: &str) -> NewMemecoin {
    NewMemecoin {
        name: name.into(),
        symbol: symbol.into(),
        description: Some(description.into()),
        ..Default::default()
    }
}

struct World {
    ledger: Ledger,
    alice: UserId,
    bob: UserId,
    carol: UserId,
    doge: MemecoinId,
    pepe: MemecoinId,
}

fn world() -> World {
    let mut ledger = Ledger::default();
    let alice = ledger.register_user(Some("Alice"), "alice@example.com").unwrap();
    let bob = ledger.register_user(Some("Bob"), "bob@example.com").unwrap();
    let carol = ledger.register_user(None, "carol@example.com").unwrap();

    let doge = ledger.create_memecoin(alice, coin("Doge Coin", "DOGE", "Much wow, very coin")).unwrap();
    let pepe = ledger.create_memecoin(bob, coin("Pepe Coin", "PEPE", "Rare Pepe collection")).unwrap();

    ledger.buy(bob, doge, 50.0).unwrap();
    ledger.buy(alice, doge, 10.0).unwrap();
    ledger.buy(alice, pepe, 20.0).unwrap();
    ledger.sell(bob, doge, 20.0).unwrap();

    World { ledger, alice, bob, carol, doge, pepe }
}

#[test]
fn portfolio_splits_created_and_purchased() {
    let w = world();
    let p = w.ledger.portfolio(w.alice).unwrap();

    assert_eq!(p.created.len(), 1);
    assert_eq!(p.created[0].memecoin, w.doge);
    assert_eq!(p.created[0].holdings, 10.0);

    assert_eq!(p.purchased.len(), 1);
    assert_eq!(p.purchased[0].symbol, "PEPE");
    assert_eq!(p.purchased[0].holdings, 20.0);

    let pepe_price = w.ledger.memecoin(w.pepe).unwrap().price();
    assert!((p.purchased[0].value - 20.0 * pepe_price).abs() < 1e-12);
    assert!(p.holdings_value() > 0.0);

    let empty = w.ledger.portfolio(w.carol).unwrap();
    assert!(empty.created.is_empty() && empty.purchased.is_empty());
    assert_eq!(empty.zth_balance, 100.0);
}

#[test]
fn leaderboard_ranks_by_balance() {
    let w = world();
    let board = w.ledger.leaderboard();

    assert_eq!(board.len(), 3);
    assert_eq!(board[0].user, w.carol);
    assert_eq!(board[0].rank, 1);
    assert!(board.windows(2).all(|p| p[0].zth_balance >= p[1].zth_balance));

    let alice = board.iter().find(|e| e.user == w.alice).unwrap();
    assert_eq!(alice.memecoins_created, 1);
    // create + two buys
    assert_eq!(alice.transactions, 3);
}

#[test]
fn search_is_case_insensitive_over_all_fields() {
    let w = world();

    let by_symbol: Vec<_> = w.ledger.search("doge").iter().map(|m| m.id).collect();
    assert_eq!(by_symbol, vec![w.doge]);

    let by_description: Vec<_> = w.ledger.search("RARE").iter().map(|m| m.id).collect();
    assert_eq!(by_description, vec![w.pepe]);

    let all: Vec<_> = w.ledger.search("  ").iter().map(|m| m.id).collect();
    assert_eq!(all, vec![w.pepe, w.doge]);

    assert!(w.ledger.search("shiba").is_empty());
}

#[test]
fn history_and_price_history_follow_the_log() {
    let w = world();

    let kinds: Vec<_> = w.ledger.history(w.doge).unwrap().iter().map(|t| t.kind).collect();
    assert_eq!(
        kinds,
        vec![TransactionKind::Create, TransactionKind::Buy, TransactionKind::Buy, TransactionKind::Sell]
    );

    let points = w.ledger.price_history(w.doge).unwrap();
    let supplies: Vec<f64> = points.iter().map(|p| p.supply).collect();
    assert_eq!(supplies, vec![0.0, 50.0, 60.0, 40.0]);

    let last = points.last().unwrap();
    assert_eq!(last.price, w.ledger.memecoin(w.doge).unwrap().price());

    assert_eq!(
        w.ledger.price_history(MemecoinId(77)),
        Err(LedgerError::MemecoinNotFound(MemecoinId(77)))
    );
}

#[test]
fn ledger_survives_json_round_trip() {
    let w = world();
    let json = serde_json::to_string(&w.ledger).unwrap();
    let restored: Ledger = serde_json::from_str(&json).unwrap();

    assert_eq!(restored, w.ledger);
    assert_eq!(restored.holdings(w.bob, w.doge), 30.0);
}
