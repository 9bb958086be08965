//! Trade execution over users, memecoins and the transaction log
//!
//! Every mutating operation validates all of its preconditions before the
//! first write, so a rejected operation leaves the ledger untouched. The
//! ledger is mutated through `&mut self`; exclusive access is what makes a
//! trade's balance, supply, reserve and log updates atomic.
//!
//! # Invariants
//! - **L1**: holdings of every (user, memecoin) pair are >= 0
//! - **L2**: a memecoin's supply equals the sum of all its holders' holdings
//! - **L3**: reserve >= 0 and never pays out more than it received
//! - **L4**: transactions are append-only with increasing ids

use std::collections::BTreeMap;

use chrono::Utc;
use log::{info, warn};
use serde::{Deserialize, Serialize};

use crate::error::{LedgerError, Result};
use crate::types::*;
use crate::validation;

/// Relative slack when comparing sell proceeds against the reserve
///
/// The reserve is a sum of per-trade integrals while a sell is one integral
/// over the combined range, so the two differ by rounding.
pub const RESERVE_TOLERANCE: f64 = 1e-9;

/// Absolute slack when comparing token quantities
pub const QUANTITY_EPSILON: f64 = 1e-9;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Ledger {
    params: LedgerParams,
    users: BTreeMap<UserId, User>,
    memecoins: BTreeMap<MemecoinId, Memecoin>,
    transactions: Vec<Transaction>,
    next_user: u64,
    next_memecoin: u64,
}

impl Default for Ledger {
    fn default() -> Self {
        Self::new(LedgerParams::default())
    }
}

impl Ledger {
    pub fn new(params: LedgerParams) -> Self {
        Self {
            params,
            users: BTreeMap::new(),
            memecoins: BTreeMap::new(),
            transactions: Vec::new(),
            next_user: 1,
            next_memecoin: 1,
        }
    }

    pub fn params(&self) -> &LedgerParams {
        &self.params
    }

    // ========================================================================
    // Lookups
    // ========================================================================

    pub fn user(&self, id: UserId) -> Result<&User> {
        self.users.get(&id).ok_or(LedgerError::UserNotFound(id))
    }

    pub fn memecoin(&self, id: MemecoinId) -> Result<&Memecoin> {
        self.memecoins.get(&id).ok_or(LedgerError::MemecoinNotFound(id))
    }

    pub fn users(&self) -> impl Iterator<Item = &User> {
        self.users.values()
    }

    pub fn memecoins(&self) -> impl Iterator<Item = &Memecoin> {
        self.memecoins.values()
    }

    pub fn transactions(&self) -> &[Transaction] {
        &self.transactions
    }

    pub fn find_user_by_email(&self, email: &str) -> Option<&User> {
        self.users
            .values()
            .find(|u| u.email.eq_ignore_ascii_case(email.trim()))
    }

    /// Net tokens a user holds, replayed from the log
    pub fn holdings(&self, user: UserId, memecoin: MemecoinId) -> f64 {
        self.transactions
            .iter()
            .filter(|t| t.user == user && t.memecoin == memecoin)
            .fold(0.0, |held, t| match t.kind {
                TransactionKind::Buy => held + t.quantity,
                TransactionKind::Sell => held - t.quantity,
                TransactionKind::Create => held,
            })
    }

    // ========================================================================
    // Users
    // ========================================================================

    pub fn register_user(&mut self, name: Option<&str>, email: &str) -> Result<UserId> {
        let name = name.map(validation::user_name).transpose()?;
        let email = validation::email(email)?;
        if self.find_user_by_email(&email).is_some() {
            return Err(LedgerError::DuplicateEmail);
        }

        let id = UserId(self.next_user);
        self.next_user += 1;

        let now = Utc::now();
        self.users.insert(
            id,
            User {
                id,
                name,
                email,
                zth_balance: self.params.starting_balance,
                created_at: now,
                updated_at: now,
            },
        );

        info!("registered user {} with {} ZTH", id, self.params.starting_balance);
        Ok(id)
    }

    pub fn update_profile(&mut self, id: UserId, update: ProfileUpdate) -> Result<&User> {
        self.user(id)?;
        let name = update.name.as_deref().map(validation::user_name).transpose()?;
        let email = update.email.as_deref().map(validation::email).transpose()?;

        if let Some(email) = &email {
            if self.find_user_by_email(email).is_some_and(|u| u.id != id) {
                return Err(LedgerError::DuplicateEmail);
            }
        }

        let user = self.users.get_mut(&id).ok_or(LedgerError::UserNotFound(id))?;
        if let Some(name) = name {
            user.name = Some(name);
        }
        if let Some(email) = email {
            user.email = email;
        }
        user.updated_at = Utc::now();

        info!("updated profile of user {}", id);
        Ok(&*user)
    }

    // ========================================================================
    // Memecoins
    // ========================================================================

    /// Create a memecoin at zero supply, charging the creation fee
    pub fn create_memecoin(&mut self, creator: UserId, req: NewMemecoin) -> Result<MemecoinId> {
        self.try_create(creator, req)
            .inspect_err(|e| warn!("create by user {} rejected: {}", creator, e))
    }

    fn try_create(&mut self, creator: UserId, req: NewMemecoin) -> Result<MemecoinId> {
        let coin = validation::new_memecoin(&req, self.params.default_curve)?;
        let user = self.user(creator)?;

        let fee = self.params.creation_fee;
        if user.zth_balance < fee {
            return Err(LedgerError::InsufficientBalance {
                needed: fee,
                available: user.zth_balance,
            });
        }
        if self.memecoins.values().any(|m| m.symbol == coin.symbol) {
            return Err(LedgerError::DuplicateSymbol(coin.symbol));
        }
        let owner = user.display_name().to_string();

        let id = MemecoinId(self.next_memecoin);
        self.next_memecoin += 1;

        self.debit(creator, fee)?;
        let now = Utc::now();
        self.memecoins.insert(
            id,
            Memecoin {
                id,
                name: coin.name,
                symbol: coin.symbol,
                description: coin.description,
                logo_url: coin.logo_url,
                supply: 0.0,
                reserve: 0.0,
                curve: coin.curve,
                creator: Some(creator),
                owner: Some(owner),
                created_at: now,
                updated_at: now,
            },
        );
        self.append(TransactionKind::Create, fee, 0.0, creator, id);

        info!("user {} created memecoin {} for {} ZTH", creator, id, fee);
        Ok(id)
    }

    /// Remove a memecoin nobody holds; only its creator may do this
    pub fn delete_memecoin(&mut self, requester: UserId, id: MemecoinId) -> Result<Memecoin> {
        let coin = self.memecoin(id)?;
        if coin.creator != Some(requester) {
            return Err(LedgerError::NotCreator);
        }
        if coin.supply > QUANTITY_EPSILON {
            return Err(LedgerError::CoinInCirculation(coin.supply));
        }

        let removed = self
            .memecoins
            .remove(&id)
            .ok_or(LedgerError::MemecoinNotFound(id))?;
        info!("user {} deleted memecoin {}", requester, id);
        Ok(removed)
    }

    // ========================================================================
    // Trading
    // ========================================================================

    /// Buy `amount` tokens along the memecoin's curve
    ///
    /// # Effects
    /// - balance' = balance - cost
    /// - supply' = supply + amount
    /// - reserve' = reserve + cost
    /// - appends a Buy transaction
    pub fn buy(&mut self, user: UserId, memecoin: MemecoinId, amount: f64) -> Result<TradeReceipt> {
        self.try_buy(user, memecoin, amount)
            .inspect_err(|e| warn!("buy of {} on memecoin {} by user {} rejected: {}", amount, memecoin, user, e))
    }

    fn try_buy(&mut self, user_id: UserId, coin_id: MemecoinId, amount: f64) -> Result<TradeReceipt> {
        let amount = validation::trade_amount(amount)?;
        let coin = self.memecoin(coin_id)?;
        let user = self.user(user_id)?;

        let quote = coin.curve.quote_buy(coin.supply, amount)?;
        if user.zth_balance < quote.value {
            return Err(LedgerError::InsufficientBalance {
                needed: quote.value,
                available: user.zth_balance,
            });
        }
        let held = self.holdings(user_id, coin_id);

        let balance_after = self.debit(user_id, quote.value)?;
        let coin = self
            .memecoins
            .get_mut(&coin_id)
            .ok_or(LedgerError::MemecoinNotFound(coin_id))?;
        coin.supply = quote.new_supply;
        coin.reserve += quote.value;
        coin.updated_at = Utc::now();
        let tx = self.append(TransactionKind::Buy, quote.value, amount, user_id, coin_id);

        info!(
            "user {} bought {} of memecoin {} for {:.4} ZTH (supply {})",
            user_id, amount, coin_id, quote.value, quote.new_supply
        );
        Ok(TradeReceipt {
            transaction: tx,
            kind: TransactionKind::Buy,
            quantity: amount,
            value: quote.value,
            holdings_after: held + amount,
            new_supply: quote.new_supply,
            new_price: quote.new_price,
            balance_after,
        })
    }

    /// Sell `amount` tokens back to the curve
    ///
    /// # Effects
    /// - balance' = balance + proceeds
    /// - supply' = supply - amount
    /// - reserve' = reserve - proceeds
    /// - appends a Sell transaction
    ///
    /// Quantities within [`QUANTITY_EPSILON`] of the holdings or supply are
    /// settled at the held amount, and proceeds within [`RESERVE_TOLERANCE`]
    /// of the reserve are capped at the reserve.
    pub fn sell(&mut self, user: UserId, memecoin: MemecoinId, amount: f64) -> Result<TradeReceipt> {
        self.try_sell(user, memecoin, amount)
            .inspect_err(|e| warn!("sell of {} on memecoin {} by user {} rejected: {}", amount, memecoin, user, e))
    }

    fn try_sell(&mut self, user_id: UserId, coin_id: MemecoinId, amount: f64) -> Result<TradeReceipt> {
        let amount = validation::trade_amount(amount)?;
        let coin = self.memecoin(coin_id)?;
        if coin.supply + QUANTITY_EPSILON < amount {
            return Err(LedgerError::InsufficientSupply {
                supply: coin.supply,
                amount,
            });
        }
        self.user(user_id)?;

        let held = self.holdings(user_id, coin_id);
        if held + QUANTITY_EPSILON < amount {
            return Err(LedgerError::InsufficientHoldings { held, amount });
        }
        let quantity = amount.min(held).min(coin.supply);
        if quantity <= 0.0 {
            return Err(LedgerError::InsufficientSupply {
                supply: coin.supply,
                amount,
            });
        }

        let quote = coin.curve.quote_sell(coin.supply, quantity)?;
        let proceeds = settle_proceeds(coin.reserve, quote.value)?;

        let balance_after = self.credit(user_id, proceeds)?;
        let coin = self
            .memecoins
            .get_mut(&coin_id)
            .ok_or(LedgerError::MemecoinNotFound(coin_id))?;
        coin.supply = quote.new_supply;
        coin.reserve -= proceeds;
        coin.updated_at = Utc::now();
        let tx = self.append(TransactionKind::Sell, proceeds, quantity, user_id, coin_id);

        info!(
            "user {} sold {} of memecoin {} for {:.4} ZTH (supply {})",
            user_id, quantity, coin_id, proceeds, quote.new_supply
        );
        Ok(TradeReceipt {
            transaction: tx,
            kind: TransactionKind::Sell,
            quantity,
            value: proceeds,
            holdings_after: held - quantity,
            new_supply: quote.new_supply,
            new_price: quote.new_price,
            balance_after,
        })
    }

    // ========================================================================
    // Internals
    // ========================================================================

    fn debit(&mut self, id: UserId, amount: f64) -> Result<f64> {
        let user = self.users.get_mut(&id).ok_or(LedgerError::UserNotFound(id))?;
        user.zth_balance -= amount;
        user.updated_at = Utc::now();
        Ok(user.zth_balance)
    }

    fn credit(&mut self, id: UserId, amount: f64) -> Result<f64> {
        let user = self.users.get_mut(&id).ok_or(LedgerError::UserNotFound(id))?;
        user.zth_balance += amount;
        user.updated_at = Utc::now();
        Ok(user.zth_balance)
    }

    fn append(
        &mut self,
        kind: TransactionKind,
        amount: f64,
        quantity: f64,
        user: UserId,
        memecoin: MemecoinId,
    ) -> TransactionId {
        let id = TransactionId(self.transactions.last().map_or(1, |t| t.id.0 + 1));
        self.transactions.push(Transaction {
            id,
            kind,
            amount,
            quantity,
            user,
            memecoin,
            created_at: Utc::now(),
        });
        id
    }
}

/// Proceeds actually paid out of `reserve`
fn settle_proceeds(reserve: f64, proceeds: f64) -> Result<f64> {
    let slack = reserve.abs().max(1.0) * RESERVE_TOLERANCE;
    if proceeds > reserve + slack {
        return Err(LedgerError::InsufficientReserve { reserve, proceeds });
    }
    Ok(proceeds.min(reserve).max(0.0))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn setup() -> (Ledger, UserId, MemecoinId) {
        let mut ledger = Ledger::default();
        let alice = ledger.register_user(Some("Alice"), "alice@example.com").unwrap();
        let coin = ledger
            .create_memecoin(
                alice,
                NewMemecoin {
                    name: "Doge Coin".into(),
                    symbol: "DOGE".into(),
                    ..Default::default()
                },
            )
            .unwrap();
        (ledger, alice, coin)
    }

    #[test]
    fn test_create_charges_fee_and_logs() {
        let (ledger, alice, coin) = setup();

        assert_eq!(ledger.user(alice).unwrap().zth_balance, 99.0);
        let m = ledger.memecoin(coin).unwrap();
        assert_eq!(m.supply, 0.0);
        assert_eq!(m.reserve, 0.0);
        assert_eq!(m.price(), 0.1);
        assert_eq!(m.owner.as_deref(), Some("Alice"));

        let tx = &ledger.transactions()[0];
        assert_eq!(tx.kind, TransactionKind::Create);
        assert_eq!(tx.amount, 1.0);
        assert_eq!(tx.quantity, 0.0);
    }

    #[test]
    fn test_buy_moves_balance_supply_reserve() {
        let (mut ledger, alice, coin) = setup();
        let r = ledger.buy(alice, coin, 100.0).unwrap();

        assert!((r.value - 12.974_425_414).abs() < 1e-8);
        assert_eq!(r.holdings_after, 100.0);
        assert_eq!(r.new_supply, 100.0);
        assert!((r.balance_after - (99.0 - r.value)).abs() < 1e-12);

        let m = ledger.memecoin(coin).unwrap();
        assert_eq!(m.reserve, r.value);
        assert_eq!(ledger.holdings(alice, coin), 100.0);
    }

    #[test]
    fn test_round_trip_restores_balance_and_reserve() {
        let (mut ledger, alice, coin) = setup();
        ledger.buy(alice, coin, 40.0).unwrap();
        ledger.buy(alice, coin, 60.0).unwrap();
        let r = ledger.sell(alice, coin, 100.0).unwrap();

        assert_eq!(r.holdings_after, 0.0);
        assert_eq!(r.new_supply, 0.0);
        let m = ledger.memecoin(coin).unwrap();
        assert!(m.reserve.abs() < 1e-9);
        assert!((ledger.user(alice).unwrap().zth_balance - 99.0).abs() < 1e-9);
    }

    #[test]
    fn test_buy_insufficient_balance_leaves_state() {
        let (mut ledger, alice, coin) = setup();
        let before = ledger.clone();

        let err = ledger.buy(alice, coin, 10_000.0).unwrap_err();
        assert!(matches!(err, LedgerError::InsufficientBalance { .. }));
        assert_eq!(ledger, before);
    }

    #[test]
    fn test_sell_checks_order() {
        let (mut ledger, alice, coin) = setup();
        let bob = ledger.register_user(None, "bob@example.com").unwrap();
        ledger.buy(alice, coin, 10.0).unwrap();

        // More than circulating supply
        let err = ledger.sell(alice, coin, 11.0).unwrap_err();
        assert!(matches!(err, LedgerError::InsufficientSupply { .. }));

        // Supply exists but bob holds none of it
        let err = ledger.sell(bob, coin, 5.0).unwrap_err();
        assert_eq!(err, LedgerError::InsufficientHoldings { held: 0.0, amount: 5.0 });
    }

    #[test]
    fn test_sell_rejects_when_reserve_short() {
        let (mut ledger, alice, coin) = setup();
        ledger.buy(alice, coin, 10.0).unwrap();
        ledger.memecoins.get_mut(&coin).unwrap().reserve = 0.5;
        let before = ledger.clone();

        let err = ledger.sell(alice, coin, 10.0).unwrap_err();
        assert!(matches!(err, LedgerError::InsufficientReserve { .. }));
        assert_eq!(ledger, before);
    }

    #[test]
    fn test_dust_is_settled_at_holdings() {
        let (mut ledger, alice, coin) = setup();
        ledger.buy(alice, coin, 0.3).unwrap();
        ledger.sell(alice, coin, 0.1).unwrap();
        ledger.sell(alice, coin, 0.1).unwrap();
        // 0.3 - 0.1 - 0.1 is slightly below 0.1 in binary floating point
        let r = ledger.sell(alice, coin, 0.1).unwrap();

        assert!(r.holdings_after >= 0.0);
        assert!(ledger.holdings(alice, coin) >= 0.0);
        assert!(ledger.memecoin(coin).unwrap().reserve >= 0.0);
    }

    #[test]
    fn test_invalid_amounts() {
        let (mut ledger, alice, coin) = setup();
        for amount in [0.0, -1.0, f64::NAN, f64::INFINITY] {
            assert!(matches!(ledger.buy(alice, coin, amount), Err(LedgerError::Validation { .. })));
            assert!(matches!(ledger.sell(alice, coin, amount), Err(LedgerError::Validation { .. })));
        }
    }

    #[test]
    fn test_unknown_ids() {
        let (mut ledger, alice, _) = setup();
        assert_eq!(
            ledger.buy(alice, MemecoinId(99), 1.0),
            Err(LedgerError::MemecoinNotFound(MemecoinId(99)))
        );
        assert_eq!(
            ledger.buy(UserId(42), MemecoinId(1), 1.0),
            Err(LedgerError::UserNotFound(UserId(42)))
        );
    }

    #[test]
    fn test_create_requires_fee_and_unique_symbol() {
        let (mut ledger, alice, _) = setup();
        let req = NewMemecoin {
            name: "Doge Again".into(),
            symbol: "DOGE".into(),
            ..Default::default()
        };
        assert_eq!(
            ledger.create_memecoin(alice, req),
            Err(LedgerError::DuplicateSymbol("DOGE".into()))
        );

        ledger.users.get_mut(&alice).unwrap().zth_balance = 0.5;
        let req = NewMemecoin {
            name: "Pepe Coin".into(),
            symbol: "PEPE".into(),
            ..Default::default()
        };
        assert!(matches!(
            ledger.create_memecoin(alice, req),
            Err(LedgerError::InsufficientBalance { .. })
        ));
    }

    #[test]
    fn test_delete_rules() {
        let (mut ledger, alice, coin) = setup();
        let bob = ledger.register_user(None, "bob@example.com").unwrap();

        assert_eq!(ledger.delete_memecoin(bob, coin), Err(LedgerError::NotCreator));

        ledger.buy(alice, coin, 1.0).unwrap();
        assert!(matches!(ledger.delete_memecoin(alice, coin), Err(LedgerError::CoinInCirculation(_))));

        ledger.sell(alice, coin, 1.0).unwrap();
        let removed = ledger.delete_memecoin(alice, coin).unwrap();
        assert_eq!(removed.symbol, "DOGE");
        assert!(ledger.memecoin(coin).is_err());
        // The log keeps the deleted coin's history
        assert_eq!(ledger.transactions().len(), 3);
    }

    #[test]
    fn test_profile_update_and_duplicate_email() {
        let (mut ledger, alice, _) = setup();
        ledger.register_user(None, "bob@example.com").unwrap();

        let err = ledger
            .update_profile(
                alice,
                ProfileUpdate {
                    email: Some("BOB@example.com".into()),
                    ..Default::default()
                },
            )
            .unwrap_err();
        assert_eq!(err, LedgerError::DuplicateEmail);

        let user = ledger
            .update_profile(
                alice,
                ProfileUpdate {
                    name: Some("Alicia".into()),
                    email: Some("alice@example.com".into()),
                },
            )
            .unwrap();
        assert_eq!(user.name.as_deref(), Some("Alicia"));
    }

    #[test]
    fn test_register_duplicate_email() {
        let (mut ledger, _, _) = setup();
        assert_eq!(
            ledger.register_user(None, "Alice@Example.com"),
            Err(LedgerError::DuplicateEmail)
        );
    }

    #[test]
    fn test_transaction_ids_increase() {
        let (mut ledger, alice, coin) = setup();
        ledger.buy(alice, coin, 1.0).unwrap();
        ledger.sell(alice, coin, 0.5).unwrap();

        let ids: Vec<u64> = ledger.transactions().iter().map(|t| t.id.0).collect();
        assert_eq!(ids, vec![1, 2, 3]);
    }
}
