use std::sync::Arc;

use fingenius_core::book::PortfolioBook;
use fingenius_core::identity::User;
use fingenius_core::portfolio::{Portfolio, PortfolioType, SecurityType};
use fingenius_core::valuation::{snapshot, AllocationDimension, CashPolicy, MarginAwareCashPolicy};
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use shared::services::{
    PasswordHasher, PortfolioService, Registration, UserService, ValuationService,
};
use shared::store::{InMemoryStore, NewHolding, NewPortfolio, PortfolioStore, UserStore};
use shared::Error;

struct Harness {
    store: Arc<InMemoryStore>,
    users: UserService,
    portfolios: PortfolioService,
    valuation: ValuationService,
}

fn harness() -> Harness {
    let store = Arc::new(InMemoryStore::new());
    let policy: Arc<dyn CashPolicy> = Arc::new(MarginAwareCashPolicy::default());
    Harness {
        users: UserService::new(store.clone(), PasswordHasher::new(1_000)),
        portfolios: PortfolioService::new(store.clone(), store.clone(), policy.clone()),
        valuation: ValuationService::new(store.clone(), policy),
        store,
    }
}

fn registration(email: &str, username: Option<&str>) -> Registration {
    Registration {
        email: email.to_string(),
        username: username.map(str::to_string),
        first_name: "Jane".to_string(),
        last_name: "Doe".to_string(),
        password: "s3cret-pass".to_string(),
    }
}

fn stock(
    portfolio_id: i64,
    symbol: &str,
    quantity: Decimal,
    cost: Decimal,
    price: Option<Decimal>,
) -> NewHolding {
    NewHolding {
        portfolio_id,
        symbol: symbol.to_string(),
        security_name: String::new(),
        security_type: SecurityType::Stock,
        isin: None,
        cusip: None,
        quantity,
        average_cost: cost,
        current_price: price,
        sector: Some("technology".to_string()),
        industry: None,
        country: Some("US".to_string()),
    }
}

/// User with one individual portfolio holding 5000 cash
async fn seeded(h: &Harness) -> (i64, i64) {
    let user = h
        .users
        .register(registration("jane@example.com", Some("jane")))
        .await
        .unwrap();
    let portfolio = h
        .portfolios
        .create_portfolio(NewPortfolio {
            user_id: user.id,
            name: "Core".to_string(),
            cash_balance: dec!(5000),
            ..Default::default()
        })
        .await
        .unwrap();
    (user.id, portfolio.id)
}

#[tokio::test]
async fn test_register_normalizes_and_hashes() {
    let h = harness();
    let user = h
        .users
        .register(registration("  Jane@Example.COM ", None))
        .await
        .unwrap();

    assert_eq!(user.email, "jane@example.com");
    assert!(user.is_active);
    assert!(!user.is_verified);
    assert!(user.hashed_password.starts_with("pbkdf2-sha256$1000$"));
    assert_ne!(user.hashed_password, "s3cret-pass");
}

#[tokio::test]
async fn test_register_rejects_duplicates_and_bad_input() {
    let h = harness();
    h.users
        .register(registration("jane@example.com", Some("jane")))
        .await
        .unwrap();

    let dup_email = h.users.register(registration("JANE@example.com", None)).await;
    assert!(matches!(dup_email, Err(Error::Duplicate(_))));

    let dup_username = h
        .users
        .register(registration("other@example.com", Some("jane")))
        .await;
    assert!(matches!(dup_username, Err(Error::Duplicate(_))));

    let mut short = registration("short@example.com", None);
    short.password = "1234567".to_string();
    assert!(matches!(h.users.register(short).await, Err(Error::Validation(_))));

    let bad_email = h.users.register(registration("not-an-email", None)).await;
    assert!(matches!(bad_email, Err(Error::Validation(_))));
}

#[tokio::test]
async fn test_authenticate_and_deactivate() {
    let h = harness();
    let user = h
        .users
        .register(registration("jane@example.com", None))
        .await
        .unwrap();
    assert!(user.last_login.is_none());

    let logged_in = h
        .users
        .authenticate("JANE@example.com", "s3cret-pass")
        .await
        .unwrap();
    assert!(logged_in.last_login.is_some());
    assert!(h.users.get(user.id).await.unwrap().last_login.is_some());

    let wrong = h.users.authenticate("jane@example.com", "wrong-pass").await;
    assert!(matches!(wrong, Err(Error::InvalidCredentials)));
    let unknown = h.users.authenticate("nobody@example.com", "s3cret-pass").await;
    assert!(matches!(unknown, Err(Error::InvalidCredentials)));

    let disabled = h.users.deactivate(user.id).await.unwrap();
    assert!(!disabled.is_active);
    let after = h.users.authenticate("jane@example.com", "s3cret-pass").await;
    assert!(matches!(after, Err(Error::AccountDisabled)));

    // soft disable keeps the record
    assert!(!h.users.get(user.id).await.unwrap().is_active);
}

#[tokio::test]
async fn test_get_missing_user_is_not_found() {
    let h = harness();
    let err = h.users.get(404).await.unwrap_err();
    assert!(err.is_not_found());
}

#[tokio::test]
async fn test_create_portfolio_checks_owner_and_cash() {
    let h = harness();
    let orphan = h
        .portfolios
        .create_portfolio(NewPortfolio {
            user_id: 99,
            name: "Nobody's".to_string(),
            ..Default::default()
        })
        .await;
    assert!(orphan.unwrap_err().is_not_found());

    let (user_id, _) = seeded(&h).await;
    let overdrawn = h
        .portfolios
        .create_portfolio(NewPortfolio {
            user_id,
            name: "Overdrawn".to_string(),
            cash_balance: dec!(-10),
            ..Default::default()
        })
        .await;
    assert!(matches!(
        overdrawn,
        Err(Error::Domain(fingenius_core::Error::InvalidState(_)))
    ));

    let margin = h
        .portfolios
        .create_portfolio(NewPortfolio {
            user_id,
            name: "Margin".to_string(),
            portfolio_type: PortfolioType::Margin,
            cash_balance: dec!(-10),
            ..Default::default()
        })
        .await
        .unwrap();
    assert_eq!(margin.cash_balance, dec!(-10));

    let listed = h.portfolios.portfolios_of(user_id).await.unwrap();
    assert_eq!(listed.len(), 2);
    assert!(h.portfolios.portfolios_of(12345).await.unwrap_err().is_not_found());
}

#[tokio::test]
async fn test_holding_lifecycle_and_valuation() {
    let h = harness();
    let (_, portfolio_id) = seeded(&h).await;

    let aapl = h
        .portfolios
        .add_holding(stock(portfolio_id, " aapl ", dec!(10), dec!(100), Some(dec!(150))))
        .await
        .unwrap();
    assert_eq!(aapl.symbol, "AAPL");
    assert_eq!(aapl.security_name, "AAPL");
    assert_eq!(aapl.current_value, Some(dec!(1500)));
    assert_eq!(aapl.unrealized_gain_loss, dec!(500));
    assert_eq!(aapl.unrealized_gain_loss_percent, dec!(50));

    let unpriced = h
        .portfolios
        .add_holding(stock(portfolio_id, "NEWCO", dec!(3), dec!(20), None))
        .await
        .unwrap();

    assert_eq!(h.valuation.total_value(portfolio_id).await.unwrap(), dec!(6500));
    let valuation = h.valuation.valuation(portfolio_id).await.unwrap();
    assert_eq!(valuation.holdings_value, dec!(1500));
    assert_eq!(valuation.unpriced_holdings, 1);
    assert_eq!(valuation.stored_total_value, dec!(0));
    assert_eq!(valuation.drift, dec!(6500));

    let repriced = h.portfolios.update_price(aapl.id, dec!(200)).await.unwrap();
    assert_eq!(repriced.current_value, Some(dec!(2000)));
    assert_eq!(h.valuation.total_value(portfolio_id).await.unwrap(), dec!(7000));

    let negative = h.portfolios.update_price(aapl.id, dec!(-1)).await;
    assert!(matches!(
        negative,
        Err(Error::Domain(fingenius_core::Error::InvalidState(_)))
    ));

    h.portfolios.close_holding(unpriced.id).await.unwrap();
    let remaining = h.portfolios.holdings(portfolio_id).await.unwrap();
    assert_eq!(remaining.len(), 1);
    assert!(h.portfolios.close_holding(unpriced.id).await.unwrap_err().is_not_found());
}

#[tokio::test]
async fn test_add_holding_to_missing_portfolio() {
    let h = harness();
    let err = h
        .portfolios
        .add_holding(stock(77, "AAPL", dec!(1), dec!(1), None))
        .await
        .unwrap_err();
    assert!(err.is_not_found());
}

#[tokio::test]
async fn test_oversized_amounts_are_rejected() {
    let h = harness();
    let (user_id, portfolio_id) = seeded(&h).await;

    let err = h
        .portfolios
        .add_holding(stock(
            portfolio_id,
            "HUGE",
            dec!(1000000000000000),
            dec!(1),
            Some(dec!(1000000000000000)),
        ))
        .await
        .unwrap_err();
    assert!(matches!(err, Error::Domain(fingenius_core::Error::InvalidState(_))));

    // each factor fits a column but the product does not
    let err = h
        .portfolios
        .add_holding(stock(portfolio_id, "BIG", dec!(2000000), dec!(1), Some(dec!(1000000))))
        .await
        .unwrap_err();
    assert!(matches!(err, Error::Domain(fingenius_core::Error::InvalidState(_))));
    assert!(h.portfolios.holdings(portfolio_id).await.unwrap().is_empty());

    let holding = h
        .portfolios
        .add_holding(stock(portfolio_id, "AAPL", dec!(10), dec!(100), Some(dec!(150))))
        .await
        .unwrap();
    let err = h
        .portfolios
        .update_price(holding.id, dec!(1000000000000000))
        .await
        .unwrap_err();
    assert!(matches!(err, Error::Domain(fingenius_core::Error::InvalidState(_))));
    let stored = h.store.load_holding(holding.id).await.unwrap();
    assert_eq!(stored.current_price, Some(dec!(150)));

    let err = h
        .portfolios
        .create_portfolio(NewPortfolio {
            user_id,
            name: "Whale".to_string(),
            cash_balance: dec!(10000000000000),
            ..Default::default()
        })
        .await
        .unwrap_err();
    assert!(matches!(err, Error::Domain(fingenius_core::Error::InvalidState(_))));
}

#[tokio::test]
async fn test_tiny_cost_basis_keeps_full_percentage() {
    let h = harness();
    let (_, portfolio_id) = seeded(&h).await;

    let holding = h
        .portfolios
        .add_holding(stock(portfolio_id, "PENNY", dec!(1), dec!(0.0001), Some(dec!(100))))
        .await
        .unwrap();
    assert_eq!(holding.unrealized_gain_loss_percent, dec!(99999900));
    assert_eq!(holding.current_value, Some(dec!(100)));
}

#[tokio::test]
async fn test_zero_quantity_holdings_do_not_stay() {
    let h = harness();
    let (_, portfolio_id) = seeded(&h).await;

    let err = h
        .portfolios
        .add_holding(stock(portfolio_id, "NONE", Decimal::ZERO, dec!(10), None))
        .await
        .unwrap_err();
    assert!(matches!(err, Error::Validation(_)));

    let mut holding = h
        .portfolios
        .add_holding(stock(portfolio_id, "SOLD", dec!(4), dec!(10), Some(dec!(12))))
        .await
        .unwrap();
    holding.quantity = Decimal::ZERO;
    h.store.save_holding(&holding).await.unwrap();

    assert!(h.portfolios.holdings(portfolio_id).await.unwrap().is_empty());
    assert!(h.store.load_holding(holding.id).await.unwrap_err().is_not_found());
}

#[tokio::test]
async fn test_store_finds_users_by_email_and_username() {
    let h = harness();
    let (user_id, _) = seeded(&h).await;

    let by_email = h.store.find_user_by_email("jane@example.com").await.unwrap();
    assert_eq!(by_email.map(|u| u.id), Some(user_id));
    let by_username = h.store.find_user_by_username("jane").await.unwrap();
    assert_eq!(by_username.map(|u| u.id), Some(user_id));
    assert!(h.store.find_user_by_username("nobody").await.unwrap().is_none());
}

#[tokio::test]
async fn test_breakdown_by_sector() {
    let h = harness();
    let (_, portfolio_id) = seeded(&h).await;
    h.portfolios
        .add_holding(stock(portfolio_id, "MSFT", dec!(10), dec!(300), Some(dec!(500))))
        .await
        .unwrap();

    let breakdown = h
        .valuation
        .allocation_breakdown(portfolio_id, AllocationDimension::Sector)
        .await
        .unwrap();
    assert_eq!(breakdown.get("technology"), Some(&dec!(50)));
    assert_eq!(breakdown.get("cash"), Some(&dec!(50)));
}

#[tokio::test]
async fn test_allocation_percentage_reads_stored_map() {
    let h = harness();
    let (user_id, _) = seeded(&h).await;
    let mut allocation = fingenius_core::portfolio::AllocationMap::new();
    allocation.insert("stocks", dec!(650));

    let portfolio = h
        .portfolios
        .create_portfolio(NewPortfolio {
            user_id,
            name: "Allocated".to_string(),
            cash_balance: dec!(6500),
            asset_allocation: Some(allocation),
            ..Default::default()
        })
        .await
        .unwrap();

    let stocks = h
        .valuation
        .allocation_percentage(portfolio.id, "stocks")
        .await
        .unwrap();
    assert_eq!(stocks, dec!(10));
    let bonds = h
        .valuation
        .allocation_percentage(portfolio.id, "bonds")
        .await
        .unwrap();
    assert_eq!(bonds, dec!(0));
}

#[tokio::test]
async fn test_snapshot_is_compare_and_set() {
    let h = harness();
    let (_, portfolio_id) = seeded(&h).await;
    h.portfolios
        .add_holding(stock(portfolio_id, "AAPL", dec!(10), dec!(100), Some(dec!(150))))
        .await
        .unwrap();

    // a snapshot derived before anyone else writes
    let before = h.store.load_portfolio(portfolio_id).await.unwrap();
    let holdings = h.store.load_holdings(portfolio_id).await.unwrap();
    let stale = snapshot(
        &before,
        &holdings,
        &MarginAwareCashPolicy::default(),
        chrono::Utc::now(),
    )
    .unwrap();

    let recorded = h.valuation.record_snapshot(portfolio_id).await.unwrap();
    assert_eq!(recorded.total_value, dec!(6500));
    let after = h.store.load_portfolio(portfolio_id).await.unwrap();
    assert_eq!(after.total_value, dec!(6500));
    assert_eq!(after.version, before.version + 1);
    assert!(after.last_updated.is_some());

    let conflict = h.store.write_snapshot(&stale).await;
    assert!(matches!(conflict, Err(Error::SnapshotConflict(id)) if id == portfolio_id));
    assert_eq!(
        h.store.load_portfolio(portfolio_id).await.unwrap().version,
        after.version
    );
}

#[tokio::test]
async fn test_reads_do_not_write_stored_total() {
    let h = harness();
    let (_, portfolio_id) = seeded(&h).await;
    h.valuation.valuation(portfolio_id).await.unwrap();
    h.valuation.total_value(portfolio_id).await.unwrap();

    let portfolio = h.store.load_portfolio(portfolio_id).await.unwrap();
    assert_eq!(portfolio.total_value, dec!(0));
    assert_eq!(portfolio.version, 0);
}

#[tokio::test]
async fn test_snapshot_all_reports_failures() {
    let mut book = PortfolioBook::new();
    book.insert_user(User::new(1, "jane@example.com", "Jane", "Doe", "x"))
        .unwrap();

    let mut healthy = Portfolio::new(1, 1, "Healthy");
    healthy.cash_balance = dec!(5000);
    let mut overdrawn = Portfolio::new(2, 1, "Overdrawn");
    overdrawn.cash_balance = dec!(-10);
    let mut archived = Portfolio::new(3, 1, "Archived");
    archived.is_active = false;
    archived.cash_balance = dec!(42);
    book.insert_portfolio(healthy);
    book.insert_portfolio(overdrawn);
    book.insert_portfolio(archived);

    let store = Arc::new(InMemoryStore::from_book(book));
    let valuation = ValuationService::new(store.clone(), Arc::new(MarginAwareCashPolicy::default()));

    let report = valuation.snapshot_all().await.unwrap();
    assert_eq!(report.recorded, 1);
    assert_eq!(report.conflicts, 0);
    assert_eq!(report.failed, 1);

    assert_eq!(store.load_portfolio(1).await.unwrap().total_value, dec!(5000));
    assert_eq!(store.load_portfolio(2).await.unwrap().version, 0);
    // inactive portfolios are not snapshotted
    assert_eq!(store.load_portfolio(3).await.unwrap().total_value, dec!(0));
}
