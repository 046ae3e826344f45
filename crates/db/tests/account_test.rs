//! Integration tests for the account directory.

mod common;

use tally_core::ledger::{AccountType, ErrorKind, LedgerError, NewAccount};
use tally_shared::types::AccountId;

use common::setup;

#[tokio::test]
async fn test_create_assigns_id_and_timestamp() {
    let t = setup().await;
    let account = t
        .ledger
        .accounts
        .create(
            &t.tenant,
            NewAccount::new("1100", "Petty Cash", AccountType::Asset).with_parent(t.chart.cash),
        )
        .await
        .unwrap();

    assert_eq!(account.tenant_id, t.tenant.id);
    assert_eq!(account.parent_id, Some(t.chart.cash));
    assert!(account.is_active);
    assert!(!account.is_system);

    let fetched = t.ledger.accounts.get(&t.tenant, account.id).await.unwrap();
    assert_eq!(fetched.code, "1100");
    assert_eq!(fetched.account_type, AccountType::Asset);
}

#[tokio::test]
async fn test_create_keeps_supplied_id() {
    let t = setup().await;
    let id = AccountId::new();
    let mut input = NewAccount::new("5000", "Cost of Sales", AccountType::Expense);
    input.id = Some(id);

    let account = t.ledger.accounts.create(&t.tenant, input).await.unwrap();
    assert_eq!(account.id, id);
}

#[tokio::test]
async fn test_duplicate_code_is_a_creation_failure() {
    let t = setup().await;
    let err = t
        .ledger
        .accounts
        .create(
            &t.tenant,
            NewAccount::new("1000", "Second Cash", AccountType::Asset),
        )
        .await
        .unwrap_err();
    assert!(matches!(err, LedgerError::DuplicateCode(ref code) if code == "1000"));
    assert_eq!(err.http_status_code(), 409);

    let (other, _) = common::add_tenant(&t.ledger).await;
    let reused = t
        .ledger
        .accounts
        .create(&other, NewAccount::new("1999", "Suspense", AccountType::Asset))
        .await;
    assert!(reused.is_ok());
}

#[tokio::test]
async fn test_parent_must_belong_to_tenant() {
    let t = setup().await;
    let (other, _) = common::add_tenant(&t.ledger).await;

    let err = t
        .ledger
        .accounts
        .create(
            &other,
            NewAccount::new("1100", "Petty Cash", AccountType::Asset).with_parent(t.chart.cash),
        )
        .await
        .unwrap_err();
    assert_eq!(err.kind(), ErrorKind::NotFound);
}

#[tokio::test]
async fn test_blank_code_rejected() {
    let t = setup().await;
    let err = t
        .ledger
        .accounts
        .create(&t.tenant, NewAccount::new(" ", "Nameless", AccountType::Asset))
        .await
        .unwrap_err();
    assert!(matches!(err, LedgerError::MissingField("code")));
}

#[tokio::test]
async fn test_list_orders_by_code_and_filters_inactive() {
    let t = setup().await;
    let mut dormant = NewAccount::new("0500", "Dormant", AccountType::Asset);
    dormant.is_active = false;
    t.ledger.accounts.create(&t.tenant, dormant).await.unwrap();

    let all = t.ledger.accounts.list(&t.tenant, false).await.unwrap();
    assert_eq!(all.len(), 7);
    assert_eq!(all[0].code, "0500");

    let active = t.ledger.accounts.list(&t.tenant, true).await.unwrap();
    let codes: Vec<_> = active.iter().map(|a| a.code.as_str()).collect();
    assert_eq!(codes, ["1000", "1200", "2000", "3000", "4000", "6100"]);

    let (other, _) = common::add_tenant(&t.ledger).await;
    let err = t
        .ledger
        .accounts
        .get(&other, t.chart.cash)
        .await
        .unwrap_err();
    assert!(matches!(err, LedgerError::AccountNotFound(_)));
}
