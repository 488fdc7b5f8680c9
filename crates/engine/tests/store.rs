//! Ledger atomicity against an in-memory store with injectable failures.

use std::{
    collections::HashMap,
    sync::{
        Arc,
        atomic::{AtomicUsize, Ordering},
    },
};

use async_trait::async_trait;
use chrono::Utc;
use sea_orm::DbErr;
use tokio::sync::{Mutex, OwnedMutexGuard};
use uuid::Uuid;

use engine::{
    EngineError, Ledger, LedgerStore, LedgerUnit, PartyRepository, ResultEngine, Transaction,
    TransactionKind, TransactionRepository, commands::RecordTransactionCmd,
};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum FailAt {
    Never,
    Insert,
    SetBalance,
}

#[derive(Clone, Default)]
struct State {
    balances: HashMap<(String, Uuid), i64>,
    transactions: Vec<Transaction>,
}

struct MemoryStore {
    state: Arc<Mutex<State>>,
    fail_at: FailAt,
    begins: AtomicUsize,
}

impl MemoryStore {
    fn new(fail_at: FailAt) -> Self {
        Self {
            state: Arc::new(Mutex::new(State::default())),
            fail_at,
            begins: AtomicUsize::new(0),
        }
    }

    async fn seed_party(&self, user_id: &str, balance_minor: i64) -> Uuid {
        let party_id = Uuid::new_v4();
        self.state
            .lock()
            .await
            .balances
            .insert((user_id.to_string(), party_id), balance_minor);
        party_id
    }

    async fn snapshot(&self) -> State {
        self.state.lock().await.clone()
    }
}

/// Works on a copy of the state; commit swaps it in.
struct MemoryUnit {
    guard: OwnedMutexGuard<State>,
    working: State,
    fail_at: FailAt,
}

fn injected() -> EngineError {
    EngineError::Database(DbErr::Custom("injected failure".to_string()))
}

#[async_trait]
impl LedgerStore for MemoryStore {
    async fn begin(&self) -> ResultEngine<Box<dyn LedgerUnit>> {
        self.begins.fetch_add(1, Ordering::SeqCst);
        let guard = Arc::clone(&self.state).lock_owned().await;
        let working = guard.clone();
        Ok(Box::new(MemoryUnit {
            guard,
            working,
            fail_at: self.fail_at,
        }))
    }
}

#[async_trait]
impl PartyRepository for MemoryUnit {
    async fn lock_balance(&mut self, user_id: &str, party_id: Uuid) -> ResultEngine<Option<i64>> {
        Ok(self
            .working
            .balances
            .get(&(user_id.to_string(), party_id))
            .copied())
    }

    async fn set_balance(
        &mut self,
        user_id: &str,
        party_id: Uuid,
        balance_minor: i64,
    ) -> ResultEngine<()> {
        if self.fail_at == FailAt::SetBalance {
            return Err(injected());
        }
        self.working
            .balances
            .insert((user_id.to_string(), party_id), balance_minor);
        Ok(())
    }
}

#[async_trait]
impl TransactionRepository for MemoryUnit {
    async fn insert(&mut self, tx: &Transaction) -> ResultEngine<()> {
        if self.fail_at == FailAt::Insert {
            return Err(injected());
        }
        self.working.transactions.push(tx.clone());
        Ok(())
    }
}

#[async_trait]
impl LedgerUnit for MemoryUnit {
    async fn commit(self: Box<Self>) -> ResultEngine<()> {
        let MemoryUnit {
            mut guard, working, ..
        } = *self;
        *guard = working;
        Ok(())
    }
}

fn ledger_over(store: &Arc<MemoryStore>) -> Ledger {
    Ledger::new(Arc::clone(store) as Arc<dyn LedgerStore>)
}

#[tokio::test]
async fn committed_unit_updates_balance_and_log_together() {
    let store = Arc::new(MemoryStore::new(FailAt::Never));
    let party_id = store.seed_party("alice", 0).await;
    let ledger = ledger_over(&store);

    ledger
        .record(RecordTransactionCmd::new("alice", party_id, 10_000, TransactionKind::Credit))
        .await
        .unwrap();
    let debit = ledger
        .record(
            RecordTransactionCmd::new("alice", party_id, 3_000, TransactionKind::Debit)
                .description("  stock  "),
        )
        .await
        .unwrap();

    assert_eq!(debit.running_balance_minor, 7_000);
    assert_eq!(debit.description.as_deref(), Some("stock"));
    assert_eq!(debit.date, Utc::now().date_naive());

    let state = store.snapshot().await;
    assert_eq!(state.balances[&("alice".to_string(), party_id)], 7_000);
    assert_eq!(state.transactions.len(), 2);
}

#[tokio::test]
async fn failing_insert_leaves_state_untouched() {
    let store = Arc::new(MemoryStore::new(FailAt::Insert));
    let party_id = store.seed_party("alice", 500).await;
    let ledger = ledger_over(&store);

    let err = ledger
        .record(RecordTransactionCmd::new("alice", party_id, 100, TransactionKind::Credit))
        .await
        .unwrap_err();
    assert!(matches!(err, EngineError::Database(_)));

    let state = store.snapshot().await;
    assert_eq!(state.balances[&("alice".to_string(), party_id)], 500);
    assert!(state.transactions.is_empty());
}

#[tokio::test]
async fn failing_balance_write_discards_the_inserted_transaction() {
    let store = Arc::new(MemoryStore::new(FailAt::SetBalance));
    let party_id = store.seed_party("alice", 500).await;
    let ledger = ledger_over(&store);

    ledger
        .record(RecordTransactionCmd::new("alice", party_id, 100, TransactionKind::Debit))
        .await
        .unwrap_err();

    let state = store.snapshot().await;
    assert_eq!(state.balances[&("alice".to_string(), party_id)], 500);
    assert!(state.transactions.is_empty());
}

#[tokio::test]
async fn invalid_amount_never_opens_a_unit() {
    let store = Arc::new(MemoryStore::new(FailAt::Never));
    let party_id = store.seed_party("alice", 0).await;
    let ledger = ledger_over(&store);

    let err = ledger
        .record(RecordTransactionCmd::new("alice", party_id, 0, TransactionKind::Credit))
        .await
        .unwrap_err();

    assert!(matches!(err, EngineError::InvalidAmount(_)));
    assert_eq!(store.begins.load(Ordering::SeqCst), 0);
}

#[tokio::test]
async fn overflow_is_rejected_and_rolled_back() {
    let store = Arc::new(MemoryStore::new(FailAt::Never));
    let party_id = store.seed_party("alice", i64::MAX - 10).await;
    let ledger = ledger_over(&store);

    let err = ledger
        .record(RecordTransactionCmd::new("alice", party_id, 11, TransactionKind::Credit))
        .await
        .unwrap_err();

    assert!(matches!(err, EngineError::InvalidAmount(_)));
    let state = store.snapshot().await;
    assert_eq!(state.balances[&("alice".to_string(), party_id)], i64::MAX - 10);
    assert!(state.transactions.is_empty());
}

#[tokio::test]
async fn other_users_party_is_not_found() {
    let store = Arc::new(MemoryStore::new(FailAt::Never));
    let party_id = store.seed_party("alice", 0).await;
    let ledger = ledger_over(&store);

    let err = ledger
        .record(RecordTransactionCmd::new("bob", party_id, 100, TransactionKind::Credit))
        .await
        .unwrap_err();

    assert_eq!(err, EngineError::KeyNotFound("party not exists".to_string()));
}
