//! In-Memory Store
//!
//! Process-local implementation of the account store, staff directory, and
//! session store. Records sit behind per-key mutexes so concurrent requests
//! for the same account or handle serialize, while independent keys proceed
//! in parallel. Expiry is evaluated lazily on access; there is no sweeper.

use std::collections::{HashMap, HashSet};
use std::sync::Arc;

use crate::domain::entity::account::Account;
use crate::domain::entity::session::{SessionId, SessionPhase, SessionRecord, TouchOutcome};
use crate::domain::repository::{AccountStore, SessionStore, StaffDirectory};
use crate::domain::value_object::email::Email;
use crate::domain::value_object::staff_id::StaffId;
use crate::error::{AuthError, AuthResult};
use chrono::{Duration, Utc};
use tokio::sync::{Mutex, RwLock};

/// Accounts plus the set of staff IDs they have claimed, guarded together
/// so the uniqueness check and insert are one atomic step.
#[derive(Default)]
struct AccountsInner {
    by_email: HashMap<Email, Arc<Mutex<Account>>>,
    claimed_staff_ids: HashSet<StaffId>,
}

/// In-memory backing store for accounts, the staff directory, and sessions
pub struct MemoryStore {
    accounts: RwLock<AccountsInner>,
    directory: RwLock<HashSet<StaffId>>,
    sessions: RwLock<HashMap<SessionId, Arc<Mutex<SessionRecord>>>>,
    pending_ttl: Duration,
    idle_timeout: Duration,
}

impl MemoryStore {
    pub fn new(pending_ttl: Duration, idle_timeout: Duration) -> Self {
        Self {
            accounts: RwLock::new(AccountsInner::default()),
            directory: RwLock::new(HashSet::new()),
            sessions: RwLock::new(HashMap::new()),
            pending_ttl,
            idle_timeout,
        }
    }

    /// Register staff IDs eligible for signup
    pub async fn seed_staff_ids<I>(&self, ids: I)
    where
        I: IntoIterator<Item = StaffId>,
    {
        let mut directory = self.directory.write().await;
        directory.extend(ids);
    }

    fn is_expired(&self, record: &SessionRecord) -> bool {
        record.is_expired(Utc::now(), self.pending_ttl, self.idle_timeout)
    }
}

impl Default for MemoryStore {
    fn default() -> Self {
        Self::new(Duration::minutes(10), Duration::minutes(30))
    }
}

impl AccountStore for MemoryStore {
    async fn create(&self, account: Account) -> AuthResult<()> {
        let mut inner = self.accounts.write().await;

        if inner.by_email.contains_key(&account.email) {
            return Err(AuthError::EmailTaken);
        }
        if inner.claimed_staff_ids.contains(&account.staff_id) {
            return Err(AuthError::StaffIdTaken);
        }

        inner.claimed_staff_ids.insert(account.staff_id.clone());
        inner
            .by_email
            .insert(account.email.clone(), Arc::new(Mutex::new(account)));

        Ok(())
    }

    async fn find(&self, email: &Email) -> AuthResult<Option<Account>> {
        let entry = self.accounts.read().await.by_email.get(email).cloned();
        match entry {
            Some(entry) => Ok(Some(entry.lock().await.clone())),
            None => Ok(None),
        }
    }

    async fn staff_id_registered(&self, staff_id: &StaffId) -> AuthResult<bool> {
        Ok(self
            .accounts
            .read()
            .await
            .claimed_staff_ids
            .contains(staff_id))
    }

    async fn mutate<F, R>(&self, email: &Email, f: F) -> AuthResult<Option<R>>
    where
        F: FnOnce(&mut Account) -> R + Send,
        R: Send,
    {
        let entry = self.accounts.read().await.by_email.get(email).cloned();
        let Some(entry) = entry else {
            return Ok(None);
        };

        let mut account = entry.lock().await;
        Ok(Some(f(&mut account)))
    }
}

impl StaffDirectory for MemoryStore {
    async fn is_valid_staff_id(&self, staff_id: &StaffId) -> AuthResult<bool> {
        Ok(self.directory.read().await.contains(staff_id))
    }
}

impl SessionStore for MemoryStore {
    async fn create(&self, record: SessionRecord) -> AuthResult<SessionId> {
        let mut sessions = self.sessions.write().await;
        // 256-bit IDs do not collide in practice; the loop is for correctness
        let mut id = SessionId::generate();
        while sessions.contains_key(&id) {
            id = SessionId::generate();
        }
        sessions.insert(id.clone(), Arc::new(Mutex::new(record)));
        Ok(id)
    }

    async fn get(&self, id: &SessionId) -> AuthResult<Option<SessionRecord>> {
        let entry = self.sessions.read().await.get(id).cloned();
        let Some(entry) = entry else {
            return Ok(None);
        };

        let record = entry.lock().await;
        if self.is_expired(&record) {
            drop(record);
            self.sessions.write().await.remove(id);
            return Ok(None);
        }

        Ok(Some(record.clone()))
    }

    async fn transition(
        &self,
        id: &SessionId,
        phase: SessionPhase,
    ) -> AuthResult<Option<SessionRecord>> {
        let entry = self.sessions.read().await.get(id).cloned();
        let Some(entry) = entry else {
            return Ok(None);
        };

        let mut record = entry.lock().await;
        if self.is_expired(&record) {
            drop(record);
            self.sessions.write().await.remove(id);
            return Ok(None);
        }

        record.transition(phase);
        Ok(Some(record.clone()))
    }

    async fn touch(&self, id: &SessionId) -> AuthResult<TouchOutcome> {
        let entry = self.sessions.read().await.get(id).cloned();
        let Some(entry) = entry else {
            return Ok(TouchOutcome::Missing);
        };

        let mut record = entry.lock().await;
        if self.is_expired(&record) {
            let idled_out = record.phase.is_authenticated();
            drop(record);
            self.sessions.write().await.remove(id);
            return Ok(if idled_out {
                TouchOutcome::TimedOut
            } else {
                TouchOutcome::Missing
            });
        }

        record.last_activity_at = Utc::now();
        Ok(TouchOutcome::Active(record.clone()))
    }

    async fn destroy(&self, id: &SessionId) -> AuthResult<()> {
        self.sessions.write().await.remove(id);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::value_object::department::Department;
    use crate::domain::value_object::password::{PasswordHash, RawPassword};
    use crate::domain::value_object::totp_secret::TotpSecret;

    fn test_account(email: &str, staff_id: &str) -> Account {
        let raw = RawPassword::new("TestPassword123!".to_string()).unwrap();
        Account::new(
            Email::new(email).unwrap(),
            "Test User".to_string(),
            StaffId::new(staff_id).unwrap(),
            Department::new("IT").unwrap(),
            PasswordHash::from_raw(&raw, None).unwrap(),
            TotpSecret::generate(),
        )
    }

    #[tokio::test]
    async fn test_create_and_find() {
        let store = MemoryStore::default();
        let email = Email::new("user@example.com").unwrap();

        AccountStore::create(&store, test_account("user@example.com", "S1")).await.unwrap();

        let found = store.find(&email).await.unwrap().unwrap();
        assert_eq!(found.email, email);
        assert!(store
            .staff_id_registered(&StaffId::new("S1").unwrap())
            .await
            .unwrap());
    }

    #[tokio::test]
    async fn test_duplicate_email_rejected() {
        let store = MemoryStore::default();

        AccountStore::create(&store, test_account("user@example.com", "S1")).await.unwrap();
        let err = AccountStore::create(&store, test_account("user@example.com", "S2"))
            .await
            .unwrap_err();
        assert!(matches!(err, AuthError::EmailTaken));
    }

    #[tokio::test]
    async fn test_duplicate_staff_id_rejected() {
        let store = MemoryStore::default();

        AccountStore::create(&store, test_account("a@example.com", "S1")).await.unwrap();
        let err = AccountStore::create(&store, test_account("b@example.com", "S1"))
            .await
            .unwrap_err();
        assert!(matches!(err, AuthError::StaffIdTaken));
    }

    #[tokio::test]
    async fn test_concurrent_signup_same_staff_id_single_winner() {
        let store = Arc::new(MemoryStore::default());

        let mut handles = Vec::new();
        for i in 0..8 {
            let store = store.clone();
            handles.push(tokio::spawn(async move {
                AccountStore::create(
                    store.as_ref(),
                    test_account(&format!("user{}@example.com", i), "S1"))
                    .await
            }));
        }

        let mut winners = 0;
        let mut conflicts = 0;
        for handle in handles {
            match handle.await.unwrap() {
                Ok(()) => winners += 1,
                Err(AuthError::StaffIdTaken) => conflicts += 1,
                Err(other) => panic!("unexpected error: {other:?}"),
            }
        }
        assert_eq!(winners, 1);
        assert_eq!(conflicts, 7);
    }

    #[tokio::test]
    async fn test_mutate_serializes_per_account() {
        let store = Arc::new(MemoryStore::default());
        AccountStore::create(store.as_ref(), test_account("user@example.com", "S1")).await.unwrap();
        let email = Email::new("user@example.com").unwrap();

        let mut handles = Vec::new();
        for _ in 0..50 {
            let store = store.clone();
            let email = email.clone();
            handles.push(tokio::spawn(async move {
                store
                    .mutate(&email, |account| account.failed_attempts += 1)
                    .await
            }));
        }
        for handle in handles {
            handle.await.unwrap().unwrap().unwrap();
        }

        let account = store.find(&email).await.unwrap().unwrap();
        assert_eq!(account.failed_attempts, 50);
    }

    #[tokio::test]
    async fn test_mutate_missing_account() {
        let store = MemoryStore::default();
        let email = Email::new("nobody@example.com").unwrap();

        let result = store.mutate(&email, |_| ()).await.unwrap();
        assert!(result.is_none());
    }

    #[tokio::test]
    async fn test_directory_seeding() {
        let store = MemoryStore::default();
        let s1 = StaffId::new("S1").unwrap();

        assert!(!store.is_valid_staff_id(&s1).await.unwrap());
        store.seed_staff_ids([s1.clone()]).await;
        assert!(store.is_valid_staff_id(&s1).await.unwrap());
    }

    #[tokio::test]
    async fn test_session_lifecycle() {
        let store = MemoryStore::default();

        let id = SessionStore::create(
            &store,
            SessionRecord::new(SessionPhase::Anonymous))
            .await
            .unwrap();
        assert!(SessionStore::get(&store, &id).await.unwrap().is_some());

        store.destroy(&id).await.unwrap();
        assert!(SessionStore::get(&store, &id).await.unwrap().is_none());
        assert!(matches!(
            store.touch(&id).await.unwrap(),
            TouchOutcome::Missing
        ));
    }

    #[tokio::test]
    async fn test_expired_pending_session_fails_closed() {
        // Zero TTL: every pending session is expired on first access
        let store = MemoryStore::new(Duration::zero(), Duration::minutes(30));

        let id = SessionStore::create(
            &store,
            SessionRecord::new(SessionPhase::PendingLogin {
                email: Email::new("user@example.com").unwrap(),
            }))
            .await
            .unwrap();

        assert!(SessionStore::get(&store, &id).await.unwrap().is_none());
        // Expired pending records are indistinguishable from unknown handles
        assert!(matches!(
            store.touch(&id).await.unwrap(),
            TouchOutcome::Missing
        ));
    }

    #[tokio::test]
    async fn test_idled_out_authenticated_session_reports_timeout() {
        let store = MemoryStore::new(Duration::minutes(10), Duration::zero());

        let id = SessionStore::create(
            &store,
            SessionRecord::new(SessionPhase::Authenticated {
                email: Email::new("user@example.com").unwrap(),
                full_name: "Test User".to_string(),
                staff_id: StaffId::new("S1").unwrap(),
                department: Department::new("IT").unwrap(),
            }))
            .await
            .unwrap();

        assert!(matches!(
            store.touch(&id).await.unwrap(),
            TouchOutcome::TimedOut
        ));
        // Destroyed on the way out; a second probe sees nothing
        assert!(matches!(
            store.touch(&id).await.unwrap(),
            TouchOutcome::Missing
        ));
    }

    #[tokio::test]
    async fn test_transition_replaces_phase() {
        let store = MemoryStore::default();

        let id = SessionStore::create(
            &store,
            SessionRecord::new(SessionPhase::Anonymous))
            .await
            .unwrap();

        let updated = store
            .transition(
                &id,
                SessionPhase::PendingLogin {
                    email: Email::new("user@example.com").unwrap(),
                },
            )
            .await
            .unwrap()
            .unwrap();

        assert!(matches!(updated.phase, SessionPhase::PendingLogin { .. }));
    }
}
