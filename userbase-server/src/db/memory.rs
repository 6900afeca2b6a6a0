//! In-memory gateway for router tests
//!
//! Each session works on a private copy of the table and publishes it on
//! commit, so a dropped session leaves no trace. Failure switches let tests
//! drive the 500 paths.

use std::collections::BTreeMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use async_trait::async_trait;

use crate::db::session::{Gateway, StoreError, UserSession};
use crate::models::{NewUser, User};

/// Reported the way sqlx reports a broken socket.
fn io_failure(message: &str) -> StoreError {
    StoreError::Sqlx(sqlx::Error::Io(std::io::Error::other(message.to_owned())))
}

#[derive(Debug, Clone, Default)]
struct Table {
    next_id: i32,
    rows: BTreeMap<i32, User>,
}

#[derive(Default)]
struct Shared {
    table: Mutex<Table>,
    open_sessions: AtomicUsize,
}

#[derive(Clone, Default)]
pub(crate) struct MemoryGateway {
    shared: Arc<Shared>,
    refuse_sessions: bool,
    fail_queries: bool,
    fail_schema: bool,
}

impl MemoryGateway {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    /// Every `session()` call fails.
    pub(crate) fn unreachable() -> Self {
        Self {
            refuse_sessions: true,
            ..Self::default()
        }
    }

    /// Sessions open but every query fails.
    pub(crate) fn broken() -> Self {
        Self {
            fail_queries: true,
            ..Self::default()
        }
    }

    /// `ensure_schema` fails.
    pub(crate) fn without_schema() -> Self {
        Self {
            fail_schema: true,
            ..Self::default()
        }
    }

    /// Sessions currently alive.
    pub(crate) fn open_sessions(&self) -> usize {
        self.shared.open_sessions.load(Ordering::SeqCst)
    }

    /// Committed rows, ordered by id.
    pub(crate) fn rows(&self) -> Vec<User> {
        let table = self.shared.table.lock().expect("table lock poisoned");
        table.rows.values().cloned().collect()
    }
}

#[async_trait]
impl Gateway for MemoryGateway {
    async fn session(&self) -> Result<Box<dyn UserSession>, StoreError> {
        if self.refuse_sessions {
            return Err(io_failure("connection refused"));
        }

        let snapshot = self.shared.table.lock().expect("table lock poisoned").clone();
        self.shared.open_sessions.fetch_add(1, Ordering::SeqCst);

        Ok(Box::new(MemorySession {
            shared: Arc::clone(&self.shared),
            working: snapshot,
            fail_queries: self.fail_queries,
        }))
    }

    async fn ensure_schema(&self) -> Result<(), StoreError> {
        if self.fail_schema {
            return Err(io_failure("permission denied for schema public"));
        }
        Ok(())
    }
}

struct MemorySession {
    shared: Arc<Shared>,
    working: Table,
    fail_queries: bool,
}

impl MemorySession {
    fn check(&self) -> Result<(), StoreError> {
        if self.fail_queries {
            Err(io_failure("server closed the connection unexpectedly"))
        } else {
            Ok(())
        }
    }
}

impl Drop for MemorySession {
    fn drop(&mut self) {
        self.shared.open_sessions.fetch_sub(1, Ordering::SeqCst);
    }
}

#[async_trait]
impl UserSession for MemorySession {
    async fn all(&mut self) -> Result<Vec<User>, StoreError> {
        self.check()?;
        Ok(self.working.rows.values().cloned().collect())
    }

    async fn by_id(&mut self, id: i32) -> Result<Option<User>, StoreError> {
        self.check()?;
        Ok(self.working.rows.get(&id).cloned())
    }

    async fn by_email(&mut self, email: &str) -> Result<Option<User>, StoreError> {
        self.check()?;
        Ok(self
            .working
            .rows
            .values()
            .find(|u| u.email == email)
            .cloned())
    }

    async fn insert(&mut self, user: &NewUser) -> Result<User, StoreError> {
        self.check()?;
        self.working.next_id += 1;
        let row = User {
            id: self.working.next_id,
            name: user.name.clone(),
            email: user.email.clone(),
        };
        self.working.rows.insert(row.id, row.clone());
        Ok(row)
    }

    async fn update(&mut self, user: &User) -> Result<User, StoreError> {
        self.check()?;
        match self.working.rows.get_mut(&user.id) {
            Some(row) => {
                row.name = user.name.clone();
                row.email = user.email.clone();
                Ok(row.clone())
            }
            None => Err(StoreError::Sqlx(sqlx::Error::RowNotFound)),
        }
    }

    async fn delete(&mut self, id: i32) -> Result<(), StoreError> {
        self.check()?;
        self.working.rows.remove(&id);
        Ok(())
    }

    async fn commit(self: Box<Self>) -> Result<(), StoreError> {
        self.check()?;
        let mut table = self.shared.table.lock().expect("table lock poisoned");
        *table = self.working.clone();
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ada() -> NewUser {
        NewUser {
            name: "Ada".into(),
            email: "ada@example.com".into(),
        }
    }

    #[tokio::test]
    async fn dropped_session_discards_writes() {
        let gateway = MemoryGateway::new();
        {
            let mut session = gateway.session().await.unwrap();
            session.insert(&ada()).await.unwrap();
            assert_eq!(gateway.open_sessions(), 1);
        }
        assert_eq!(gateway.open_sessions(), 0);
        assert!(gateway.rows().is_empty());
    }

    #[tokio::test]
    async fn commit_publishes_writes() {
        let gateway = MemoryGateway::new();
        let mut session = gateway.session().await.unwrap();
        let user = session.insert(&ada()).await.unwrap();
        session.commit().await.unwrap();

        assert_eq!(gateway.open_sessions(), 0);
        assert_eq!(gateway.rows(), vec![user]);
    }
}
