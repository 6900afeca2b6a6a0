//! User repository over a Postgres transaction
//!
//! Every query runs inside the session's transaction:
//! - reads see the session's own uncommitted writes
//! - dropping the session without `commit` rolls everything back

use async_trait::async_trait;
use sqlx::{PgPool, Postgres, Transaction};

use crate::db::schema;
use crate::db::session::{Gateway, StoreError, UserSession};
use crate::models::{NewUser, User};

/// Gateway backed by a shared `PgPool`
#[derive(Clone)]
pub struct PgGateway {
    pool: PgPool,
}

impl PgGateway {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl Gateway for PgGateway {
    async fn session(&self) -> Result<Box<dyn UserSession>, StoreError> {
        let tx = self.pool.begin().await?;
        Ok(Box::new(PgUserSession { tx }))
    }

    async fn ensure_schema(&self) -> Result<(), StoreError> {
        schema::ensure(&self.pool).await?;
        Ok(())
    }
}

/// One request's unit of work
pub struct PgUserSession {
    tx: Transaction<'static, Postgres>,
}

#[async_trait]
impl UserSession for PgUserSession {
    async fn all(&mut self) -> Result<Vec<User>, StoreError> {
        let users = sqlx::query_as::<_, User>("SELECT id, name, email FROM users ORDER BY id")
            .fetch_all(&mut *self.tx)
            .await?;
        Ok(users)
    }

    async fn by_id(&mut self, id: i32) -> Result<Option<User>, StoreError> {
        let user = sqlx::query_as::<_, User>("SELECT id, name, email FROM users WHERE id = $1")
            .bind(id)
            .fetch_optional(&mut *self.tx)
            .await?;
        Ok(user)
    }

    async fn by_email(&mut self, email: &str) -> Result<Option<User>, StoreError> {
        let user = sqlx::query_as::<_, User>(
            "SELECT id, name, email FROM users WHERE email = $1 ORDER BY id LIMIT 1",
        )
        .bind(email)
        .fetch_optional(&mut *self.tx)
        .await?;
        Ok(user)
    }

    async fn insert(&mut self, user: &NewUser) -> Result<User, StoreError> {
        let row = sqlx::query_as::<_, User>(
            r#"
            INSERT INTO users (name, email)
            VALUES ($1, $2)
            RETURNING id, name, email
            "#,
        )
        .bind(&user.name)
        .bind(&user.email)
        .fetch_one(&mut *self.tx)
        .await?;
        Ok(row)
    }

    async fn update(&mut self, user: &User) -> Result<User, StoreError> {
        // The handler looked the row up in this same transaction, so a miss
        // here means it was deleted concurrently; fetch_one reports RowNotFound.
        let row = sqlx::query_as::<_, User>(
            r#"
            UPDATE users SET name = $1, email = $2
            WHERE id = $3
            RETURNING id, name, email
            "#,
        )
        .bind(&user.name)
        .bind(&user.email)
        .bind(user.id)
        .fetch_one(&mut *self.tx)
        .await?;
        Ok(row)
    }

    async fn delete(&mut self, id: i32) -> Result<(), StoreError> {
        sqlx::query("DELETE FROM users WHERE id = $1")
            .bind(id)
            .execute(&mut *self.tx)
            .await?;
        Ok(())
    }

    async fn commit(self: Box<Self>) -> Result<(), StoreError> {
        self.tx.commit().await?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Settings;
    use crate::db::create_pool;

    // Integration tests - run with DATABASE_URL set
    // cargo test -p userbase-server -- --ignored

    async fn gateway() -> PgGateway {
        let url = std::env::var("DATABASE_URL").expect("DATABASE_URL required");
        let pool = create_pool(&Settings::new(url))
            .await
            .expect("pool creation failed");
        let gateway = PgGateway::new(pool);
        gateway.ensure_schema().await.expect("schema");
        gateway
    }

    #[tokio::test]
    #[ignore = "requires database"]
    async fn ensure_schema_is_idempotent() {
        let gateway = gateway().await;
        gateway.ensure_schema().await.expect("second run");
    }

    #[tokio::test]
    #[ignore = "requires database"]
    async fn uncommitted_insert_is_rolled_back() {
        let gateway = gateway().await;
        let email = "rollback-check@userbase.test";

        {
            let mut session = gateway.session().await.unwrap();
            let user = session
                .insert(&NewUser {
                    name: "rollback".into(),
                    email: email.into(),
                })
                .await
                .unwrap();
            assert!(user.id > 0);
            assert!(session.by_email(email).await.unwrap().is_some());
        }

        let mut session = gateway.session().await.unwrap();
        assert!(session.by_email(email).await.unwrap().is_none());
    }

    #[tokio::test]
    #[ignore = "requires database"]
    async fn committed_update_and_delete() {
        let gateway = gateway().await;

        let mut session = gateway.session().await.unwrap();
        let mut user = session
            .insert(&NewUser {
                name: "before".into(),
                email: "update-check@userbase.test".into(),
            })
            .await
            .unwrap();
        session.commit().await.unwrap();

        let mut session = gateway.session().await.unwrap();
        user.name = "after".into();
        let updated = session.update(&user).await.unwrap();
        assert_eq!(updated.name, "after");
        session.delete(user.id).await.unwrap();
        session.commit().await.unwrap();

        let mut session = gateway.session().await.unwrap();
        assert!(session.by_id(user.id).await.unwrap().is_none());
    }
}
