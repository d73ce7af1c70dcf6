//! User lookups behind caller identity resolution

use async_trait::async_trait;
use gw_common::types::AppRole;

use super::{map_unique_violation, DbResult, PgStore};
use crate::store::{UserRecord, UserStore};

const USER_COLUMNS: &str = "usr_id::bigint AS usr_id, usr_email, usr_first_name, usr_last_name, usr_admin";

#[derive(Debug, sqlx::FromRow)]
struct UserRow {
    usr_id: i64,
    usr_email: String,
    usr_first_name: Option<String>,
    usr_last_name: Option<String>,
    usr_admin: Option<i32>,
}

impl From<UserRow> for UserRecord {
    fn from(row: UserRow) -> Self {
        let name = [row.usr_first_name, row.usr_last_name]
            .into_iter()
            .flatten()
            .map(|part| part.trim().to_string())
            .filter(|part| !part.is_empty())
            .collect::<Vec<_>>()
            .join(" ");

        Self {
            id: row.usr_id,
            email: row.usr_email,
            name: Some(name).filter(|n| !n.is_empty()),
            role: AppRole::from_admin_level(row.usr_admin.unwrap_or_default()),
        }
    }
}

/// `"Ada Lovelace"` -> `("Ada", "Lovelace")`
fn split_name(name: &str) -> (&str, &str) {
    let name = name.trim();
    match name.split_once(char::is_whitespace) {
        Some((first, last)) => (first, last.trim()),
        None => (name, ""),
    }
}

#[async_trait]
impl UserStore for PgStore {
    async fn user_by_sso_id_and_email(&self, sso_id: &str, email: &str) -> DbResult<Option<UserRecord>> {
        let row = sqlx::query_as::<_, UserRow>(&format!(
            "SELECT {} FROM usr WHERE usr_sso_id = $1 AND lower(usr_email) = lower($2)",
            USER_COLUMNS
        ))
        .bind(sso_id)
        .bind(email)
        .fetch_optional(self.pool())
        .await?;

        Ok(row.map(UserRecord::from))
    }

    async fn sso_id_exists(&self, sso_id: &str) -> DbResult<bool> {
        let exists: bool = sqlx::query_scalar("SELECT EXISTS (SELECT 1 FROM usr WHERE usr_sso_id = $1)")
            .bind(sso_id)
            .fetch_one(self.pool())
            .await?;
        Ok(exists)
    }

    async fn user_by_email(&self, email: &str) -> DbResult<Option<UserRecord>> {
        let row = sqlx::query_as::<_, UserRow>(&format!(
            "SELECT {} FROM usr WHERE lower(usr_email) = lower($1) ORDER BY usr_id LIMIT 1",
            USER_COLUMNS
        ))
        .bind(email)
        .fetch_optional(self.pool())
        .await?;

        Ok(row.map(UserRecord::from))
    }

    #[tracing::instrument(skip(self))]
    async fn link_sso_id(&self, user_id: i64, sso_id: &str) -> DbResult<()> {
        sqlx::query("UPDATE usr SET usr_sso_id = $2 WHERE usr_id = $1")
            .bind(user_id)
            .bind(sso_id)
            .execute(self.pool())
            .await
            .map_err(|e| map_unique_violation(e, "SSO id", sso_id))?;
        Ok(())
    }

    #[tracing::instrument(skip(self, name))]
    async fn create_sso_user(&self, name: &str, email: &str, sso_id: &str) -> DbResult<UserRecord> {
        let (first, last) = split_name(name);
        let row = sqlx::query_as::<_, UserRow>(&format!(
            r#"
            INSERT INTO usr (usr_first_name, usr_last_name, usr_email, usr_sso_id, usr_admin)
            VALUES ($1, $2, $3, $4, 0)
            RETURNING {}
            "#,
            USER_COLUMNS
        ))
        .bind(first)
        .bind(last)
        .bind(email)
        .bind(sso_id)
        .fetch_one(self.pool())
        .await
        .map_err(|e| map_unique_violation(e, "User", email))?;

        tracing::info!(user_id = row.usr_id, "User created from SSO identity");
        Ok(UserRecord::from(row))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_split_name() {
        assert_eq!(split_name("Ada Lovelace"), ("Ada", "Lovelace"));
        assert_eq!(split_name(" ada@example.org "), ("ada@example.org", ""));
        assert_eq!(split_name("Jean  Claude Van"), ("Jean", "Claude Van"));
    }

    #[test]
    fn test_user_row_conversion() {
        let user = UserRecord::from(UserRow {
            usr_id: 3,
            usr_email: "c@example.org".into(),
            usr_first_name: Some("Curie".into()),
            usr_last_name: Some(" ".into()),
            usr_admin: Some(1),
        });
        assert_eq!(user.name.as_deref(), Some("Curie"));
        assert_eq!(user.role, AppRole::Curator);
    }
}
