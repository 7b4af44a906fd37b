use anyhow::{Result, anyhow};
use argon2::{Argon2, PasswordHash, PasswordVerifier};
use rusqlite::Connection;

use crate::models::{NewUser, UserRow};
use crate::{Database, StoreError, UserStore};

impl UserStore for Database {
    fn create_user(&self, new: &NewUser) -> Result<UserRow, StoreError> {
        self.with_conn(|conn| {
            conn.execute(
                "INSERT INTO users (id, email, name, password, role, institution, department)
                 VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)",
                rusqlite::params![
                    new.id,
                    new.email,
                    new.name,
                    new.password_hash,
                    new.role.as_str(),
                    new.institution,
                    new.department,
                ],
            )?;

            // Re-read to pick up the created_at default.
            query_user_by_id(conn, &new.id)?
                .ok_or_else(|| anyhow!("User '{}' vanished after insert", new.id))
        })
        .map_err(map_insert_err)
    }

    fn find_by_email(&self, email: &str) -> Result<Option<UserRow>, StoreError> {
        self.with_conn(|conn| query_user_by_email(conn, email))
            .map_err(StoreError::Other)
    }

    fn find_by_id(&self, id: &str) -> Result<Option<UserRow>, StoreError> {
        self.with_conn(|conn| query_user_by_id(conn, id))
            .map_err(StoreError::Other)
    }

    fn list_users(&self) -> Result<Vec<UserRow>, StoreError> {
        self.with_conn(query_all_users).map_err(StoreError::Other)
    }

    fn verify_password(&self, user: &UserRow, candidate: &str) -> Result<bool, StoreError> {
        let parsed = PasswordHash::new(&user.password)
            .map_err(|e| anyhow!("Stored hash for '{}' is malformed: {}", user.id, e))?;

        Ok(Argon2::default()
            .verify_password(candidate.as_bytes(), &parsed)
            .is_ok())
    }
}

/// A UNIQUE violation on insert means the email is taken; whichever of two
/// concurrent registrations commits first wins and the loser surfaces as a
/// conflict.
fn map_insert_err(e: anyhow::Error) -> StoreError {
    if let Some(rusqlite::Error::SqliteFailure(failure, _)) = e.downcast_ref::<rusqlite::Error>() {
        if failure.code == rusqlite::ErrorCode::ConstraintViolation {
            return StoreError::DuplicateEmail;
        }
    }
    StoreError::Other(e)
}

const USER_COLUMNS: &str = "id, email, name, password, role, institution, department, created_at";

fn row_to_user(row: &rusqlite::Row<'_>) -> rusqlite::Result<UserRow> {
    Ok(UserRow {
        id: row.get(0)?,
        email: row.get(1)?,
        name: row.get(2)?,
        password: row.get(3)?,
        role: row.get(4)?,
        institution: row.get(5)?,
        department: row.get(6)?,
        created_at: row.get(7)?,
    })
}

fn query_user_by_email(conn: &Connection, email: &str) -> Result<Option<UserRow>> {
    let mut stmt = conn.prepare(&format!(
        "SELECT {USER_COLUMNS} FROM users WHERE email = ?1"
    ))?;

    let row = stmt.query_row([email], |row| row_to_user(row)).optional()?;

    Ok(row)
}

fn query_user_by_id(conn: &Connection, id: &str) -> Result<Option<UserRow>> {
    let mut stmt = conn.prepare(&format!("SELECT {USER_COLUMNS} FROM users WHERE id = ?1"))?;

    let row = stmt.query_row([id], |row| row_to_user(row)).optional()?;

    Ok(row)
}

fn query_all_users(conn: &Connection) -> Result<Vec<UserRow>> {
    let mut stmt = conn.prepare(&format!(
        "SELECT {USER_COLUMNS} FROM users ORDER BY created_at DESC, id"
    ))?;

    let rows = stmt
        .query_map([], |row| row_to_user(row))?
        .collect::<std::result::Result<Vec<_>, _>>()?;

    Ok(rows)
}

/// Extension trait for optional query results
trait OptionalExt<T> {
    fn optional(self) -> Result<Option<T>>;
}

impl<T> OptionalExt<T> for std::result::Result<T, rusqlite::Error> {
    fn optional(self) -> Result<Option<T>> {
        match self {
            Ok(val) => Ok(Some(val)),
            Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
            Err(e) => Err(e.into()),
        }
    }
}
