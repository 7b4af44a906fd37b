use scholar_types::models::{Role, User};
use tracing::warn;

/// Database row type — maps directly to a SQLite `users` row. Distinct
/// from the scholar-types API model to keep the store layer independent;
/// this is the only place the password hash lives.
#[derive(Debug, Clone)]
pub struct UserRow {
    pub id: String,
    pub email: String,
    pub name: String,
    pub password: String,
    pub role: String,
    pub institution: String,
    pub department: Option<String>,
    pub created_at: String,
}

/// Insert payload for a new user. The password arrives already hashed;
/// plaintext never reaches the store.
#[derive(Debug, Clone)]
pub struct NewUser {
    pub id: String,
    pub email: String,
    pub name: String,
    pub password_hash: String,
    pub role: Role,
    pub institution: String,
    pub department: Option<String>,
}

impl UserRow {
    /// Convert to the public API shape, dropping the password hash. Fails
    /// on a corrupt id or role; a malformed timestamp is tolerated since
    /// SQLite's `datetime('now')` and RFC 3339 strings both occur.
    pub fn to_user(&self) -> anyhow::Result<User> {
        let id = self
            .id
            .parse()
            .map_err(|e| anyhow::anyhow!("Corrupt user id '{}': {}", self.id, e))?;
        let role = Role::parse(&self.role)
            .ok_or_else(|| anyhow::anyhow!("Unknown role '{}' on user '{}'", self.role, self.id))?;

        let created_at = self
            .created_at
            .parse::<chrono::DateTime<chrono::Utc>>()
            .or_else(|_| {
                chrono::NaiveDateTime::parse_from_str(&self.created_at, "%Y-%m-%d %H:%M:%S")
                    .map(|dt| dt.and_utc())
            })
            .unwrap_or_else(|e| {
                warn!(
                    "Corrupt created_at '{}' on user '{}': {}",
                    self.created_at, self.id, e
                );
                chrono::DateTime::default()
            });

        Ok(User {
            id,
            name: self.name.clone(),
            email: self.email.clone(),
            role,
            institution: self.institution.clone(),
            department: self.department.clone(),
            created_at,
        })
    }
}
