//! In-memory demo backend, seeded with the three demo accounts. Selected
//! at startup via configuration; the demo surface is this explicit store
//! implementation rather than ambient mock state.

use std::sync::Mutex;

use chrono::Utc;
use scholar_types::models::Role;

use crate::models::{NewUser, UserRow};
use crate::{StoreError, UserStore};

/// Demo accounts the login screen advertises. Any password is accepted
/// for them, which is the demo-mode contract.
const SEED_USERS: &[(&str, &str, &str, Role, &str)] = &[
    (
        "00000000-0000-0000-0000-000000000001",
        "admin@demo.com",
        "Admin User",
        Role::Admin,
        "Computer Science",
    ),
    (
        "00000000-0000-0000-0000-000000000002",
        "editor@demo.com",
        "Editor User",
        Role::Editor,
        "Physics",
    ),
    (
        "00000000-0000-0000-0000-000000000003",
        "reviewer@demo.com",
        "Reviewer User",
        Role::Reviewer,
        "Mathematics",
    ),
];

pub struct DemoStore {
    users: Mutex<Vec<UserRow>>,
}

impl DemoStore {
    pub fn seeded() -> Self {
        let now = Utc::now().to_rfc3339();
        let users = SEED_USERS
            .iter()
            .map(|(id, email, name, role, department)| UserRow {
                id: (*id).to_string(),
                email: (*email).to_string(),
                name: (*name).to_string(),
                // Never checked; the demo store accepts any password.
                password: "$demo$".to_string(),
                role: role.as_str().to_string(),
                institution: "Demo University".to_string(),
                department: Some((*department).to_string()),
                created_at: now.clone(),
            })
            .collect();

        Self {
            users: Mutex::new(users),
        }
    }

    fn lock(&self) -> Result<std::sync::MutexGuard<'_, Vec<UserRow>>, StoreError> {
        self.users
            .lock()
            .map_err(|e| StoreError::Other(anyhow::anyhow!("Demo store lock poisoned: {}", e)))
    }
}

impl UserStore for DemoStore {
    fn create_user(&self, new: &NewUser) -> Result<UserRow, StoreError> {
        let mut users = self.lock()?;
        if users.iter().any(|u| u.email == new.email) {
            return Err(StoreError::DuplicateEmail);
        }

        let row = UserRow {
            id: new.id.clone(),
            email: new.email.clone(),
            name: new.name.clone(),
            password: new.password_hash.clone(),
            role: new.role.as_str().to_string(),
            institution: new.institution.clone(),
            department: new.department.clone(),
            created_at: Utc::now().to_rfc3339(),
        };
        users.push(row.clone());
        Ok(row)
    }

    fn find_by_email(&self, email: &str) -> Result<Option<UserRow>, StoreError> {
        Ok(self.lock()?.iter().find(|u| u.email == email).cloned())
    }

    fn find_by_id(&self, id: &str) -> Result<Option<UserRow>, StoreError> {
        Ok(self.lock()?.iter().find(|u| u.id == id).cloned())
    }

    fn list_users(&self) -> Result<Vec<UserRow>, StoreError> {
        Ok(self.lock()?.clone())
    }

    fn verify_password(&self, _user: &UserRow, _candidate: &str) -> Result<bool, StoreError> {
        // Demo mode accepts any password for any known account.
        Ok(true)
    }
}
