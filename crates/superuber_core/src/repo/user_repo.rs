//! User repository contract and SQLite implementation.
//!
//! # Invariants
//! - `create_user` and `update_user` validate before writing.
//! - `update_user` and `delete_user` check existence first, inside the same
//!   transaction as the mutation, so `NotFound` wins over validation errors.

use super::{bool_to_int, ensure_table, int_to_bool, row_exists, EntityKind, RepoError, RepoResult};
use crate::model::user::{NewUser, StoredCredential, User, UserChanges, UserId};
use rusqlite::{params, Connection, Row};

const USER_SELECT_SQL: &str = "SELECT
    id,
    email,
    password,
    name,
    phone,
    confirmed_email
FROM users";

/// Repository interface for user CRUD and credential lookup.
pub trait UserRepository {
    fn list_users(&self) -> RepoResult<Vec<User>>;
    fn get_user(&self, id: UserId) -> RepoResult<User>;
    fn create_user(&self, user: &NewUser) -> RepoResult<User>;
    fn update_user(&self, id: UserId, changes: &UserChanges) -> RepoResult<User>;
    /// Removes the row and returns its id. Deleting twice yields `NotFound`.
    fn delete_user(&self, id: UserId) -> RepoResult<UserId>;
    /// Stored credentials whose email matches exactly (case-sensitive).
    fn credentials_for_email(&self, email: &str) -> RepoResult<Vec<StoredCredential>>;
}

impl<T: UserRepository + ?Sized> UserRepository for &T {
    fn list_users(&self) -> RepoResult<Vec<User>> {
        (**self).list_users()
    }

    fn get_user(&self, id: UserId) -> RepoResult<User> {
        (**self).get_user(id)
    }

    fn create_user(&self, user: &NewUser) -> RepoResult<User> {
        (**self).create_user(user)
    }

    fn update_user(&self, id: UserId, changes: &UserChanges) -> RepoResult<User> {
        (**self).update_user(id, changes)
    }

    fn delete_user(&self, id: UserId) -> RepoResult<UserId> {
        (**self).delete_user(id)
    }

    fn credentials_for_email(&self, email: &str) -> RepoResult<Vec<StoredCredential>> {
        (**self).credentials_for_email(email)
    }
}

/// SQLite-backed user repository.
pub struct SqliteUserRepository<'conn> {
    conn: &'conn Connection,
}

impl<'conn> SqliteUserRepository<'conn> {
    /// Constructs a repository after checking the `users` table exists.
    pub fn try_new(conn: &'conn Connection) -> RepoResult<Self> {
        ensure_table(conn, "users")?;
        Ok(Self { conn })
    }
}

impl UserRepository for SqliteUserRepository<'_> {
    fn list_users(&self) -> RepoResult<Vec<User>> {
        let mut stmt = self
            .conn
            .prepare(&format!("{USER_SELECT_SQL} ORDER BY id ASC;"))?;
        let mut rows = stmt.query([])?;
        let mut users = Vec::new();
        while let Some(row) = rows.next()? {
            users.push(parse_user_row(row)?);
        }
        Ok(users)
    }

    fn get_user(&self, id: UserId) -> RepoResult<User> {
        load_user(self.conn, id)?.ok_or(RepoError::NotFound {
            entity: EntityKind::User,
            id,
        })
    }

    fn create_user(&self, user: &NewUser) -> RepoResult<User> {
        user.validate()?;

        self.conn.execute(
            "INSERT INTO users (email, password) VALUES (?1, ?2);",
            params![user.email.as_str(), user.password.as_str()],
        )?;

        Ok(User {
            id: self.conn.last_insert_rowid(),
            email: user.email.clone(),
            password: user.password.clone(),
            name: String::new(),
            phone: String::new(),
            confirmed_email: false,
        })
    }

    fn update_user(&self, id: UserId, changes: &UserChanges) -> RepoResult<User> {
        let tx = self.conn.unchecked_transaction()?;
        if !row_exists(&tx, "users", id)? {
            return Err(RepoError::NotFound {
                entity: EntityKind::User,
                id,
            });
        }
        changes.validate()?;

        tx.execute(
            "UPDATE users
             SET
                email = ?1,
                password = ?2,
                name = ?3,
                phone = ?4,
                confirmed_email = ?5
             WHERE id = ?6;",
            params![
                changes.email.as_str(),
                changes.password.as_str(),
                changes.name.as_str(),
                changes.phone.as_str(),
                bool_to_int(changes.confirmed_email),
                id,
            ],
        )?;
        tx.commit()?;

        Ok(User {
            id,
            email: changes.email.clone(),
            password: changes.password.clone(),
            name: changes.name.clone(),
            phone: changes.phone.clone(),
            confirmed_email: changes.confirmed_email,
        })
    }

    fn delete_user(&self, id: UserId) -> RepoResult<UserId> {
        let tx = self.conn.unchecked_transaction()?;
        if !row_exists(&tx, "users", id)? {
            return Err(RepoError::NotFound {
                entity: EntityKind::User,
                id,
            });
        }
        tx.execute("DELETE FROM users WHERE id = ?1;", [id])?;
        tx.commit()?;
        Ok(id)
    }

    fn credentials_for_email(&self, email: &str) -> RepoResult<Vec<StoredCredential>> {
        let mut stmt = self
            .conn
            .prepare("SELECT id, password FROM users WHERE email = ?1 ORDER BY id ASC;")?;
        let credentials = stmt
            .query_map([email], |row| {
                Ok(StoredCredential {
                    user_id: row.get("id")?,
                    password: row.get("password")?,
                })
            })?
            .collect::<Result<Vec<_>, _>>()?;
        Ok(credentials)
    }
}

fn load_user(conn: &Connection, id: UserId) -> RepoResult<Option<User>> {
    let mut stmt = conn.prepare(&format!("{USER_SELECT_SQL} WHERE id = ?1;"))?;
    let mut rows = stmt.query([id])?;
    match rows.next()? {
        Some(row) => Ok(Some(parse_user_row(row)?)),
        None => Ok(None),
    }
}

fn parse_user_row(row: &Row<'_>) -> RepoResult<User> {
    let confirmed_email = int_to_bool("users", "confirmed_email", row.get("confirmed_email")?)?;
    Ok(User {
        id: row.get("id")?,
        email: row.get("email")?,
        password: row.get("password")?,
        name: row.get("name")?,
        phone: row.get("phone")?,
        confirmed_email,
    })
}

