//! Shared fixtures for integration tests: in-memory repositories, a fast
//! credential hasher and a router wired over them.

#![allow(dead_code)]

use std::sync::atomic::{AtomicI64, AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use axum::Router;
use chrono::{Duration, Utc};
use sea_orm::DatabaseConnection;

use todo_api::api::{create_router, AppState};
use todo_api::domain::{
    AccessLevel, CreateUser, CredentialHasher, Todo, TodoFields, TodoStatus, UpdateUser, User,
};
use todo_api::errors::{AppError, AppResult};
use todo_api::infra::{
    Database, JwtCodec, TodoRepository, TodoStatusRepository, UnitOfWork, UserRepository,
};
use todo_api::services::{Authenticator, Services, TodoManager, TokenManager, UserManager};

pub const SECRET: &[u8] = b"integration-test-secret-key-32-bytes!";

/// Token manager with a one hour default validity.
pub fn tokens() -> Arc<TokenManager> {
    let codec = JwtCodec::new(SECRET).expect("secret is long enough");
    Arc::new(TokenManager::new(Arc::new(codec), Duration::hours(1)))
}

/// Hasher storing `plain$<password>`; counts verifications.
#[derive(Default)]
pub struct PlainHasher {
    pub verifications: AtomicUsize,
}

impl PlainHasher {
    pub fn stored(password: &str) -> String {
        format!("plain${}", password)
    }

    pub fn verifications(&self) -> usize {
        self.verifications.load(Ordering::SeqCst)
    }
}

impl CredentialHasher for PlainHasher {
    fn hash(&self, plain_text: &str) -> AppResult<String> {
        Ok(Self::stored(plain_text))
    }

    fn verify(&self, plain_text: &str, hashed: &str) -> AppResult<bool> {
        self.verifications.fetch_add(1, Ordering::SeqCst);
        Ok(hashed == Self::stored(plain_text))
    }
}

struct StoredUser {
    user: User,
    photo: Option<Vec<u8>>,
}

#[derive(Default)]
pub struct MemoryUsers {
    rows: Mutex<Vec<StoredUser>>,
    next_id: AtomicI64,
}

impl MemoryUsers {
    fn find_by<F: Fn(&User) -> bool>(&self, pred: F) -> Option<User> {
        let rows = self.rows.lock().unwrap();
        rows.iter().map(|r| &r.user).find(|u| pred(u)).cloned()
    }

    fn with_row<T>(&self, id: i64, f: impl FnOnce(&mut StoredUser) -> T) -> AppResult<T> {
        let mut rows = self.rows.lock().unwrap();
        let row = rows
            .iter_mut()
            .find(|r| r.user.id == id)
            .ok_or_else(|| AppError::not_found("User"))?;
        Ok(f(row))
    }
}

#[async_trait]
impl UserRepository for MemoryUsers {
    async fn find_by_id(&self, id: i64) -> AppResult<Option<User>> {
        Ok(self.find_by(|u| u.id == id))
    }

    async fn find_by_username(&self, username: &str) -> AppResult<Option<User>> {
        Ok(self.find_by(|u| u.username.eq_ignore_ascii_case(username)))
    }

    async fn find_by_email(&self, email: &str) -> AppResult<Option<User>> {
        Ok(self.find_by(|u| u.email.eq_ignore_ascii_case(email)))
    }

    async fn create(&self, new_user: CreateUser) -> AppResult<User> {
        let id = self.next_id.fetch_add(1, Ordering::SeqCst) + 1;
        let now = Utc::now();
        let user = User {
            id,
            name: new_user.name,
            username: new_user.username,
            email: new_user.email,
            password_hash: new_user.password_hash,
            access_level: new_user.access_level,
            has_photo: false,
            created_at: now,
            updated_at: now,
        };
        self.rows.lock().unwrap().push(StoredUser {
            user: user.clone(),
            photo: None,
        });
        Ok(user)
    }

    async fn update(&self, id: i64, changes: UpdateUser) -> AppResult<User> {
        self.with_row(id, |row| {
            let user = &mut row.user;
            if let Some(name) = changes.name {
                user.name = name;
            }
            if let Some(username) = changes.username {
                user.username = username;
            }
            if let Some(email) = changes.email {
                user.email = email;
            }
            if let Some(level) = changes.access_level {
                user.access_level = level;
            }
            user.updated_at = Utc::now();
            user.clone()
        })
    }

    async fn update_password(&self, id: i64, password_hash: String) -> AppResult<()> {
        self.with_row(id, |row| row.user.password_hash = password_hash)
    }

    async fn delete(&self, id: i64) -> AppResult<()> {
        let mut rows = self.rows.lock().unwrap();
        let before = rows.len();
        rows.retain(|r| r.user.id != id);
        if rows.len() == before {
            return Err(AppError::not_found("User"));
        }
        Ok(())
    }

    async fn list(&self) -> AppResult<Vec<User>> {
        let rows = self.rows.lock().unwrap();
        Ok(rows.iter().rev().map(|r| r.user.clone()).collect())
    }

    async fn count(&self) -> AppResult<u64> {
        Ok(self.rows.lock().unwrap().len() as u64)
    }

    async fn update_photo(&self, id: i64, photo: Option<Vec<u8>>) -> AppResult<()> {
        self.with_row(id, |row| {
            row.user.has_photo = photo.is_some();
            row.photo = photo;
        })
    }

    async fn find_photo(&self, id: i64) -> AppResult<Option<Vec<u8>>> {
        let rows = self.rows.lock().unwrap();
        Ok(rows
            .iter()
            .find(|r| r.user.id == id)
            .and_then(|r| r.photo.clone()))
    }
}

#[derive(Default)]
pub struct MemoryStatuses {
    rows: Mutex<Vec<TodoStatus>>,
    next_id: AtomicI64,
}

#[async_trait]
impl TodoStatusRepository for MemoryStatuses {
    async fn create(&self, user_id: i64, name: String) -> AppResult<TodoStatus> {
        let now = Utc::now();
        let status = TodoStatus {
            id: self.next_id.fetch_add(1, Ordering::SeqCst) + 1,
            name,
            user_id,
            created_at: now,
            updated_at: now,
        };
        self.rows.lock().unwrap().push(status.clone());
        Ok(status)
    }

    async fn rename(&self, id: i64, name: String) -> AppResult<TodoStatus> {
        let mut rows = self.rows.lock().unwrap();
        let status = rows
            .iter_mut()
            .find(|s| s.id == id)
            .ok_or_else(|| AppError::not_found("Status"))?;
        status.name = name;
        status.updated_at = Utc::now();
        Ok(status.clone())
    }

    async fn find_by_id(&self, id: i64) -> AppResult<Option<TodoStatus>> {
        let rows = self.rows.lock().unwrap();
        Ok(rows.iter().find(|s| s.id == id).cloned())
    }

    async fn find_by_name(&self, user_id: i64, name: &str) -> AppResult<Option<TodoStatus>> {
        let rows = self.rows.lock().unwrap();
        Ok(rows
            .iter()
            .find(|s| s.user_id == user_id && s.name.eq_ignore_ascii_case(name))
            .cloned())
    }

    async fn list_by_user(&self, user_id: i64) -> AppResult<Vec<TodoStatus>> {
        let rows = self.rows.lock().unwrap();
        Ok(rows.iter().filter(|s| s.user_id == user_id).cloned().collect())
    }

    async fn delete(&self, id: i64) -> AppResult<()> {
        let mut rows = self.rows.lock().unwrap();
        let before = rows.len();
        rows.retain(|s| s.id != id);
        if rows.len() == before {
            return Err(AppError::not_found("Status"));
        }
        Ok(())
    }
}

struct StoredTodo {
    todo: Todo,
    image: Option<Vec<u8>>,
}

#[derive(Default)]
pub struct MemoryTodos {
    rows: Mutex<Vec<StoredTodo>>,
    next_id: AtomicI64,
}

#[async_trait]
impl TodoRepository for MemoryTodos {
    async fn create(&self, fields: TodoFields) -> AppResult<Todo> {
        let now = Utc::now();
        let todo = Todo {
            id: self.next_id.fetch_add(1, Ordering::SeqCst) + 1,
            title: fields.title,
            description: fields.description,
            status_id: fields.status_id,
            has_image: false,
            created_at: now,
            updated_at: now,
        };
        self.rows.lock().unwrap().push(StoredTodo {
            todo: todo.clone(),
            image: None,
        });
        Ok(todo)
    }

    async fn update(&self, id: i64, fields: TodoFields) -> AppResult<Todo> {
        let mut rows = self.rows.lock().unwrap();
        let row = rows
            .iter_mut()
            .find(|r| r.todo.id == id)
            .ok_or_else(|| AppError::not_found("Todo"))?;
        row.todo.title = fields.title;
        row.todo.description = fields.description;
        row.todo.status_id = fields.status_id;
        row.todo.updated_at = Utc::now();
        Ok(row.todo.clone())
    }

    async fn find_by_id(&self, id: i64) -> AppResult<Option<Todo>> {
        let rows = self.rows.lock().unwrap();
        Ok(rows.iter().find(|r| r.todo.id == id).map(|r| r.todo.clone()))
    }

    async fn list(&self) -> AppResult<Vec<Todo>> {
        let rows = self.rows.lock().unwrap();
        Ok(rows.iter().map(|r| r.todo.clone()).collect())
    }

    async fn delete(&self, id: i64) -> AppResult<()> {
        let mut rows = self.rows.lock().unwrap();
        let before = rows.len();
        rows.retain(|r| r.todo.id != id);
        if rows.len() == before {
            return Err(AppError::not_found("Todo"));
        }
        Ok(())
    }

    async fn count_by_status(&self, status_id: i64) -> AppResult<u64> {
        let rows = self.rows.lock().unwrap();
        Ok(rows.iter().filter(|r| r.todo.status_id == status_id).count() as u64)
    }

    async fn update_image(&self, id: i64, image: Option<Vec<u8>>) -> AppResult<()> {
        let mut rows = self.rows.lock().unwrap();
        let row = rows
            .iter_mut()
            .find(|r| r.todo.id == id)
            .ok_or_else(|| AppError::not_found("Todo"))?;
        row.todo.has_image = image.is_some();
        row.image = image;
        Ok(())
    }

    async fn find_image(&self, id: i64) -> AppResult<Option<Vec<u8>>> {
        let rows = self.rows.lock().unwrap();
        Ok(rows
            .iter()
            .find(|r| r.todo.id == id)
            .and_then(|r| r.image.clone()))
    }
}

/// Unit of work over the in-memory repositories.
#[derive(Default)]
pub struct MemoryStore {
    pub users: Arc<MemoryUsers>,
    pub todos: Arc<MemoryTodos>,
    pub statuses: Arc<MemoryStatuses>,
}

impl UnitOfWork for MemoryStore {
    fn users(&self) -> Arc<dyn UserRepository> {
        self.users.clone()
    }

    fn todos(&self) -> Arc<dyn TodoRepository> {
        self.todos.clone()
    }

    fn statuses(&self) -> Arc<dyn TodoStatusRepository> {
        self.statuses.clone()
    }
}

impl MemoryStore {
    /// Insert a user whose password is stored by [`PlainHasher`].
    pub async fn seed_user(&self, username: &str, password: &str, level: AccessLevel) -> User {
        self.users
            .create(CreateUser {
                name: format!("{} name", username),
                username: username.to_string(),
                email: format!("{}@example.com", username),
                password_hash: PlainHasher::stored(password),
                access_level: level,
            })
            .await
            .expect("in-memory insert")
    }
}

/// Everything a router test needs.
pub struct TestApp {
    pub store: Arc<MemoryStore>,
    pub hasher: Arc<PlainHasher>,
    pub tokens: Arc<TokenManager>,
    pub router: Router,
}

impl TestApp {
    pub fn new() -> Self {
        let store = Arc::new(MemoryStore::default());
        let hasher = Arc::new(PlainHasher::default());
        let tokens = tokens();

        let services = Services::new(
            Arc::new(Authenticator::new(store.clone(), hasher.clone(), tokens.clone())),
            Arc::new(UserManager::new(store.clone(), hasher.clone())),
            Arc::new(TodoManager::new(store.clone())),
            tokens.clone(),
        );
        // Never connected; only the health check touches it
        let database = Arc::new(Database::from_connection(DatabaseConnection::default()));
        let state = AppState::from_services(&services, database);
        let router = create_router(state, &["http://localhost:4000".to_string()]);

        Self {
            store,
            hasher,
            tokens,
            router,
        }
    }

    /// Bearer header value for a fresh token.
    pub fn bearer(&self, user_id: i64, level: AccessLevel) -> String {
        let token = self
            .tokens
            .create_default_token(user_id, level)
            .expect("token issued");
        format!("Bearer {}", token)
    }
}
