//! Routine and todo collection persistence over key-value storage.
//!
//! # Responsibility
//! - Store the routine tree and the todo list as two JSON arrays.
//! - Read and write each collection whole.
//!
//! # Invariants
//! - A missing key reads as an empty collection.
//! - Write paths call `Todo::validate()` before serialization.
//! - Read paths reject invalid persisted todos instead of masking them.

use crate::model::routine::Routine;
use crate::model::todo::{Todo, TodoValidationError};
use crate::repo::kv_repo::{KvRepoError, KvRepository};
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::error::Error;
use std::fmt::{Display, Formatter};

/// Storage key of the routine tree.
pub const ROUTINES_KEY: &str = "@TodoListApp:routines";
/// Storage key of the todo list.
pub const TODOS_KEY: &str = "@TodoListApp:todos";

pub type RepoResult<T> = Result<T, RepoError>;

/// Errors from collection persistence.
#[derive(Debug)]
pub enum RepoError {
    Kv(KvRepoError),
    Validation(TodoValidationError),
    /// Stored or outgoing JSON could not be (de)serialized.
    Json {
        key: &'static str,
        source: serde_json::Error,
    },
    InvalidData(String),
}

impl Display for RepoError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Kv(err) => write!(f, "{err}"),
            Self::Validation(err) => write!(f, "{err}"),
            Self::Json { key, source } => write!(f, "invalid JSON under `{key}`: {source}"),
            Self::InvalidData(message) => write!(f, "invalid persisted data: {message}"),
        }
    }
}

impl Error for RepoError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Kv(err) => Some(err),
            Self::Validation(err) => Some(err),
            Self::Json { source, .. } => Some(source),
            Self::InvalidData(_) => None,
        }
    }
}

impl From<KvRepoError> for RepoError {
    fn from(value: KvRepoError) -> Self {
        Self::Kv(value)
    }
}

impl From<TodoValidationError> for RepoError {
    fn from(value: TodoValidationError) -> Self {
        Self::Validation(value)
    }
}

/// Repository interface for the two persisted collections.
pub trait PlannerRepository {
    fn load_routines(&self) -> RepoResult<Vec<Routine>>;
    fn save_routines(&self, routines: &[Routine]) -> RepoResult<()>;
    fn load_todos(&self) -> RepoResult<Vec<Todo>>;
    fn save_todos(&self, todos: &[Todo]) -> RepoResult<()>;
}

/// Collection repository storing JSON arrays in a key-value repository.
pub struct KvPlannerRepository<K: KvRepository> {
    kv: K,
}

impl<K: KvRepository> KvPlannerRepository<K> {
    pub fn new(kv: K) -> Self {
        Self { kv }
    }

    fn load_array<T: DeserializeOwned>(&self, key: &'static str) -> RepoResult<Vec<T>> {
        match self.kv.get_value(key)? {
            None => Ok(Vec::new()),
            Some(raw) => serde_json::from_str(&raw).map_err(|source| RepoError::Json { key, source }),
        }
    }

    fn save_array<T: Serialize>(&self, key: &'static str, items: &[T]) -> RepoResult<()> {
        let raw = serde_json::to_string(items).map_err(|source| RepoError::Json { key, source })?;
        self.kv.set_value(key, &raw)?;
        Ok(())
    }
}

impl<K: KvRepository> PlannerRepository for KvPlannerRepository<K> {
    fn load_routines(&self) -> RepoResult<Vec<Routine>> {
        self.load_array(ROUTINES_KEY)
    }

    fn save_routines(&self, routines: &[Routine]) -> RepoResult<()> {
        self.save_array(ROUTINES_KEY, routines)
    }

    fn load_todos(&self) -> RepoResult<Vec<Todo>> {
        let todos: Vec<Todo> = self.load_array(TODOS_KEY)?;
        for todo in &todos {
            todo.validate().map_err(|err| {
                RepoError::InvalidData(format!("todo {} under `{TODOS_KEY}`: {err}", todo.id))
            })?;
        }
        Ok(todos)
    }

    fn save_todos(&self, todos: &[Todo]) -> RepoResult<()> {
        for todo in todos {
            todo.validate()?;
        }
        self.save_array(TODOS_KEY, todos)
    }
}
