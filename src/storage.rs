// src/storage.rs
use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use serde::{de::DeserializeOwned, Serialize};
use sqlx::sqlite::SqlitePoolOptions;
use sqlx::SqlitePool;
use std::collections::BTreeMap;
use std::fmt;
use std::path::Path;
use std::str::FromStr;
use tracing::{debug, info};

use crate::config::AiConfig;
use crate::types::response::CompanyProfile;
use crate::utils::ensure_parent_dir;

/// The fixed key space of the store.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum StorageKey {
    ResumeData,
    TailoredResume,
    JobAnalysis,
    AiConfig,
    CompanyProfiles,
}

impl StorageKey {
    pub const ALL: [StorageKey; 5] = [
        StorageKey::ResumeData,
        StorageKey::TailoredResume,
        StorageKey::JobAnalysis,
        StorageKey::AiConfig,
        StorageKey::CompanyProfiles,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            StorageKey::ResumeData => "resumeData",
            StorageKey::TailoredResume => "tailoredResume",
            StorageKey::JobAnalysis => "jobAnalysis",
            StorageKey::AiConfig => "aiConfig",
            StorageKey::CompanyProfiles => "companyProfiles",
        }
    }
}

impl fmt::Display for StorageKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for StorageKey {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self> {
        Self::ALL
            .into_iter()
            .find(|key| key.as_str() == s)
            .ok_or_else(|| {
                let known: Vec<&str> = Self::ALL.iter().map(StorageKey::as_str).collect();
                anyhow::anyhow!("Unknown storage key: {}. Known keys: {}", s, known.join(", "))
            })
    }
}

#[derive(Debug, Clone, sqlx::FromRow)]
pub struct KvEntry {
    pub key: String,
    pub value: String,
    pub updated_at: DateTime<Utc>,
}

/// JSON values in a single SQLite table. A `set` replaces the previous
/// value wholesale.
#[derive(Debug, Clone)]
pub struct KvStore {
    pool: SqlitePool,
}

impl KvStore {
    pub async fn open(database_path: &Path) -> Result<Self> {
        ensure_parent_dir(database_path).await?;

        let database_url = format!("sqlite:{}?mode=rwc", database_path.display());
        let pool = SqlitePool::connect(&database_url)
            .await
            .context("Failed to connect to SQLite database")?;
        info!("Database connection pool initialized: {}", database_url);

        let store = Self { pool };
        store.migrate().await?;
        Ok(store)
    }

    /// Single-connection in-memory store; contents vanish with the pool.
    pub async fn open_in_memory() -> Result<Self> {
        let pool = SqlitePoolOptions::new()
            .max_connections(1)
            .idle_timeout(None)
            .max_lifetime(None)
            .connect("sqlite::memory:")
            .await
            .context("Failed to open in-memory SQLite database")?;

        let store = Self { pool };
        store.migrate().await?;
        Ok(store)
    }

    pub async fn migrate(&self) -> Result<()> {
        sqlx::query(
            r#"
            CREATE TABLE IF NOT EXISTS kv (
                key TEXT PRIMARY KEY,
                value TEXT NOT NULL,
                updated_at TEXT NOT NULL
            );
            "#,
        )
        .execute(&self.pool)
        .await
        .context("Failed to create kv table")?;

        debug!("Storage migrations completed");
        Ok(())
    }

    pub async fn get_entry(&self, key: StorageKey) -> Result<Option<KvEntry>> {
        let entry = sqlx::query_as::<_, KvEntry>(
            "SELECT key, value, updated_at FROM kv WHERE key = ?",
        )
        .bind(key.as_str())
        .fetch_optional(&self.pool)
        .await
        .with_context(|| format!("Failed to read {}", key))?;

        Ok(entry)
    }

    pub async fn get_raw(&self, key: StorageKey) -> Result<Option<String>> {
        Ok(self.get_entry(key).await?.map(|entry| entry.value))
    }

    pub async fn get<T: DeserializeOwned>(&self, key: StorageKey) -> Result<Option<T>> {
        match self.get_raw(key).await? {
            Some(raw) => {
                let value = serde_json::from_str(&raw)
                    .with_context(|| format!("Stored value for {} is not valid", key))?;
                Ok(Some(value))
            }
            None => Ok(None),
        }
    }

    pub async fn set<T: Serialize + ?Sized>(&self, key: StorageKey, value: &T) -> Result<()> {
        let raw = serde_json::to_string(value)
            .with_context(|| format!("Failed to serialize value for {}", key))?;

        sqlx::query(
            r#"
            INSERT INTO kv (key, value, updated_at) VALUES (?, ?, ?)
            ON CONFLICT(key) DO UPDATE SET value = excluded.value, updated_at = excluded.updated_at
            "#,
        )
        .bind(key.as_str())
        .bind(raw)
        .bind(Utc::now())
        .execute(&self.pool)
        .await
        .with_context(|| format!("Failed to write {}", key))?;

        debug!("Stored {}", key);
        Ok(())
    }

    /// Returns whether a value was present.
    pub async fn remove(&self, key: StorageKey) -> Result<bool> {
        let result = sqlx::query("DELETE FROM kv WHERE key = ?")
            .bind(key.as_str())
            .execute(&self.pool)
            .await
            .with_context(|| format!("Failed to remove {}", key))?;

        Ok(result.rows_affected() > 0)
    }

    /// Seed `aiConfig` and an empty `companyProfiles` map when absent.
    pub async fn initialize_defaults(&self, ai_defaults: &AiConfig) -> Result<()> {
        if self.get_raw(StorageKey::AiConfig).await?.is_none() {
            self.set(StorageKey::AiConfig, ai_defaults).await?;
            info!("Initialized default AI configuration");
        }
        if self.get_raw(StorageKey::CompanyProfiles).await?.is_none() {
            self.set(StorageKey::CompanyProfiles, &BTreeMap::<String, CompanyProfile>::new())
                .await?;
        }
        Ok(())
    }

    pub async fn company_profile(&self, company: &str) -> Result<Option<CompanyProfile>> {
        let profiles: BTreeMap<String, CompanyProfile> = self
            .get(StorageKey::CompanyProfiles)
            .await?
            .unwrap_or_default();
        Ok(profiles.get(company).cloned())
    }

    pub async fn save_company_profile(&self, company: &str, profile: &CompanyProfile) -> Result<()> {
        let mut profiles: BTreeMap<String, CompanyProfile> = self
            .get(StorageKey::CompanyProfiles)
            .await?
            .unwrap_or_default();
        profiles.insert(company.to_string(), profile.clone());
        self.set(StorageKey::CompanyProfiles, &profiles).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::resume::ResumeRecord;

    #[test]
    fn test_storage_key_names() {
        assert_eq!(StorageKey::ResumeData.as_str(), "resumeData");
        assert_eq!("jobAnalysis".parse::<StorageKey>().unwrap(), StorageKey::JobAnalysis);
        assert!("lastJob".parse::<StorageKey>().is_err());
    }

    #[tokio::test]
    async fn test_set_get_supersedes() {
        let store = KvStore::open_in_memory().await.unwrap();
        assert!(store.get::<ResumeRecord>(StorageKey::ResumeData).await.unwrap().is_none());

        let first = ResumeRecord {
            full_name: "Jane Doe".to_string(),
            skills: vec!["Rust".to_string()],
            ..ResumeRecord::default()
        };
        store.set(StorageKey::ResumeData, &first).await.unwrap();
        assert_eq!(
            store.get::<ResumeRecord>(StorageKey::ResumeData).await.unwrap(),
            Some(first)
        );

        let second = ResumeRecord {
            email: "john@doe.dev".to_string(),
            ..ResumeRecord::default()
        };
        store.set(StorageKey::ResumeData, &second).await.unwrap();
        let stored = store
            .get::<ResumeRecord>(StorageKey::ResumeData)
            .await
            .unwrap()
            .unwrap();
        assert_eq!(stored, second);
        assert!(stored.skills.is_empty());
    }

    #[tokio::test]
    async fn test_remove() {
        let store = KvStore::open_in_memory().await.unwrap();
        store.set(StorageKey::TailoredResume, &serde_json::json!({"a": 1})).await.unwrap();
        assert!(store.remove(StorageKey::TailoredResume).await.unwrap());
        assert!(!store.remove(StorageKey::TailoredResume).await.unwrap());
    }

    #[tokio::test]
    async fn test_initialize_defaults_keeps_existing() {
        let store = KvStore::open_in_memory().await.unwrap();
        let custom = AiConfig {
            api_key: Some("sk-live".to_string()),
            ..AiConfig::default()
        };
        store.set(StorageKey::AiConfig, &custom).await.unwrap();

        store.initialize_defaults(&AiConfig::default()).await.unwrap();
        let stored: AiConfig = store.get(StorageKey::AiConfig).await.unwrap().unwrap();
        assert_eq!(stored.api_key.as_deref(), Some("sk-live"));
        assert_eq!(
            store.get_raw(StorageKey::CompanyProfiles).await.unwrap().as_deref(),
            Some("{}")
        );
    }

    #[tokio::test]
    async fn test_company_profiles() {
        let store = KvStore::open_in_memory().await.unwrap();
        assert!(store.company_profile("Acme").await.unwrap().is_none());

        let profile = CompanyProfile {
            company_name: "Acme".to_string(),
            industry: "technology".to_string(),
            ..CompanyProfile::default()
        };
        store.save_company_profile("Acme", &profile).await.unwrap();
        store
            .save_company_profile("Globex", &CompanyProfile::default())
            .await
            .unwrap();
        assert_eq!(store.company_profile("Acme").await.unwrap(), Some(profile));
    }

    #[tokio::test]
    async fn test_open_on_disk() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("store.db");
        let store = KvStore::open(&path).await.unwrap();
        store.set(StorageKey::JobAnalysis, &vec!["x"]).await.unwrap();
        assert!(path.exists());

        let entry = store.get_entry(StorageKey::JobAnalysis).await.unwrap().unwrap();
        assert_eq!(entry.key, "jobAnalysis");
        assert_eq!(entry.value, r#"["x"]"#);
    }
}
