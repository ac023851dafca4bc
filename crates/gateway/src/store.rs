//! Record persistence: API configurations plus the tool and prompt records
//! that ride along with them.
//!
//! The execution path only ever reads (`config_for_tool`); everything else
//! is plain CRUD plumbing. `PgStore` is the production implementation;
//! `MemoryStore` backs tests.

use anyhow::Context as _;
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use parking_lot::RwLock;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use sqlx::postgres::PgRow;
use sqlx::{PgPool, Row as _};
use std::collections::BTreeMap;
use toolrelay_translate::EndpointConfig;
use uuid::Uuid;

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ConfigRecord {
    pub id: Uuid,
    #[serde(flatten)]
    pub config: EndpointConfig,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ToolRecord {
    pub id: String,
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tool_set: Option<Value>,
    pub active: bool,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PromptRecord {
    pub id: Uuid,
    pub tool_id: String,
    pub prompt_type: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub parameters: Option<Value>,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ToolCreate {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub tool_set: Option<Value>,
    #[serde(default = "default_true")]
    pub active: bool,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PromptCreate {
    pub tool_id: String,
    pub prompt_type: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub parameters: Option<Value>,
}

fn default_true() -> bool {
    true
}

#[async_trait]
pub trait RecordStore: Send + Sync {
    /// Insert or replace the configuration for `config.tool_id`.
    async fn upsert_config(&self, config: EndpointConfig) -> anyhow::Result<ConfigRecord>;
    /// Read-only lookup used by the execution path.
    async fn config_for_tool(&self, tool_id: &str) -> anyhow::Result<Option<ConfigRecord>>;

    async fn upsert_tool(&self, tool: ToolCreate) -> anyhow::Result<ToolRecord>;
    async fn tool_by_id(&self, id: &str) -> anyhow::Result<Option<ToolRecord>>;
    async fn list_active_tools(&self) -> anyhow::Result<Vec<ToolRecord>>;

    async fn insert_prompt(&self, prompt: PromptCreate) -> anyhow::Result<PromptRecord>;
    async fn prompts_for_tool(&self, tool_id: &str) -> anyhow::Result<Vec<PromptRecord>>;
}

// ---------------------------------------------------------------------------
// Postgres

#[derive(Clone)]
pub struct PgStore {
    pool: PgPool,
}

impl PgStore {
    #[must_use]
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Create the record tables if they do not exist yet.
    pub async fn migrate(&self) -> anyhow::Result<()> {
        sqlx::query(
            r"
create table if not exists api_configurations (
    id uuid primary key,
    tool_id text not null unique,
    base_url text not null,
    method text not null,
    authentication_type text,
    auth_config jsonb,
    headers jsonb,
    additional_params jsonb,
    created_at timestamptz not null default now()
)
",
        )
        .execute(&self.pool)
        .await
        .context("create api_configurations")?;

        sqlx::query(
            r"
create table if not exists tools (
    id text primary key,
    name text not null,
    description text,
    tool_set jsonb,
    active boolean not null default true,
    created_at timestamptz not null default now()
)
",
        )
        .execute(&self.pool)
        .await
        .context("create tools")?;

        sqlx::query(
            r"
create table if not exists prompts (
    id uuid primary key,
    tool_id text not null,
    prompt_type text not null,
    description text,
    parameters jsonb,
    created_at timestamptz not null default now()
)
",
        )
        .execute(&self.pool)
        .await
        .context("create prompts")?;

        Ok(())
    }
}

fn config_from_row(row: &PgRow) -> anyhow::Result<ConfigRecord> {
    let headers: Option<Value> = row.try_get("headers")?;
    let headers: Option<BTreeMap<String, String>> = headers
        .map(serde_json::from_value)
        .transpose()
        .context("decode stored headers")?;
    let additional_params: Option<Value> = row.try_get("additional_params")?;
    let additional_params = additional_params
        .map(serde_json::from_value)
        .transpose()
        .context("decode stored additional_params")?;

    Ok(ConfigRecord {
        id: row.try_get("id")?,
        config: EndpointConfig {
            tool_id: row.try_get("tool_id")?,
            base_url: row.try_get("base_url")?,
            method: row.try_get("method")?,
            headers,
            additional_params,
            authentication_type: row.try_get("authentication_type")?,
            auth_config: row.try_get("auth_config")?,
        },
        created_at: row.try_get("created_at")?,
    })
}

fn tool_from_row(row: &PgRow) -> anyhow::Result<ToolRecord> {
    Ok(ToolRecord {
        id: row.try_get("id")?,
        name: row.try_get("name")?,
        description: row.try_get("description")?,
        tool_set: row.try_get("tool_set")?,
        active: row.try_get("active")?,
        created_at: row.try_get("created_at")?,
    })
}

fn prompt_from_row(row: &PgRow) -> anyhow::Result<PromptRecord> {
    Ok(PromptRecord {
        id: row.try_get("id")?,
        tool_id: row.try_get("tool_id")?,
        prompt_type: row.try_get("prompt_type")?,
        description: row.try_get("description")?,
        parameters: row.try_get("parameters")?,
        created_at: row.try_get("created_at")?,
    })
}

const CONFIG_COLUMNS: &str = "id, tool_id, base_url, method, authentication_type, auth_config, headers, additional_params, created_at";

#[async_trait]
impl RecordStore for PgStore {
    async fn upsert_config(&self, config: EndpointConfig) -> anyhow::Result<ConfigRecord> {
        let headers = config
            .headers
            .as_ref()
            .map(serde_json::to_value)
            .transpose()
            .context("encode headers")?;
        let additional_params = config
            .additional_params
            .as_ref()
            .map(serde_json::to_value)
            .transpose()
            .context("encode additional_params")?;

        let row = sqlx::query(&format!(
            r"
insert into api_configurations
    (id, tool_id, base_url, method, authentication_type, auth_config, headers, additional_params)
values ($1, $2, $3, $4, $5, $6, $7, $8)
on conflict (tool_id) do update set
    base_url = excluded.base_url,
    method = excluded.method,
    authentication_type = excluded.authentication_type,
    auth_config = excluded.auth_config,
    headers = excluded.headers,
    additional_params = excluded.additional_params
returning {CONFIG_COLUMNS}
"
        ))
        .bind(Uuid::new_v4())
        .bind(&config.tool_id)
        .bind(&config.base_url)
        .bind(&config.method)
        .bind(&config.authentication_type)
        .bind(&config.auth_config)
        .bind(headers)
        .bind(additional_params)
        .fetch_one(&self.pool)
        .await
        .context("upsert api configuration")?;

        config_from_row(&row)
    }

    async fn config_for_tool(&self, tool_id: &str) -> anyhow::Result<Option<ConfigRecord>> {
        let row = sqlx::query(&format!(
            "select {CONFIG_COLUMNS} from api_configurations where tool_id = $1"
        ))
        .bind(tool_id)
        .fetch_optional(&self.pool)
        .await
        .context("select api configuration")?;

        row.as_ref().map(config_from_row).transpose()
    }

    async fn upsert_tool(&self, tool: ToolCreate) -> anyhow::Result<ToolRecord> {
        let row = sqlx::query(
            r"
insert into tools (id, name, description, tool_set, active)
values ($1, $2, $3, $4, $5)
on conflict (id) do update set
    name = excluded.name,
    description = excluded.description,
    tool_set = excluded.tool_set,
    active = excluded.active
returning id, name, description, tool_set, active, created_at
",
        )
        .bind(&tool.id)
        .bind(&tool.name)
        .bind(&tool.description)
        .bind(&tool.tool_set)
        .bind(tool.active)
        .fetch_one(&self.pool)
        .await
        .context("upsert tool")?;

        tool_from_row(&row)
    }

    async fn tool_by_id(&self, id: &str) -> anyhow::Result<Option<ToolRecord>> {
        let row = sqlx::query(
            "select id, name, description, tool_set, active, created_at from tools where id = $1",
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await
        .context("select tool")?;

        row.as_ref().map(tool_from_row).transpose()
    }

    async fn list_active_tools(&self) -> anyhow::Result<Vec<ToolRecord>> {
        let rows = sqlx::query(
            "select id, name, description, tool_set, active, created_at from tools where active order by id",
        )
        .fetch_all(&self.pool)
        .await
        .context("list tools")?;

        rows.iter().map(tool_from_row).collect()
    }

    async fn insert_prompt(&self, prompt: PromptCreate) -> anyhow::Result<PromptRecord> {
        let row = sqlx::query(
            r"
insert into prompts (id, tool_id, prompt_type, description, parameters)
values ($1, $2, $3, $4, $5)
returning id, tool_id, prompt_type, description, parameters, created_at
",
        )
        .bind(Uuid::new_v4())
        .bind(&prompt.tool_id)
        .bind(&prompt.prompt_type)
        .bind(&prompt.description)
        .bind(&prompt.parameters)
        .fetch_one(&self.pool)
        .await
        .context("insert prompt")?;

        prompt_from_row(&row)
    }

    async fn prompts_for_tool(&self, tool_id: &str) -> anyhow::Result<Vec<PromptRecord>> {
        let rows = sqlx::query(
            r"
select id, tool_id, prompt_type, description, parameters, created_at
from prompts
where tool_id = $1
order by created_at
",
        )
        .bind(tool_id)
        .fetch_all(&self.pool)
        .await
        .context("list prompts")?;

        rows.iter().map(prompt_from_row).collect()
    }
}

// ---------------------------------------------------------------------------
// In-memory (tests, local development)

#[derive(Default)]
pub struct MemoryStore {
    inner: RwLock<MemoryInner>,
}

#[derive(Default)]
struct MemoryInner {
    configs: BTreeMap<String, ConfigRecord>,
    tools: BTreeMap<String, ToolRecord>,
    prompts: Vec<PromptRecord>,
}

#[async_trait]
impl RecordStore for MemoryStore {
    async fn upsert_config(&self, config: EndpointConfig) -> anyhow::Result<ConfigRecord> {
        let mut inner = self.inner.write();
        let record = match inner.configs.get(&config.tool_id) {
            // Keep identity and creation time across replacements.
            Some(existing) => ConfigRecord {
                id: existing.id,
                created_at: existing.created_at,
                config,
            },
            None => ConfigRecord {
                id: Uuid::new_v4(),
                created_at: Utc::now(),
                config,
            },
        };
        inner
            .configs
            .insert(record.config.tool_id.clone(), record.clone());
        Ok(record)
    }

    async fn config_for_tool(&self, tool_id: &str) -> anyhow::Result<Option<ConfigRecord>> {
        Ok(self.inner.read().configs.get(tool_id).cloned())
    }

    async fn upsert_tool(&self, tool: ToolCreate) -> anyhow::Result<ToolRecord> {
        let mut inner = self.inner.write();
        let created_at = inner
            .tools
            .get(&tool.id)
            .map_or_else(Utc::now, |t| t.created_at);
        let record = ToolRecord {
            id: tool.id,
            name: tool.name,
            description: tool.description,
            tool_set: tool.tool_set,
            active: tool.active,
            created_at,
        };
        inner.tools.insert(record.id.clone(), record.clone());
        Ok(record)
    }

    async fn tool_by_id(&self, id: &str) -> anyhow::Result<Option<ToolRecord>> {
        Ok(self.inner.read().tools.get(id).cloned())
    }

    async fn list_active_tools(&self) -> anyhow::Result<Vec<ToolRecord>> {
        Ok(self
            .inner
            .read()
            .tools
            .values()
            .filter(|t| t.active)
            .cloned()
            .collect())
    }

    async fn insert_prompt(&self, prompt: PromptCreate) -> anyhow::Result<PromptRecord> {
        let record = PromptRecord {
            id: Uuid::new_v4(),
            tool_id: prompt.tool_id,
            prompt_type: prompt.prompt_type,
            description: prompt.description,
            parameters: prompt.parameters,
            created_at: Utc::now(),
        };
        self.inner.write().prompts.push(record.clone());
        Ok(record)
    }

    async fn prompts_for_tool(&self, tool_id: &str) -> anyhow::Result<Vec<PromptRecord>> {
        Ok(self
            .inner
            .read()
            .prompts
            .iter()
            .filter(|p| p.tool_id == tool_id)
            .cloned()
            .collect())
    }
}
