//! Server configuration.
//!
//! Values are layered, lowest precedence first:
//! 1. the built-in defaults in [`DEFAULT_CONFIG`]
//! 2. an optional TOML/YAML file (`--config`, `WWS_CONFIG`, or `config.*` in
//!    the working directory)
//! 3. `WWS__`-prefixed environment variables, `__` separating sections
//!    (`WWS__SERVER__PORT=8080`, `WWS__COLLECTIONS__COURSES__SHAPE=nested`)
//! 4. the legacy deployment variables: `PORT`, `MONGO_DB_URI`,
//!    `EMAIL_USER`, `EMAIL_PASS`
//!
//! `.env` is loaded into the process environment before any of this runs.

use std::net::SocketAddr;
use std::path::Path;

use serde::Deserialize;
use wws_query::Shape;

// ---------------------------------------------------------------------------
// Embedded defaults
// ---------------------------------------------------------------------------

const DEFAULT_CONFIG: &str = r#"
[server]
host = "0.0.0.0"
port = 3000
cors_origins = ["http://localhost:5173", "https://wws-idp-website.vercel.app"]
max_request_body_size = 1048576

[database]
uri = "mongodb://localhost:27017"
name = "wwsDB"
app_name = "wws-server"
max_pool_size = 20
min_pool_size = 0
server_selection_timeout_secs = 10
ensure_indexes = true

[collections.courses]
name = "courses"

[collections.scholarships]
name = "scholarships"

[collections.universities]
name = "universities"

[collections.events]
name = "events"

[collections.users]
name = "users"

[collections.help]
name = "helpFrom"

[collections.collaborate]
name = "collaborate"

[mail]
enabled = false
smtp_host = "smtp.gmail.com"
smtp_port = 465
signature = "World Wise Scholar Team"
queue_capacity = 256

[logging]
level = "info"
json = false
file_enabled = false
file_directory = "logs"
file_prefix = "wws-server"
file_rotation = "daily"
service_name = "wws-server"
deployment_environment = "development"
"#;

// ---------------------------------------------------------------------------
// Public config types
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    pub server: ServerConfig,
    pub database: DatabaseConfig,
    pub collections: CollectionsConfig,
    pub mail: MailConfig,
    pub logging: LoggingConfig,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    #[serde(default)]
    pub cors_origins: Vec<String>,
    pub max_request_body_size: usize,
}

#[derive(Debug, Clone, Deserialize)]
pub struct DatabaseConfig {
    pub uri: String,
    pub name: String,
    pub app_name: String,
    pub max_pool_size: u32,
    pub min_pool_size: u32,
    pub server_selection_timeout_secs: u64,
    /// Create the unique index on user email at startup.
    pub ensure_indexes: bool,
}

#[derive(Debug, Clone, Deserialize)]
pub struct CollectionsConfig {
    pub courses: CollectionConfig,
    pub scholarships: CollectionConfig,
    pub universities: CollectionConfig,
    pub events: CollectionConfig,
    pub users: CollectionConfig,
    pub help: CollectionConfig,
    pub collaborate: CollectionConfig,
}

impl CollectionsConfig {
    fn iter(&self) -> impl Iterator<Item = (&'static str, &CollectionConfig)> {
        [
            ("courses", &self.courses),
            ("scholarships", &self.scholarships),
            ("universities", &self.universities),
            ("events", &self.events),
            ("users", &self.users),
            ("help", &self.help),
            ("collaborate", &self.collaborate),
        ]
        .into_iter()
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ShapeKind {
    #[default]
    Flat,
    Nested,
}

/// Physical collection name and storage shape.
#[derive(Debug, Clone, Deserialize)]
pub struct CollectionConfig {
    pub name: String,
    #[serde(default)]
    pub shape: ShapeKind,
    /// Array holding the records when `shape = "nested"`.
    #[serde(default = "default_array_field")]
    pub array_field: String,
}

fn default_array_field() -> String {
    "data".to_string()
}

impl CollectionConfig {
    pub fn flat(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            shape: ShapeKind::Flat,
            array_field: default_array_field(),
        }
    }

    pub fn nested(name: impl Into<String>, array_field: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            shape: ShapeKind::Nested,
            array_field: array_field.into(),
        }
    }

    pub fn shape(&self) -> Result<Shape, wws_query::Error> {
        match self.shape {
            ShapeKind::Flat => Ok(Shape::Flat),
            ShapeKind::Nested => Shape::nested(self.array_field.clone()),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct MailConfig {
    pub enabled: bool,
    pub smtp_host: String,
    pub smtp_port: u16,
    #[serde(default)]
    pub username: Option<String>,
    #[serde(default)]
    pub password: Option<String>,
    /// Sender address; defaults to the SMTP username.
    #[serde(default)]
    pub from: Option<String>,
    /// Address that receives collaboration notices.
    #[serde(default)]
    pub notify_to: Option<String>,
    /// Name used in the greeting of the notice.
    #[serde(default)]
    pub notify_name: Option<String>,
    /// Sign-off of the notice.
    pub signature: String,
    pub queue_capacity: usize,
}

impl MailConfig {
    pub fn sender(&self) -> Option<&str> {
        self.from.as_deref().or(self.username.as_deref())
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct LoggingConfig {
    pub level: String,
    pub json: bool,
    pub file_enabled: bool,
    pub file_directory: String,
    pub file_prefix: String,
    pub file_rotation: String,
    pub service_name: String,
    pub deployment_environment: String,
}

impl Default for Config {
    fn default() -> Self {
        Self::defaults()
    }
}

impl Config {
    /// Loads the layered configuration.
    ///
    /// Without a path, `config.toml`/`config.yaml` in the working directory is
    /// read when present. Call [`load_dotenv`] first so `.env` values take part.
    pub fn load(path: Option<&Path>) -> anyhow::Result<Self> {
        let file = match path {
            Some(path) => config::File::from(path).required(true),
            None => config::File::with_name("config").required(false),
        };

        let builder = config::Config::builder()
            .add_source(config::File::from_str(DEFAULT_CONFIG, config::FileFormat::Toml))
            .add_source(file)
            .add_source(
                config::Environment::with_prefix("WWS")
                    .prefix_separator("__")
                    .separator("__")
                    .list_separator(",")
                    .with_list_parse_key("server.cors_origins")
                    .try_parsing(true),
            )
            .set_override_option("server.port", env_var("PORT"))?
            .set_override_option("database.uri", env_var("MONGO_DB_URI"))?
            .set_override_option("mail.username", env_var("EMAIL_USER"))?
            .set_override_option("mail.password", env_var("EMAIL_PASS"))?;

        builder
            .build()?
            .try_deserialize()
            .map_err(Into::into)
    }

    /// Returns the built-in defaults without reading files or environment.
    pub fn defaults() -> Self {
        Self::from_toml("").expect("built-in default config must deserialize correctly")
    }

    /// Built-in defaults overlaid with a TOML document.
    pub fn from_toml(overlay: &str) -> anyhow::Result<Self> {
        config::Config::builder()
            .add_source(config::File::from_str(DEFAULT_CONFIG, config::FileFormat::Toml))
            .add_source(config::File::from_str(overlay, config::FileFormat::Toml))
            .build()?
            .try_deserialize()
            .map_err(Into::into)
    }

    pub fn validate(&self) -> Result<(), String> {
        if self.server.port == 0 {
            return Err("server.port must be non-zero".into());
        }
        if self.server.max_request_body_size == 0 {
            return Err("server.max_request_body_size must be non-zero".into());
        }
        if self.database.uri.trim().is_empty() {
            return Err("database.uri must not be empty".into());
        }
        if self.database.name.trim().is_empty() {
            return Err("database.name must not be empty".into());
        }
        if self.database.min_pool_size > self.database.max_pool_size {
            return Err("database.min_pool_size must not exceed database.max_pool_size".into());
        }

        for (key, collection) in self.collections.iter() {
            if collection.name.trim().is_empty() {
                return Err(format!("collections.{key}.name must not be empty"));
            }
            collection
                .shape()
                .map_err(|e| format!("collections.{key}.array_field: {e}"))?;
        }
        // Email uniqueness relies on a unique index over top-level user documents
        if self.collections.users.shape != ShapeKind::Flat {
            return Err("collections.users must use the flat shape".into());
        }

        if self.mail.enabled {
            if self.mail.username.is_none() || self.mail.password.is_none() {
                return Err("mail.username and mail.password are required when mail is enabled".into());
            }
            if self.mail.notify_to.is_none() {
                return Err("mail.notify_to is required when mail is enabled".into());
            }
            if self.mail.queue_capacity == 0 {
                return Err("mail.queue_capacity must be non-zero".into());
            }
        }

        match self.logging.file_rotation.as_str() {
            "daily" | "hourly" | "minutely" | "never" => {}
            other => return Err(format!("logging.file_rotation '{other}' is not supported")),
        }

        Ok(())
    }

    pub fn socket_addr(&self) -> anyhow::Result<SocketAddr> {
        format!("{}:{}", self.server.host, self.server.port)
            .parse()
            .map_err(|e| anyhow::anyhow!("Invalid listen address: {e}"))
    }
}

/// Loads `.env` into the process environment, if present.
pub fn load_dotenv() {
    dotenvy::dotenv().ok();
}

fn env_var(name: &str) -> Option<String> {
    std::env::var(name).ok().filter(|v| !v.trim().is_empty())
}
