use std::env;
use std::net::{IpAddr, SocketAddr};
use std::str::FromStr;

use atrium_application::pagination::{DEFAULT_MAX_PAGE_LIMIT, PAGE_LIMIT_CEILING};
use atrium_core::{AppError, TenantId};
use atrium_infrastructure::JWT_SECRET_MIN_LENGTH;
use tracing_subscriber::EnvFilter;
use uuid::Uuid;

const DEFAULT_API_PORT: u16 = 3001;
const DEFAULT_JWT_EXPIRES_IN_SECS: i64 = 3_600;
const DEFAULT_REFRESH_TOKEN_EXPIRES_IN_SECS: i64 = 2_592_000;

/// Where repositories keep their state.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StorageBackend {
    /// PostgreSQL through a shared pool.
    Postgres { database_url: String },
    /// Process-local maps; state is lost on restart.
    Memory,
}

#[derive(Clone)]
pub struct ApiConfig {
    pub migrate_only: bool,
    pub storage: StorageBackend,
    pub api_host: String,
    pub api_port: u16,
    pub frontend_url: String,
    pub jwt_secret: String,
    pub jwt_expires_in: chrono::Duration,
    pub refresh_token_expires_in: chrono::Duration,
    pub bootstrap_token: Option<String>,
    pub default_tenant_id: TenantId,
    pub pagination_max_limit: usize,
}

impl ApiConfig {
    pub fn load() -> Result<Self, AppError> {
        let migrate_only = env::args().nth(1).as_deref() == Some("migrate");
        Self::from_lookup(migrate_only, |name| env::var(name).ok())
    }

    fn from_lookup(
        migrate_only: bool,
        lookup: impl Fn(&str) -> Option<String>,
    ) -> Result<Self, AppError> {
        let storage = match optional(&lookup, "STORAGE_BACKEND")
            .unwrap_or_else(|| "postgres".to_owned())
            .to_ascii_lowercase()
            .as_str()
        {
            "postgres" => StorageBackend::Postgres {
                database_url: required(&lookup, "DATABASE_URL")?,
            },
            "memory" => StorageBackend::Memory,
            other => {
                return Err(AppError::Validation(format!(
                    "STORAGE_BACKEND must be either 'postgres' or 'memory', got '{other}'"
                )));
            }
        };

        let jwt_secret = required(&lookup, "JWT_SECRET")?;
        if jwt_secret.len() < JWT_SECRET_MIN_LENGTH {
            return Err(AppError::Validation(format!(
                "JWT_SECRET must be at least {JWT_SECRET_MIN_LENGTH} characters"
            )));
        }

        let jwt_expires_in_secs =
            parsed(&lookup, "JWT_EXPIRES_IN_SECS", DEFAULT_JWT_EXPIRES_IN_SECS)?;
        if jwt_expires_in_secs <= 0 {
            return Err(AppError::Validation(
                "JWT_EXPIRES_IN_SECS must be positive".to_owned(),
            ));
        }

        let refresh_token_expires_in_secs = parsed(
            &lookup,
            "REFRESH_TOKEN_EXPIRES_IN_SECS",
            DEFAULT_REFRESH_TOKEN_EXPIRES_IN_SECS,
        )?;
        if refresh_token_expires_in_secs <= 0 {
            return Err(AppError::Validation(
                "REFRESH_TOKEN_EXPIRES_IN_SECS must be positive".to_owned(),
            ));
        }

        let pagination_max_limit =
            parsed(&lookup, "PAGINATION_MAX_LIMIT", DEFAULT_MAX_PAGE_LIMIT)?;
        if !(1..=PAGE_LIMIT_CEILING).contains(&pagination_max_limit) {
            return Err(AppError::Validation(format!(
                "PAGINATION_MAX_LIMIT must be between 1 and {PAGE_LIMIT_CEILING}"
            )));
        }

        let default_tenant_id = optional(&lookup, "DEFAULT_TENANT_ID")
            .map(|value| {
                value.parse::<TenantId>().map_err(|error| {
                    AppError::Validation(format!("invalid DEFAULT_TENANT_ID: {error}"))
                })
            })
            .transpose()?
            .unwrap_or_else(|| TenantId::from_uuid(Uuid::nil()));

        Ok(Self {
            migrate_only,
            storage,
            api_host: optional(&lookup, "API_HOST").unwrap_or_else(|| "127.0.0.1".to_owned()),
            api_port: lookup("API_PORT")
                .and_then(|value| value.trim().parse::<u16>().ok())
                .unwrap_or(DEFAULT_API_PORT),
            frontend_url: optional(&lookup, "FRONTEND_URL")
                .unwrap_or_else(|| "http://localhost:3000".to_owned()),
            jwt_secret,
            jwt_expires_in: chrono::Duration::seconds(jwt_expires_in_secs),
            refresh_token_expires_in: chrono::Duration::seconds(refresh_token_expires_in_secs),
            bootstrap_token: optional(&lookup, "AUTH_BOOTSTRAP_TOKEN"),
            default_tenant_id,
            pagination_max_limit,
        })
    }

    pub fn socket_address(&self) -> Result<SocketAddr, AppError> {
        let host = IpAddr::from_str(&self.api_host).map_err(|error| {
            AppError::Internal(format!("invalid API_HOST '{}': {error}", self.api_host))
        })?;
        Ok(SocketAddr::from((host, self.api_port)))
    }
}

pub fn init_tracing() {
    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_target(false)
        .compact()
        .init();
}

fn optional(lookup: &impl Fn(&str) -> Option<String>, name: &str) -> Option<String> {
    lookup(name).filter(|value| !value.trim().is_empty())
}

fn required(lookup: &impl Fn(&str) -> Option<String>, name: &str) -> Result<String, AppError> {
    optional(lookup, name).ok_or_else(|| AppError::Validation(format!("{name} is required")))
}

fn parsed<T>(
    lookup: &impl Fn(&str) -> Option<String>,
    name: &str,
    default: T,
) -> Result<T, AppError>
where
    T: FromStr,
    T::Err: std::fmt::Display,
{
    match optional(lookup, name) {
        Some(value) => value
            .trim()
            .parse::<T>()
            .map_err(|error| AppError::Validation(format!("invalid {name}: {error}"))),
        None => Ok(default),
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use atrium_core::AppError;

    use super::{ApiConfig, StorageBackend};

    const SECRET: &str = "0123456789abcdef0123456789abcdef";

    fn load(pairs: &[(&str, &str)]) -> Result<ApiConfig, AppError> {
        let values: HashMap<String, String> = pairs
            .iter()
            .map(|(name, value)| ((*name).to_owned(), (*value).to_owned()))
            .collect();
        ApiConfig::from_lookup(false, |name| values.get(name).cloned())
    }

    #[test]
    fn memory_backend_needs_only_a_secret() {
        let config = load(&[("STORAGE_BACKEND", "memory"), ("JWT_SECRET", SECRET)])
            .unwrap_or_else(|_| unreachable!());

        assert_eq!(config.storage, StorageBackend::Memory);
        assert_eq!(config.api_port, 3001);
        assert_eq!(config.pagination_max_limit, 100);
        assert_eq!(config.jwt_expires_in, chrono::Duration::hours(1));
        assert_eq!(config.refresh_token_expires_in, chrono::Duration::days(30));
        assert!(config.bootstrap_token.is_none());
        assert_eq!(
            config.default_tenant_id.to_string(),
            "00000000-0000-0000-0000-000000000000"
        );
    }

    #[test]
    fn postgres_is_the_default_and_requires_a_database_url() {
        assert!(matches!(
            load(&[("JWT_SECRET", SECRET)]),
            Err(AppError::Validation(message)) if message.contains("DATABASE_URL")
        ));

        let config = load(&[
            ("JWT_SECRET", SECRET),
            ("DATABASE_URL", "postgres://localhost/atrium"),
        ])
        .unwrap_or_else(|_| unreachable!());
        assert_eq!(
            config.storage,
            StorageBackend::Postgres {
                database_url: "postgres://localhost/atrium".to_owned()
            }
        );
    }

    #[test]
    fn short_jwt_secret_is_rejected() {
        assert!(matches!(
            load(&[("STORAGE_BACKEND", "memory"), ("JWT_SECRET", "too-short")]),
            Err(AppError::Validation(message)) if message.contains("JWT_SECRET")
        ));
    }

    #[test]
    fn numeric_settings_are_validated() {
        assert!(matches!(
            load(&[
                ("STORAGE_BACKEND", "memory"),
                ("JWT_SECRET", SECRET),
                ("PAGINATION_MAX_LIMIT", "0"),
            ]),
            Err(AppError::Validation(_))
        ));
        assert!(matches!(
            load(&[
                ("STORAGE_BACKEND", "memory"),
                ("JWT_SECRET", SECRET),
                ("JWT_EXPIRES_IN_SECS", "soon"),
            ]),
            Err(AppError::Validation(_))
        ));
    }

    #[test]
    fn refresh_token_lifetime_must_be_positive() {
        let config = load(&[
            ("STORAGE_BACKEND", "memory"),
            ("JWT_SECRET", SECRET),
            ("REFRESH_TOKEN_EXPIRES_IN_SECS", "86400"),
        ])
        .unwrap_or_else(|_| unreachable!());
        assert_eq!(config.refresh_token_expires_in, chrono::Duration::days(1));

        for value in ["0", "-5", "later"] {
            assert!(matches!(
                load(&[
                    ("STORAGE_BACKEND", "memory"),
                    ("JWT_SECRET", SECRET),
                    ("REFRESH_TOKEN_EXPIRES_IN_SECS", value),
                ]),
                Err(AppError::Validation(_))
            ));
        }
    }

    #[test]
    fn pagination_max_limit_is_capped() {
        let config = load(&[
            ("STORAGE_BACKEND", "memory"),
            ("JWT_SECRET", SECRET),
            ("PAGINATION_MAX_LIMIT", "1000"),
        ])
        .unwrap_or_else(|_| unreachable!());
        assert_eq!(config.pagination_max_limit, 1_000);

        let unbounded = usize::MAX.to_string();
        for value in ["1001", unbounded.as_str()] {
            assert!(matches!(
                load(&[
                    ("STORAGE_BACKEND", "memory"),
                    ("JWT_SECRET", SECRET),
                    ("PAGINATION_MAX_LIMIT", value),
                ]),
                Err(AppError::Validation(message)) if message.contains("PAGINATION_MAX_LIMIT")
            ));
        }
    }

    #[test]
    fn unknown_backend_and_bad_tenant_are_rejected() {
        assert!(load(&[("STORAGE_BACKEND", "sqlite"), ("JWT_SECRET", SECRET)]).is_err());
        assert!(
            load(&[
                ("STORAGE_BACKEND", "memory"),
                ("JWT_SECRET", SECRET),
                ("DEFAULT_TENANT_ID", "tenant-a"),
            ])
            .is_err()
        );
    }

    #[test]
    fn socket_address_rejects_host_names() {
        let mut config = load(&[("STORAGE_BACKEND", "memory"), ("JWT_SECRET", SECRET)])
            .unwrap_or_else(|_| unreachable!());
        assert!(config.socket_address().is_ok());

        config.api_host = "localhost".to_owned();
        assert!(config.socket_address().is_err());
    }
}
