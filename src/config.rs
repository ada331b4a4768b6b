//! Server configuration.
//!
//! Every setting is a CLI flag with an environment variable fallback, so the
//! same binary can run from a shell or a service manager.

use std::path::PathBuf;
use std::sync::Arc;

use clap::{Args, ValueEnum};

use crate::error::Result;
use crate::source::{DataSource, XlsxSource};
use crate::store::{CsvSubmissionStore, SqliteSubmissionStore, SubmissionRepository};

/// Which backend holds submissions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum)]
pub enum StoreKind {
    #[default]
    Csv,
    Sqlite,
}

impl StoreKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Csv => "csv",
            Self::Sqlite => "sqlite",
        }
    }

    pub fn default_path(&self) -> &'static str {
        match self {
            Self::Csv => "qsort_data.csv",
            Self::Sqlite => "qsort_data.db",
        }
    }
}

/// HTTP-level settings consumed by [`crate::api::build_router`].
#[derive(Debug, Clone, Default)]
pub struct HttpConfig {
    /// Directory served for unmatched routes, `index.html` at `/`.
    pub static_dir: Option<PathBuf>,
    /// Allowed CORS origins. `None` means permissive.
    pub cors_origins: Option<Vec<String>>,
}

#[derive(Debug, Clone, Args)]
pub struct ServerConfig {
    /// Address to bind
    #[arg(long, env = "QSORT_HOST", default_value = "127.0.0.1")]
    pub host: String,

    /// Port for the HTTP API
    #[arg(short, long, env = "QSORT_PORT", default_value = "3000")]
    pub port: u16,

    /// Workbook with Teams, Versions and Cards sheets
    #[arg(long, env = "QSORT_WORKBOOK", default_value = "qsort_details.xlsx")]
    pub workbook: PathBuf,

    /// Submission storage backend
    #[arg(long, env = "QSORT_STORE", value_enum, default_value_t = StoreKind::Csv)]
    pub store: StoreKind,

    /// Submission file (defaults to qsort_data.csv or qsort_data.db)
    #[arg(long, env = "QSORT_SUBMISSIONS")]
    pub submissions: Option<PathBuf>,

    /// Directory of static UI files
    #[arg(long, env = "QSORT_STATIC_DIR")]
    pub static_dir: Option<PathBuf>,

    /// Comma-separated CORS origins (permissive when unset)
    #[arg(long, env = "QSORT_CORS_ORIGINS", value_delimiter = ',')]
    pub cors_origins: Vec<String>,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "127.0.0.1".to_string(),
            port: 3000,
            workbook: PathBuf::from("qsort_details.xlsx"),
            store: StoreKind::Csv,
            submissions: None,
            static_dir: None,
            cors_origins: Vec::new(),
        }
    }
}

impl ServerConfig {
    pub fn bind_addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }

    pub fn submissions_path(&self) -> PathBuf {
        self.submissions
            .clone()
            .unwrap_or_else(|| PathBuf::from(self.store.default_path()))
    }

    pub fn data_source(&self) -> Arc<dyn DataSource> {
        Arc::new(XlsxSource::new(self.workbook.clone()))
    }

    pub fn open_repository(&self) -> Result<Arc<dyn SubmissionRepository>> {
        let path = self.submissions_path();
        tracing::info!(
            "Using {} submission store at {}",
            self.store.as_str(),
            path.display()
        );
        Ok(match self.store {
            StoreKind::Csv => Arc::new(CsvSubmissionStore::open(path)?),
            StoreKind::Sqlite => Arc::new(SqliteSubmissionStore::open(path)?),
        })
    }

    pub fn http(&self) -> HttpConfig {
        let origins: Vec<String> = self
            .cors_origins
            .iter()
            .map(|o| o.trim().to_string())
            .filter(|o| !o.is_empty())
            .collect();

        HttpConfig {
            static_dir: self.static_dir.clone(),
            cors_origins: (!origins.is_empty()).then_some(origins),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn submissions_path_follows_store_kind() {
        let mut config = ServerConfig::default();
        assert_eq!(config.submissions_path(), PathBuf::from("qsort_data.csv"));

        config.store = StoreKind::Sqlite;
        assert_eq!(config.submissions_path(), PathBuf::from("qsort_data.db"));

        config.submissions = Some(PathBuf::from("/data/answers.db"));
        assert_eq!(config.submissions_path(), PathBuf::from("/data/answers.db"));
    }

    #[test]
    fn blank_cors_origins_mean_permissive() {
        let mut config = ServerConfig::default();
        config.cors_origins = vec![" ".to_string()];
        assert!(config.http().cors_origins.is_none());

        config.cors_origins = vec![" http://a.example ".to_string()];
        assert_eq!(
            config.http().cors_origins,
            Some(vec!["http://a.example".to_string()])
        );
    }
}
