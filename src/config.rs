use serde::{Deserialize, Serialize};

/// 应用配置
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppConfig {
    pub server: ServerConfig,
    pub database: DatabaseConfig,
    pub extraction: ExtractionConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DatabaseConfig {
    pub url: String,
}

/// 票据识别服务 (Mindee) 配置
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExtractionConfig {
    pub base_url: String,
    pub api_key: String,
    /// 轮询间隔 (秒)
    pub poll_interval_secs: u64,
    /// 轮询次数上限, 超过即判定任务失败
    pub max_polls: u32,
}

const DEFAULT_EXTRACTION_URL: &str = "https://api.mindee.net/v1/products/nirma/invoicy/v1";

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            server: ServerConfig {
                host: "127.0.0.1".to_string(),
                port: 8080,
            },
            database: DatabaseConfig {
                url: std::env::var("DATABASE_URL")
                    .unwrap_or_else(|_| "postgres://localhost/gst_itc".to_string()),
            },
            extraction: ExtractionConfig {
                base_url: DEFAULT_EXTRACTION_URL.to_string(),
                api_key: String::new(),
                poll_interval_secs: 5,
                max_polls: 60,
            },
        }
    }
}

impl AppConfig {
    /// 从环境变量加载配置
    pub fn from_env() -> Self {
        Self {
            server: ServerConfig {
                host: std::env::var("SERVER_HOST").unwrap_or_else(|_| "127.0.0.1".to_string()),
                port: std::env::var("SERVER_PORT")
                    .ok()
                    .and_then(|p| p.parse().ok())
                    .unwrap_or(8080),
            },
            database: DatabaseConfig {
                url: std::env::var("DATABASE_URL")
                    .unwrap_or_else(|_| "postgres://localhost/gst_itc".to_string()),
            },
            extraction: ExtractionConfig {
                base_url: std::env::var("MINDEE_BASE_URL")
                    .unwrap_or_else(|_| DEFAULT_EXTRACTION_URL.to_string()),
                api_key: std::env::var("MINDEE_API_KEY").unwrap_or_default(),
                poll_interval_secs: std::env::var("EXTRACTION_POLL_INTERVAL_SECS")
                    .ok()
                    .and_then(|v| v.parse().ok())
                    .unwrap_or(5),
                max_polls: std::env::var("EXTRACTION_MAX_POLLS")
                    .ok()
                    .and_then(|v| v.parse().ok())
                    .unwrap_or(60),
            },
        }
    }
}
