use std::env;

/// Settings for one hosted-model call path.
#[derive(Debug, Clone)]
pub struct ModelConfig {
    /// Model identifier sent to the API.
    pub model: String,
    /// Hard cap on generated tokens per call.
    pub max_tokens: u32,
    /// Client-side budget for the whole HTTP call; the in-flight request
    /// is abandoned when it elapses.
    pub timeout_secs: u64,
    /// Extra attempts after a failed or invalid first answer. The mood
    /// classifier caps this at one.
    pub max_retries: u32,
}

#[derive(Debug, Clone)]
pub struct Config {
    pub database_url: String,
    pub host: String,
    pub port: u16,
    pub frontend_url: String,

    pub jwt_secret: String,
    pub jwt_access_ttl_secs: i64,
    pub jwt_refresh_ttl_secs: i64,

    pub groq_api_key: String,
    pub groq_base_url: String,
    /// Empathetic diary-reply model.
    pub chat_model: ModelConfig,
    /// Single-word mood classification model.
    pub classifier_model: ModelConfig,

    /// Trailing window for the dashboard mood summary.
    pub mood_window_days: i64,
}

impl Config {
    pub fn from_env() -> Self {
        Self {
            database_url: env::var("DATABASE_URL").expect("DATABASE_URL must be set"),
            host: env::var("HOST").unwrap_or_else(|_| "0.0.0.0".into()),
            port: env::var("PORT")
                .unwrap_or_else(|_| "8080".into())
                .parse()
                .expect("PORT must be a number"),
            frontend_url: env::var("FRONTEND_URL")
                .unwrap_or_else(|_| "http://localhost:3000".into()),

            jwt_secret: env::var("JWT_SECRET").expect("JWT_SECRET must be set"),
            jwt_access_ttl_secs: env_i64("JWT_ACCESS_TTL_SECS", 900),
            jwt_refresh_ttl_secs: env_i64("JWT_REFRESH_TTL_SECS", 604800),

            groq_api_key: env::var("GROQ_API_KEY").unwrap_or_else(|_| String::new()),
            groq_base_url: env::var("GROQ_BASE_URL")
                .unwrap_or_else(|_| "https://api.groq.com/openai/v1".into()),
            chat_model: ModelConfig {
                model: env::var("CHAT_MODEL").unwrap_or_else(|_| "llama-3.1-8b-instant".into()),
                max_tokens: env_u32("CHAT_MAX_TOKENS", 200),
                timeout_secs: env_u64("CHAT_TIMEOUT_SECS", 30),
                max_retries: 0,
            },
            classifier_model: ModelConfig {
                model: env::var("CLASSIFIER_MODEL")
                    .unwrap_or_else(|_| "llama-3.1-8b-instant".into()),
                max_tokens: env_u32("CLASSIFIER_MAX_TOKENS", 10),
                timeout_secs: env_u64("CLASSIFIER_TIMEOUT_SECS", 10),
                max_retries: env_u32("CLASSIFIER_MAX_RETRIES", 1),
            },

            mood_window_days: env_i64("MOOD_WINDOW_DAYS", 7),
        }
    }

    pub fn listen_addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

fn env_i64(key: &str, default: i64) -> i64 {
    env::var(key).ok().and_then(|v| v.parse().ok()).unwrap_or(default)
}

fn env_u32(key: &str, default: u32) -> u32 {
    env::var(key).ok().and_then(|v| v.parse().ok()).unwrap_or(default)
}

fn env_u64(key: &str, default: u64) -> u64 {
    env::var(key).ok().and_then(|v| v.parse().ok()).unwrap_or(default)
}
