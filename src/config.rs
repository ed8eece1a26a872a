use std::env;

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub database_url: String,
    pub host: String,
    pub port: u16,
    /// Absent or empty key degrades the completion client to fallback-only
    /// mode; it never prevents startup.
    pub groq_api_key: Option<String>,
    pub groq_model: String,
}

impl AppConfig {
    pub fn from_env() -> anyhow::Result<Self> {
        let database_url = env::var("DATABASE_URL")?;
        let host = env::var("APP_HOST").unwrap_or_else(|_| "127.0.0.1".to_string());
        let port = env::var("APP_PORT")
            .ok()
            .and_then(|p| p.parse::<u16>().ok())
            .unwrap_or(3000);
        let groq_api_key = env::var("GROQ_API_KEY").ok().filter(|k| !k.is_empty());
        let groq_model = env::var("GROQ_MODEL").unwrap_or_else(|_| "llama3-8b-8192".to_string());
        Ok(Self {
            database_url,
            host,
            port,
            groq_api_key,
            groq_model,
        })
    }
}
