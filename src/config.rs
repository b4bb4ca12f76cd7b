use anyhow::anyhow;

#[derive(Clone)]
pub struct AppConfig {
    pub database_url: String,
    pub jwt_secret: String,
    pub openai_api_key: String,
    pub openai_api_base: Option<String>,
    pub host: String,
    pub port: u16,
}

impl AppConfig {
    /// Assembles the config from the process environment. Missing required
    /// variables fail startup rather than surfacing mid-request.
    pub fn from_env() -> Result<Self, anyhow::Error> {
        let database_url =
            std::env::var("DATABASE_URL").map_err(|_| anyhow!("DATABASE_URL not found"))?;

        let jwt_secret =
            std::env::var("JWT_SECRET").map_err(|_| anyhow!("JWT_SECRET not found"))?;

        let openai_api_key =
            std::env::var("OPENAI_API_KEY").map_err(|_| anyhow!("OPENAI_API_KEY not found"))?;

        let openai_api_base = std::env::var("OPENAI_API_BASE").ok();

        let host = std::env::var("HOST").unwrap_or_else(|_| "0.0.0.0".to_string());

        let port = std::env::var("PORT")
            .unwrap_or_else(|_| "5000".to_string())
            .parse::<u16>()
            .map_err(|_| anyhow!("PORT is not a valid port number"))?;

        Ok(AppConfig {
            database_url,
            jwt_secret,
            openai_api_key,
            openai_api_base,
            host,
            port,
        })
    }
}
