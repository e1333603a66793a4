use std::{env, net::SocketAddr, path::PathBuf};

use crate::error::AppError;

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub database_url: String,
    pub listen_addr: SocketAddr,
    pub places_api_key: Option<String>,
    pub static_dir: Option<PathBuf>,
}

impl AppConfig {
    pub fn from_env() -> Result<Self, AppError> {
        let database_url = env::var("DATABASE_URL")
            .unwrap_or_else(|_| "sqlite://travel-planner.db".to_string());

        let listen_addr = match env::var("APP_LISTEN_ADDR") {
            Ok(addr) => addr
                .parse()
                .map_err(|err| AppError::Config(format!("invalid APP_LISTEN_ADDR: {err}")))?,
            Err(_) => {
                let host = env::var("HOST").unwrap_or_else(|_| "0.0.0.0".to_string());
                let port = env::var("PORT").unwrap_or_else(|_| "5000".to_string());
                listen_addr_from_parts(&host, &port)?
            }
        };

        let places_api_key = env::var("GOOGLE_PLACES_API_KEY")
            .ok()
            .filter(|key| !key.trim().is_empty());

        let static_dir = env::var("STATIC_DIR").ok().map(PathBuf::from);

        Ok(Self {
            database_url,
            listen_addr,
            places_api_key,
            static_dir,
        })
    }
}

fn listen_addr_from_parts(host: &str, port: &str) -> Result<SocketAddr, AppError> {
    let port: u16 = port
        .trim()
        .parse()
        .map_err(|err| AppError::Config(format!("invalid PORT {port:?}: {err}")))?;
    let ip = host
        .trim()
        .parse()
        .map_err(|err| AppError::Config(format!("invalid HOST {host:?}: {err}")))?;
    Ok(SocketAddr::new(ip, port))
}
