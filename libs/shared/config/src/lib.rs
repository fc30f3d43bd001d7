use std::env;
use std::fmt;
use std::str::FromStr;

use tracing::warn;

/// Which order store backend the booking service is wired to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StoreBackend {
    Memory,
    Supabase,
}

impl FromStr for StoreBackend {
    type Err = String;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_ascii_lowercase().as_str() {
            "memory" | "in_memory" | "in-memory" => Ok(StoreBackend::Memory),
            "supabase" | "postgrest" => Ok(StoreBackend::Supabase),
            other => Err(format!("unknown store backend: {}", other)),
        }
    }
}

impl fmt::Display for StoreBackend {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StoreBackend::Memory => write!(f, "memory"),
            StoreBackend::Supabase => write!(f, "supabase"),
        }
    }
}

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub supabase_url: String,
    pub supabase_anon_key: String,
    pub orders_table: String,
    pub doctors_table: String,
    pub store_backend: StoreBackend,
}

impl AppConfig {
    /// Load a `.env` file if one exists, then read the environment.
    pub fn load() -> Self {
        dotenv::dotenv().ok();
        Self::from_env()
    }

    pub fn from_env() -> Self {
        let supabase_url = env::var("SUPABASE_URL")
            .unwrap_or_else(|_| {
                warn!("SUPABASE_URL not set, using empty value");
                String::new()
            });
        let supabase_anon_key = env::var("SUPABASE_ANON_PUBLIC_KEY")
            .unwrap_or_else(|_| {
                warn!("SUPABASE_ANON_PUBLIC_KEY not set, using empty value");
                String::new()
            });
        let orders_table = env::var("BOOKING_ORDERS_TABLE")
            .unwrap_or_else(|_| "orders".to_string());
        let doctors_table = env::var("BOOKING_DOCTORS_TABLE")
            .unwrap_or_else(|_| "doctors".to_string());

        let supabase_ready = !supabase_url.is_empty() && !supabase_anon_key.is_empty();
        let default_backend = if supabase_ready {
            StoreBackend::Supabase
        } else {
            StoreBackend::Memory
        };

        let store_backend = match env::var("BOOKING_STORE") {
            Ok(raw) => raw.parse().unwrap_or_else(|e: String| {
                warn!("{}, using {}", e, default_backend);
                default_backend
            }),
            Err(_) => default_backend,
        };

        let config = Self {
            supabase_url,
            supabase_anon_key,
            orders_table,
            doctors_table,
            store_backend,
        };

        if config.store_backend == StoreBackend::Supabase && !config.is_configured() {
            warn!("Supabase store selected but SUPABASE_URL / SUPABASE_ANON_PUBLIC_KEY are missing");
        }

        config
    }

    pub fn is_configured(&self) -> bool {
        !self.supabase_url.is_empty() && !self.supabase_anon_key.is_empty()
    }
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            supabase_url: String::new(),
            supabase_anon_key: String::new(),
            orders_table: "orders".to_string(),
            doctors_table: "doctors".to_string(),
            store_backend: StoreBackend::Memory,
        }
    }
}
