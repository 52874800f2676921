use dotenvy::dotenv;
use std::env;
use std::path::PathBuf;

use crate::layout::Issuer;

const DEFAULT_STORE: &str = "invoices.json";
const DEFAULT_LOGO: &str = "assets/logo.png";

#[derive(Clone, Debug)]
pub struct Config {
    pub store_path: PathBuf,
    pub logo_path: PathBuf,
    pub issuer: Issuer,
}

impl Config {
    /// Read configuration from the environment, loading `.env` if present.
    pub fn from_env() -> Self {
        dotenv().ok();

        Config {
            store_path: PathBuf::from(var_or("INVOICE_STORE", DEFAULT_STORE)),
            logo_path: PathBuf::from(var_or("INVOICE_LOGO", DEFAULT_LOGO)),
            issuer: Issuer {
                name: var_or("ISSUER_NAME", "Webmasterify and It Solution"),
                phone: var_or("ISSUER_PHONE", "9307324014"),
                email: var_or("ISSUER_EMAIL", "webmasterifyy@gmail.com"),
                monogram: var_or("ISSUER_MONOGRAM", "WM"),
            },
        }
    }
}

fn var_or(key: &str, default: &str) -> String {
    env::var(key)
        .ok()
        .filter(|value| !value.trim().is_empty())
        .unwrap_or_else(|| default.to_string())
}
