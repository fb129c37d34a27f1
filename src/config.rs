use std::ops::RangeInclusive;
use std::str::FromStr;

const DEFAULT_DATABASE_NAME: &str = "astro_consult";

const JWT_EXPIRY_HOURS: RangeInclusive<i64> = 1..=24 * 365;
const OTP_TTL_MINUTES: RangeInclusive<i64> = 1..=24 * 60;
const BCRYPT_COST: RangeInclusive<u32> = 4..=31;

/// Credentials for the unsigned Cloudinary upload endpoint
#[derive(Debug, Clone)]
pub struct CloudinaryConfig {
    pub cloud_name: String,
    pub upload_preset: String,
    pub folder: String,
}

impl CloudinaryConfig {
    pub fn upload_url(&self) -> String {
        format!("https://api.cloudinary.com/v1_1/{}/image/upload", self.cloud_name)
    }
}

/// Runtime configuration, read once at startup
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub host: String,
    pub port: u16,
    pub database_url: String,
    pub database_name: String,
    pub jwt_secret: String,
    pub jwt_issuer: String,
    pub jwt_audience: String,
    pub jwt_expiry_hours: i64,
    pub bcrypt_cost: u32,
    pub otp_ttl_minutes: i64,
    pub otp_debug_echo: bool,
    pub allowed_origins: Vec<String>,
    pub cloudinary: Option<CloudinaryConfig>,
}

impl AppConfig {
    pub fn from_env() -> Result<Self, String> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Builds the config from any key lookup (the process environment in
    /// production, a map in tests).
    pub fn from_lookup<F>(lookup: F) -> Result<Self, String>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str, default: &str| lookup(key).unwrap_or_else(|| default.to_string());

        let database_url = lookup("DATABASE_URL").ok_or_else(|| "DATABASE_URL must be set".to_string())?;
        let database_name = database_name_from_uri(&database_url);

        let cloudinary = match (lookup("CLOUDINARY_CLOUD_NAME"), lookup("CLOUDINARY_UPLOAD_PRESET")) {
            (Some(cloud_name), Some(upload_preset)) => Some(CloudinaryConfig {
                cloud_name,
                upload_preset,
                folder: get("CLOUDINARY_FOLDER", "astro-consult"),
            }),
            _ => None,
        };

        Ok(Self {
            host: get("HOST", "0.0.0.0"),
            port: parse_var(&lookup, "PORT", 3002)?,
            database_url,
            database_name,
            jwt_secret: get("JWT_SECRET", "default-secret-change-me"),
            jwt_issuer: get("JWT_ISSUER", "astro-consult-service"),
            jwt_audience: get("JWT_AUDIENCE", "astro-consult-api"),
            jwt_expiry_hours: parse_in_range(&lookup, "JWT_EXPIRY_HOURS", 24, JWT_EXPIRY_HOURS)?,
            bcrypt_cost: parse_in_range(&lookup, "BCRYPT_COST", bcrypt::DEFAULT_COST, BCRYPT_COST)?,
            otp_ttl_minutes: parse_in_range(&lookup, "OTP_TTL_MINUTES", 5, OTP_TTL_MINUTES)?,
            otp_debug_echo: parse_var(&lookup, "OTP_DEBUG_ECHO", false)?,
            allowed_origins: get("CORS_ALLOWED_ORIGINS", "http://localhost:3000")
                .split(',')
                .map(|s| s.trim().to_string())
                .filter(|s| !s.is_empty())
                .collect(),
            cloudinary,
        })
    }

    pub fn otp_ttl_millis(&self) -> i64 {
        self.otp_ttl_minutes * 60 * 1000
    }

    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }

    #[cfg(test)]
    pub fn for_tests() -> Self {
        Self {
            host: "127.0.0.1".into(),
            port: 0,
            database_url: "mongodb://localhost:27017/astro_consult_test".into(),
            database_name: "astro_consult_test".into(),
            jwt_secret: "test-secret".into(),
            jwt_issuer: "astro-consult-service".into(),
            jwt_audience: "astro-consult-api".into(),
            jwt_expiry_hours: 1,
            bcrypt_cost: 4,
            otp_ttl_minutes: 5,
            otp_debug_echo: true,
            allowed_origins: vec!["http://localhost:3000".into()],
            cloudinary: None,
        }
    }
}

fn parse_var<F, T>(lookup: &F, key: &str, default: T) -> Result<T, String>
where
    F: Fn(&str) -> Option<String>,
    T: FromStr,
    T::Err: std::fmt::Display,
{
    match lookup(key) {
        Some(raw) => raw
            .trim()
            .parse::<T>()
            .map_err(|e| format!("Invalid value for {}: {} ({})", key, raw, e)),
        None => Ok(default),
    }
}

fn parse_in_range<F, T>(
    lookup: &F,
    key: &str,
    default: T,
    range: RangeInclusive<T>,
) -> Result<T, String>
where
    F: Fn(&str) -> Option<String>,
    T: FromStr + PartialOrd + std::fmt::Display,
    T::Err: std::fmt::Display,
{
    let value = parse_var(lookup, key, default)?;
    if !range.contains(&value) {
        return Err(format!(
            "{} must be between {} and {} (got {})",
            key,
            range.start(),
            range.end(),
            value
        ));
    }
    Ok(value)
}

/// Extracts the database name from the last path segment of a MongoDB URI
pub fn database_name_from_uri(uri: &str) -> String {
    let without_scheme = uri.split_once("://").map(|(_, rest)| rest).unwrap_or(uri);

    without_scheme
        .split_once('/')
        .map(|(_, path)| path)
        .and_then(|path| path.split('?').next())
        .filter(|name| !name.is_empty())
        .unwrap_or(DEFAULT_DATABASE_NAME)
        .to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup_from(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn test_defaults() {
        let config = AppConfig::from_lookup(lookup_from(&[("DATABASE_URL", "mongodb://db:27017/astro")])).unwrap();

        assert_eq!(config.bind_address(), "0.0.0.0:3002");
        assert_eq!(config.database_name, "astro");
        assert_eq!(config.bcrypt_cost, bcrypt::DEFAULT_COST);
        assert_eq!(config.otp_ttl_minutes, 5);
        assert!(!config.otp_debug_echo);
        assert!(config.cloudinary.is_none());
        assert_eq!(config.allowed_origins, vec!["http://localhost:3000".to_string()]);
    }

    #[test]
    fn test_missing_database_url() {
        let err = AppConfig::from_lookup(lookup_from(&[])).unwrap_err();
        assert!(err.contains("DATABASE_URL"));
    }

    #[test]
    fn test_invalid_number_is_rejected() {
        let err = AppConfig::from_lookup(lookup_from(&[
            ("DATABASE_URL", "mongodb://localhost"),
            ("PORT", "eighty"),
        ]))
        .unwrap_err();
        assert!(err.contains("PORT"));
    }

    #[test]
    fn test_out_of_range_durations_are_rejected() {
        for (key, value) in [
            ("OTP_TTL_MINUTES", "-5"),
            ("OTP_TTL_MINUTES", "9223372036854775807"),
            ("JWT_EXPIRY_HOURS", "0"),
            ("JWT_EXPIRY_HOURS", "100000000000"),
            ("BCRYPT_COST", "40"),
        ] {
            let err = AppConfig::from_lookup(lookup_from(&[
                ("DATABASE_URL", "mongodb://localhost"),
                (key, value),
            ]))
            .unwrap_err();
            assert!(err.contains(key), "{}", err);
        }

        let config = AppConfig::from_lookup(lookup_from(&[
            ("DATABASE_URL", "mongodb://localhost"),
            ("OTP_TTL_MINUTES", "10"),
        ]))
        .unwrap();
        assert_eq!(config.otp_ttl_millis(), 600_000);
    }

    #[test]
    fn test_cloudinary_and_origins() {
        let config = AppConfig::from_lookup(lookup_from(&[
            ("DATABASE_URL", "mongodb://localhost"),
            ("CLOUDINARY_CLOUD_NAME", "demo"),
            ("CLOUDINARY_UPLOAD_PRESET", "unsigned"),
            ("CORS_ALLOWED_ORIGINS", "http://a.test, http://b.test,"),
        ]))
        .unwrap();

        let cloudinary = config.cloudinary.unwrap();
        assert_eq!(cloudinary.upload_url(), "https://api.cloudinary.com/v1_1/demo/image/upload");
        assert_eq!(cloudinary.folder, "astro-consult");
        assert_eq!(config.allowed_origins, vec!["http://a.test", "http://b.test"]);
    }

    #[test]
    fn test_database_name_from_uri() {
        assert_eq!(database_name_from_uri("mongodb://localhost:27017/astro?retryWrites=true"), "astro");
        assert_eq!(database_name_from_uri("mongodb+srv://u:p@cluster.example.net/prod"), "prod");
        assert_eq!(database_name_from_uri("mongodb://localhost:27017"), DEFAULT_DATABASE_NAME);
        assert_eq!(database_name_from_uri("mongodb://localhost:27017/"), DEFAULT_DATABASE_NAME);
    }
}
