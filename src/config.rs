use crate::constants::*;
use std::env;

#[derive(Debug, Clone)]
pub struct Config {
    pub host: String,
    pub port: u16,
    /// Absent keys are tolerated at startup; route requests then fail with a
    /// misconfiguration error before any engine call.
    pub ors_api_key: Option<String>,
    pub ors_base_url: String,
    pub ors_profile: String,
    pub ors_timeout_secs: u64,
    pub search_timeout_secs: u64,
    pub route_cache_ttl: u64,
    pub route_cache_max_entries: u64,
    pub route_generator: RouteGeneratorConfig,
}

#[derive(Debug, Clone)]
pub struct RouteGeneratorConfig {
    /// Use the engine's native round-trip mode for long enough targets
    pub round_trip_enabled: bool,

    /// Targets below this distance (meters) go straight to the waypoint ring
    pub round_trip_min_distance_m: f64,

    /// Length scaling per round-trip attempt; its length is the attempt budget
    pub round_trip_correction_factors: Vec<f64>,

    /// Ring correction factor used when the caller does not supply one
    pub default_correction_factor: f64,

    /// Tolerance as a fraction of the target distance, e.g. 0.1 = ±10%
    pub tolerance_fraction: f64,

    /// Tolerance floor (meters)
    pub tolerance_min_m: f64,

    /// Tolerance ceiling (meters)
    pub tolerance_max_m: f64,
}

impl Default for RouteGeneratorConfig {
    fn default() -> Self {
        Self {
            round_trip_enabled: true,
            round_trip_min_distance_m: ROUND_TRIP_MIN_DISTANCE_METERS,
            round_trip_correction_factors: ROUND_TRIP_CORRECTION_FACTORS.to_vec(),
            default_correction_factor: DEFAULT_CORRECTION_FACTOR,
            tolerance_fraction: TOLERANCE_FRACTION,
            tolerance_min_m: MIN_TOLERANCE_METERS,
            tolerance_max_m: MAX_TOLERANCE_METERS,
        }
    }
}

impl RouteGeneratorConfig {
    pub fn from_env() -> Result<Self, String> {
        let defaults = Self::default();

        let config = Self {
            round_trip_enabled: env::var("ROUTE_ROUND_TRIP_ENABLED")
                .unwrap_or_else(|_| defaults.round_trip_enabled.to_string())
                .parse()
                .map_err(|_| "Invalid ROUTE_ROUND_TRIP_ENABLED")?,

            round_trip_min_distance_m: env::var("ROUTE_ROUND_TRIP_MIN_DISTANCE_M")
                .unwrap_or_else(|_| defaults.round_trip_min_distance_m.to_string())
                .parse()
                .map_err(|_| "Invalid ROUTE_ROUND_TRIP_MIN_DISTANCE_M")?,

            round_trip_correction_factors: match env::var("ROUTE_ROUND_TRIP_CORRECTION_FACTORS") {
                Ok(raw) => parse_factor_list(&raw)?,
                Err(_) => defaults.round_trip_correction_factors,
            },

            default_correction_factor: env::var("ROUTE_DEFAULT_CORRECTION_FACTOR")
                .unwrap_or_else(|_| defaults.default_correction_factor.to_string())
                .parse()
                .map_err(|_| "Invalid ROUTE_DEFAULT_CORRECTION_FACTOR")?,

            tolerance_fraction: env::var("ROUTE_TOLERANCE_FRACTION")
                .unwrap_or_else(|_| defaults.tolerance_fraction.to_string())
                .parse()
                .map_err(|_| "Invalid ROUTE_TOLERANCE_FRACTION")?,

            tolerance_min_m: env::var("ROUTE_TOLERANCE_MIN_M")
                .unwrap_or_else(|_| defaults.tolerance_min_m.to_string())
                .parse()
                .map_err(|_| "Invalid ROUTE_TOLERANCE_MIN_M")?,

            tolerance_max_m: env::var("ROUTE_TOLERANCE_MAX_M")
                .unwrap_or_else(|_| defaults.tolerance_max_m.to_string())
                .parse()
                .map_err(|_| "Invalid ROUTE_TOLERANCE_MAX_M")?,
        };

        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), String> {
        if self.round_trip_correction_factors.is_empty() {
            return Err("ROUTE_ROUND_TRIP_CORRECTION_FACTORS must not be empty".to_string());
        }
        if !(MIN_CORRECTION_FACTOR..=MAX_CORRECTION_FACTOR).contains(&self.default_correction_factor)
        {
            return Err(format!(
                "ROUTE_DEFAULT_CORRECTION_FACTOR must be between {} and {}",
                MIN_CORRECTION_FACTOR, MAX_CORRECTION_FACTOR
            ));
        }
        if !self.round_trip_min_distance_m.is_finite() || self.round_trip_min_distance_m < 0.0 {
            return Err("ROUTE_ROUND_TRIP_MIN_DISTANCE_M must be a non-negative number".to_string());
        }
        if !self.tolerance_fraction.is_finite() || self.tolerance_fraction <= 0.0 {
            return Err("ROUTE_TOLERANCE_FRACTION must be positive".to_string());
        }
        if !self.tolerance_min_m.is_finite() || !self.tolerance_max_m.is_finite() {
            return Err("ROUTE_TOLERANCE_MIN_M and ROUTE_TOLERANCE_MAX_M must be finite".to_string());
        }
        if self.tolerance_min_m < 0.0 || self.tolerance_min_m > self.tolerance_max_m {
            return Err(
                "ROUTE_TOLERANCE_MIN_M must be non-negative and not above ROUTE_TOLERANCE_MAX_M"
                    .to_string(),
            );
        }
        Ok(())
    }
}

/// Parse a comma-separated list such as `"0.78,0.72,0.68"`.
fn parse_factor_list(raw: &str) -> Result<Vec<f64>, String> {
    raw.split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(|s| match s.parse::<f64>() {
            Ok(f) if f > 0.0 && f.is_finite() => Ok(f),
            _ => Err(format!(
                "Invalid ROUTE_ROUND_TRIP_CORRECTION_FACTORS entry: '{}'",
                s
            )),
        })
        .collect()
}

impl Config {
    pub fn from_env() -> Result<Self, String> {
        dotenv::dotenv().ok();

        Ok(Config {
            host: env::var("HOST").unwrap_or_else(|_| DEFAULT_HOST.to_string()),
            port: env::var("PORT")
                .unwrap_or_else(|_| DEFAULT_PORT.to_string())
                .parse()
                .map_err(|_| "Invalid PORT")?,
            ors_api_key: env::var("ORS_API_KEY").ok().filter(|k| !k.trim().is_empty()),
            ors_base_url: env::var("ORS_BASE_URL")
                .unwrap_or_else(|_| DEFAULT_ORS_BASE_URL.to_string()),
            ors_profile: env::var("ORS_PROFILE")
                .unwrap_or_else(|_| DEFAULT_ORS_PROFILE.to_string()),
            ors_timeout_secs: env::var("ORS_TIMEOUT_SECS")
                .unwrap_or_else(|_| DEFAULT_ORS_TIMEOUT_SECONDS.to_string())
                .parse()
                .map_err(|_| "Invalid ORS_TIMEOUT_SECS")?,
            search_timeout_secs: env::var("SEARCH_TIMEOUT_SECS")
                .unwrap_or_else(|_| DEFAULT_SEARCH_TIMEOUT_SECONDS.to_string())
                .parse()
                .map_err(|_| "Invalid SEARCH_TIMEOUT_SECS")?,
            route_cache_ttl: env::var("ROUTE_CACHE_TTL")
                .unwrap_or_else(|_| DEFAULT_ROUTE_CACHE_TTL_SECONDS.to_string())
                .parse()
                .map_err(|_| "Invalid ROUTE_CACHE_TTL")?,
            route_cache_max_entries: env::var("ROUTE_CACHE_MAX_ENTRIES")
                .unwrap_or_else(|_| DEFAULT_ROUTE_CACHE_MAX_ENTRIES.to_string())
                .parse()
                .map_err(|_| "Invalid ROUTE_CACHE_MAX_ENTRIES")?,
            route_generator: RouteGeneratorConfig::from_env()?,
        })
    }

    pub fn server_address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serial_test::serial;

    const ROUTE_VARS: [&str; 7] = [
        "ROUTE_ROUND_TRIP_ENABLED",
        "ROUTE_ROUND_TRIP_MIN_DISTANCE_M",
        "ROUTE_ROUND_TRIP_CORRECTION_FACTORS",
        "ROUTE_DEFAULT_CORRECTION_FACTOR",
        "ROUTE_TOLERANCE_FRACTION",
        "ROUTE_TOLERANCE_MIN_M",
        "ROUTE_TOLERANCE_MAX_M",
    ];

    fn clear_route_vars() {
        for var in ROUTE_VARS {
            env::remove_var(var);
        }
    }

    #[test]
    fn test_defaults_match_tuning_table() {
        let config = RouteGeneratorConfig::default();
        assert!(config.round_trip_enabled);
        assert_eq!(config.round_trip_correction_factors, vec![0.78, 0.72, 0.68]);
        assert_eq!(config.default_correction_factor, 0.65);
        assert_eq!(config.round_trip_min_distance_m, 2000.0);
        assert!(config.validate().is_ok());
    }

    #[test]
    #[serial]
    fn test_from_env_uses_defaults() {
        clear_route_vars();
        let config = RouteGeneratorConfig::from_env().unwrap();
        assert_eq!(config.round_trip_correction_factors.len(), 3);
        assert_eq!(config.tolerance_min_m, 500.0);
        assert_eq!(config.tolerance_max_m, 2000.0);
    }

    #[test]
    #[serial]
    fn test_from_env_overrides() {
        clear_route_vars();
        env::set_var("ROUTE_ROUND_TRIP_ENABLED", "false");
        env::set_var("ROUTE_ROUND_TRIP_CORRECTION_FACTORS", "0.8, 0.7");
        let config = RouteGeneratorConfig::from_env().unwrap();
        clear_route_vars();

        assert!(!config.round_trip_enabled);
        assert_eq!(config.round_trip_correction_factors, vec![0.8, 0.7]);
    }

    #[test]
    #[serial]
    fn test_from_env_rejects_bad_values() {
        clear_route_vars();
        env::set_var("ROUTE_ROUND_TRIP_CORRECTION_FACTORS", "0.8,abc");
        assert!(RouteGeneratorConfig::from_env().is_err());

        clear_route_vars();
        env::set_var("ROUTE_DEFAULT_CORRECTION_FACTOR", "1.4");
        assert!(RouteGeneratorConfig::from_env().is_err());

        clear_route_vars();
        env::set_var("ROUTE_TOLERANCE_MIN_M", "3000");
        assert!(RouteGeneratorConfig::from_env().is_err());
        clear_route_vars();
    }

    #[test]
    #[serial]
    fn test_from_env_rejects_non_finite_tolerances() {
        for (var, value) in [
            ("ROUTE_TOLERANCE_MIN_M", "NaN"),
            ("ROUTE_TOLERANCE_MAX_M", "inf"),
            ("ROUTE_TOLERANCE_FRACTION", "NaN"),
            ("ROUTE_ROUND_TRIP_MIN_DISTANCE_M", "NaN"),
        ] {
            clear_route_vars();
            env::set_var(var, value);
            assert!(
                RouteGeneratorConfig::from_env().is_err(),
                "{}={} should be rejected",
                var,
                value
            );
        }
        clear_route_vars();
    }

    #[test]
    fn test_validate_rejects_nan_fields() {
        let config = RouteGeneratorConfig {
            tolerance_min_m: f64::NAN,
            ..Default::default()
        };
        assert!(config.validate().is_err());

        let config = RouteGeneratorConfig {
            round_trip_min_distance_m: -1.0,
            ..Default::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_parse_factor_list() {
        assert_eq!(parse_factor_list("0.78,0.72,0.68").unwrap().len(), 3);
        assert!(parse_factor_list("0.5,-1").is_err());
        assert!(parse_factor_list("").unwrap().is_empty());
    }
}
