//! Console configuration management.
//!
//! Consolidates all environment variable reads and provides validated configuration.

use uno::{DECK_SIZE, DEFAULT_HAND_SIZE, GameSettings, MAX_DEALT_CARDS, MAX_PLAYERS, MIN_PLAYERS};

const DEFAULT_PLAYERS: &str = "Player 1,Player 2";

/// Complete session configuration loaded from arguments and environment
#[derive(Debug, Clone)]
pub struct CliConfig {
    /// Player names in seating order
    pub players: Vec<String>,
    /// Cards dealt to each player
    pub hand_size: usize,
    /// Shuffle seed, random when unset
    pub seed: Option<u64>,
}

impl CliConfig {
    /// Load configuration from environment variables
    ///
    /// # Arguments
    ///
    /// * `players_override` - Optional comma-separated player list (from CLI args)
    /// * `hand_size_override` - Optional hand size override (from CLI args)
    /// * `seed_override` - Optional shuffle seed override (from CLI args)
    ///
    /// # Errors
    ///
    /// Returns error if the player list is empty, or `UNO_HAND_SIZE` or
    /// `UNO_SEED` isn't a number
    pub fn from_env(
        players_override: Option<String>,
        hand_size_override: Option<usize>,
        seed_override: Option<u64>,
    ) -> Result<Self, ConfigError> {
        let players = players_override
            .or_else(|| std::env::var("UNO_PLAYERS").ok())
            .unwrap_or_else(|| DEFAULT_PLAYERS.to_string());
        let players = parse_players(&players);
        if players.is_empty() {
            return Err(ConfigError::MissingRequired {
                var: "UNO_PLAYERS".to_string(),
                hint: "List names separated by commas, e.g. --players alice,bob".to_string(),
            });
        }

        let hand_size = match hand_size_override {
            Some(hand_size) => hand_size,
            None => parse_env_or("UNO_HAND_SIZE", DEFAULT_HAND_SIZE)?,
        };
        let seed = match seed_override {
            Some(seed) => Some(seed),
            None => parse_env_opt("UNO_SEED")?,
        };

        Ok(Self {
            players,
            hand_size,
            seed,
        })
    }

    /// Validate configuration after loading
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.players.len() < MIN_PLAYERS {
            return Err(ConfigError::Invalid {
                var: "UNO_PLAYERS".to_string(),
                reason: format!("Need at least {MIN_PLAYERS} players"),
            });
        }

        if self.players.len() > MAX_PLAYERS {
            return Err(ConfigError::Invalid {
                var: "UNO_PLAYERS".to_string(),
                reason: format!("At most {MAX_PLAYERS} players fit at a table"),
            });
        }

        if self.hand_size == 0 {
            return Err(ConfigError::Invalid {
                var: "UNO_HAND_SIZE".to_string(),
                reason: "Must be greater than 0".to_string(),
            });
        }

        if self.players.len() * self.hand_size > MAX_DEALT_CARDS {
            return Err(ConfigError::Invalid {
                var: "UNO_HAND_SIZE".to_string(),
                reason: format!(
                    "{} players with {} cards each exceed the {MAX_DEALT_CARDS} cards a {DECK_SIZE}-card deck can deal",
                    self.players.len(),
                    self.hand_size
                ),
            });
        }

        Ok(())
    }

    /// Engine settings for a table seating exactly the configured players.
    pub fn game_settings(&self) -> GameSettings {
        GameSettings::new(self.hand_size, MIN_PLAYERS, self.players.len(), self.seed)
    }
}

/// Configuration error types
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Missing required setting: {var}\nHint: {hint}")]
    MissingRequired { var: String, hint: String },

    #[error("Invalid configuration for {var}: {reason}")]
    Invalid { var: String, reason: String },
}

/// Split a comma-separated name list, dropping blank entries.
fn parse_players(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(str::trim)
        .filter(|name| !name.is_empty())
        .map(str::to_string)
        .collect()
}

/// Parse an optional environment variable; a value that's set must parse.
fn parse_env_opt<T>(key: &str) -> Result<Option<T>, ConfigError>
where
    T: std::str::FromStr,
{
    match std::env::var(key) {
        Ok(raw) => parse_value(key, &raw).map(Some),
        Err(_) => Ok(None),
    }
}

/// Helper to parse environment variable with default fallback when unset
fn parse_env_or<T>(key: &str, default: T) -> Result<T, ConfigError>
where
    T: std::str::FromStr,
{
    Ok(parse_env_opt(key)?.unwrap_or(default))
}

fn parse_value<T>(key: &str, raw: &str) -> Result<T, ConfigError>
where
    T: std::str::FromStr,
{
    raw.trim().parse().map_err(|_| ConfigError::Invalid {
        var: key.to_string(),
        reason: format!("'{raw}' is not an unsigned integer"),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config(players: &[&str], hand_size: usize) -> CliConfig {
        CliConfig {
            players: players.iter().map(ToString::to_string).collect(),
            hand_size,
            seed: None,
        }
    }

    #[test]
    fn test_config_error_display() {
        let err = ConfigError::MissingRequired {
            var: "UNO_PLAYERS".to_string(),
            hint: "Use commas".to_string(),
        };
        let msg = err.to_string();
        assert!(msg.contains("UNO_PLAYERS"));
        assert!(msg.contains("Use commas"));
    }

    #[test]
    fn test_parse_players() {
        assert_eq!(parse_players("alice, bob ,,carol"), vec!["alice", "bob", "carol"]);
        assert!(parse_players(" , ").is_empty());
    }

    #[test]
    fn test_from_env_overrides_win() {
        let config =
            CliConfig::from_env(Some("ann,ben,cat".to_string()), Some(5), Some(9)).unwrap();
        assert_eq!(config.players, vec!["ann", "ben", "cat"]);
        assert_eq!(config.hand_size, 5);
        assert_eq!(config.seed, Some(9));
    }

    #[test]
    fn test_from_env_blank_players() {
        let err = CliConfig::from_env(Some(" , ".to_string()), Some(7), Some(1)).unwrap_err();
        assert!(matches!(err, ConfigError::MissingRequired { .. }));
    }

    #[test]
    fn test_config_validation_ok() {
        assert!(config(&["alice", "bob"], 7).validate().is_ok());
    }

    #[test]
    fn test_config_validation_one_player() {
        let err = config(&["alice"], 7).validate().unwrap_err();
        assert!(matches!(err, ConfigError::Invalid { .. }));
    }

    #[test]
    fn test_config_validation_too_many_players() {
        let names: Vec<String> = (0..=MAX_PLAYERS).map(|i| format!("p{i}")).collect();
        let names: Vec<&str> = names.iter().map(String::as_str).collect();
        assert!(config(&names, 1).validate().is_err());
    }

    #[test]
    fn test_config_validation_zero_hand() {
        assert!(config(&["alice", "bob"], 0).validate().is_err());
    }

    #[test]
    fn test_config_validation_deal_too_large() {
        assert!(config(&["alice", "bob"], 54).validate().is_err());
        assert!(config(&["alice", "bob"], 53).validate().is_err());
        assert!(config(&["alice", "bob"], 49).validate().is_ok());
        assert!(config(&["alice", "bob", "carol"], 33).validate().is_ok());
        assert!(config(&["alice", "bob", "carol"], 34).validate().is_err());
    }

    #[test]
    fn test_parse_value_rejects_garbage() {
        let err = parse_value::<usize>("UNO_HAND_SIZE", "seven").unwrap_err();
        assert!(
            matches!(err, ConfigError::Invalid { ref var, .. } if var == "UNO_HAND_SIZE")
        );
        assert!(err.to_string().contains("'seven'"));
        assert_eq!(parse_value::<usize>("UNO_HAND_SIZE", " 5 ").unwrap(), 5);
    }

    #[test]
    fn test_parse_env_unset_falls_back() {
        let key = "UNO_CLI_TEST_UNSET_HAND_SIZE";
        assert_eq!(parse_env_or(key, 7usize).unwrap(), 7);
        assert_eq!(parse_env_opt::<u64>(key).unwrap(), None);
    }

    #[test]
    fn test_game_settings_accepts_config() {
        let config = config(&["alice", "bob", "carol"], 20);
        assert!(config.validate().is_ok());
        let settings = config.game_settings();
        assert_eq!(settings.max_players, 3);
        assert!(settings.validate().is_ok());
    }
}
