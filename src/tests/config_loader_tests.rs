#![warn(clippy::all, clippy::pedantic)]

#[cfg(test)]
mod tests {
    use tempfile::tempdir;

    use crate::components::GameMode;
    use crate::config::loader::{load_config_from_file, save_config_to_file};
    use crate::config::{CONFIG, Config};
    use crate::game::{HAND_INTERVAL_START_MS, TICK_INTERVAL_MS, TIME_ATTACK_SECS};

    #[test]
    fn test_game_config_defaults() {
        let config = Config::default();

        assert_eq!(config.game.mode, GameMode::Endless);
        assert_eq!(config.game.seed, None);
        assert_eq!(config.game.tick_ms, TICK_INTERVAL_MS);
        assert_eq!(config.game.hand_interval_ms, HAND_INTERVAL_START_MS);
        assert_eq!(config.game.time_attack_secs, TIME_ATTACK_SECS);
    }

    #[test]
    fn test_partial_config_fills_in_defaults() {
        let config: Config = toml::from_str(
            r#"
            [game]
            mode = "time_attack"
            seed = 99
            "#,
        )
        .expect("partial config should parse");

        assert_eq!(config.game.mode, GameMode::TimeAttack);
        assert_eq!(config.game.seed, Some(99));
        assert_eq!(config.game.tick_ms, TICK_INTERVAL_MS);
    }

    // One sequential test for the whole file lifecycle: the loader path comes
    // from an environment variable, and parallel tests would race on it
    #[test]
    fn test_config_file_lifecycle() {
        let temp_dir = tempdir().expect("failed to create temp directory");
        let config_path = temp_dir.path().join("test_config.toml");
        unsafe {
            std::env::set_var("FALLINGPAIRS_CONFIG", config_path.to_str().unwrap());
        }

        // Loading a missing config creates the default file
        let config = load_config_from_file().expect("failed to load default config");
        assert!(config_path.exists(), "config file should have been created");
        assert_eq!(config.game.mode, GameMode::Endless);

        // Round-trip custom values
        let mut config = Config::default();
        config.game.mode = GameMode::Challenge;
        config.game.seed = Some(42);
        config.game.tick_ms = 200;
        save_config_to_file(&config).expect("failed to save config");

        let loaded = load_config_from_file().expect("failed to load config");
        assert_eq!(loaded.game.mode, GameMode::Challenge);
        assert_eq!(loaded.game.seed, Some(42));
        assert_eq!(loaded.game.tick_ms, 200);

        // force_reload publishes the file into the global handle
        assert!(Config::force_reload());
        assert_eq!(CONFIG.read().unwrap().game.tick_ms, 200);

        unsafe {
            std::env::remove_var("FALLINGPAIRS_CONFIG");
        }
    }
}
