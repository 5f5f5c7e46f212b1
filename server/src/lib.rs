pub mod config {
    use serde::Deserialize;

    #[derive(Deserialize, Debug)]
    pub struct Config {
        pub db_url: String,
        #[serde(default = "default_port")]
        pub port: u16,
        pub gemini_api_key: String,
        #[serde(default = "default_model")]
        pub gemini_model: String,
        /// Upper bound on a single intent-extraction call. Expiry is treated
        /// as "no usable intent", not as a request failure.
        #[serde(default = "default_intent_timeout_secs")]
        pub intent_timeout_secs: u64,
    }

    impl Config {
        /// Loads configuration from environment variables.
        pub fn from_env() -> anyhow::Result<Self> {
            let settings = config::Config::builder()
                .add_source(config::Environment::default())
                .build()?;

            let config: Config = settings.try_deserialize()?;
            Ok(config)
        }
    }

    fn default_port() -> u16 {
        8000
    }

    fn default_model() -> String {
        "gemini-2.5-flash".to_string()
    }

    fn default_intent_timeout_secs() -> u64 {
        15
    }

    #[cfg(test)]
    mod tests {
        use super::*;

        #[test]
        fn optional_fields_fall_back_to_defaults() {
            let config: Config = serde_json::from_value(serde_json::json!({
                "db_url": "postgres://localhost/todos",
                "gemini_api_key": "test-key",
            }))
            .unwrap();

            assert_eq!(config.port, 8000);
            assert_eq!(config.gemini_model, "gemini-2.5-flash");
            assert_eq!(config.intent_timeout_secs, 15);
        }

        #[test]
        fn explicit_values_override_defaults() {
            let config: Config = serde_json::from_value(serde_json::json!({
                "db_url": "postgres://localhost/todos",
                "gemini_api_key": "test-key",
                "port": 9001,
                "gemini_model": "gemini-2.5-pro",
                "intent_timeout_secs": 3,
            }))
            .unwrap();

            assert_eq!(config.port, 9001);
            assert_eq!(config.gemini_model, "gemini-2.5-pro");
            assert_eq!(config.intent_timeout_secs, 3);
        }
    }
}

pub mod chat;
pub mod entities;
pub mod intent;
pub mod todo;
pub mod web;
