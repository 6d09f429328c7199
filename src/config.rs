use serde::Deserialize;
use serde::Serialize;

/// Document store configuration options.
#[derive(Clone, Eq, PartialEq, Hash, Debug, Serialize, Deserialize)]
#[serde(tag = "backend", content = "options", deny_unknown_fields)]
pub enum Config {
    /// Persist documents in mongodb (recommended, default).
    #[serde(rename = "mongodb")]
    MongoDB(MongoDBConfig),
}

impl Default for Config {
    fn default() -> Config {
        Config::MongoDB(MongoDBConfig::default())
    }
}

/// MongoDB document store configuration options.
#[derive(Clone, Eq, PartialEq, Hash, Debug, Serialize, Deserialize)]
pub struct MongoDBConfig {
    /// Database holding one MongoDB collection per document store collection path.
    #[serde(default = "MongoDBConfig::default_db")]
    pub db: String,

    #[serde(default = "MongoDBConfig::default_uri")]
    pub uri: String,
}

impl Default for MongoDBConfig {
    fn default() -> MongoDBConfig {
        MongoDBConfig {
            db: MongoDBConfig::default_db(),
            uri: MongoDBConfig::default_uri(),
        }
    }
}

impl MongoDBConfig {
    fn default_db() -> String {
        String::from("replicore")
    }
    fn default_uri() -> String {
        String::from("mongodb://localhost:27017/")
    }
}

#[cfg(test)]
mod tests {
    use super::Config;
    use super::MongoDBConfig;

    #[test]
    fn decode_defaults() {
        let config: Config = serde_yaml::from_str("backend: mongodb\noptions: {}")
            .expect("config to decode");
        assert_eq!(config, Config::default());
    }

    #[test]
    fn decode_options() {
        let config: Config = serde_yaml::from_str(
            "backend: mongodb\noptions:\n  db: documents\n  uri: mongodb://db:27017/",
        )
        .expect("config to decode");
        let expected = Config::MongoDB(MongoDBConfig {
            db: "documents".into(),
            uri: "mongodb://db:27017/".into(),
        });
        assert_eq!(config, expected);
    }

    #[test]
    fn reject_unknown_backend() {
        let config: Result<Config, _> = serde_yaml::from_str("backend: redis\noptions: {}");
        assert!(config.is_err());
    }
}
