use std::path::{Path, PathBuf};

use rand::{Rng, distr::Alphanumeric};
use serde::{Deserialize, Serialize};

#[derive(Deserialize, Serialize, Debug, Clone)]
pub struct Config {
    #[serde(skip)]
    path: PathBuf,
    #[serde(default)]
    pub base_url: Option<String>,
    #[serde(default = "default_port")]
    pub port: u16,
    #[serde(default = "default_database_path")]
    pub database_path: String,
    #[serde(default = "default_create_database")]
    pub create_database: bool,
    #[serde(default = "default_secret")]
    pub secret: String,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            path: hondana_home().join("config.yml"),
            base_url: None,
            port: default_port(),
            database_path: default_database_path(),
            create_database: default_create_database(),
            secret: default_secret(),
        }
    }
}

fn hondana_home() -> PathBuf {
    match std::env::var("HONDANA_HOME") {
        Ok(path) => PathBuf::from(path),
        Err(_) => dirs::home_dir().expect("should have home").join(".hondana"),
    }
}

fn default_port() -> u16 {
    80
}

fn default_secret() -> String {
    rand::rng()
        .sample_iter(&Alphanumeric)
        .take(16)
        .map(char::from)
        .collect()
}

fn default_database_path() -> String {
    let path = hondana_home();
    if !path.exists() {
        let _ = std::fs::create_dir_all(&path);
    }
    path.join("hondana.db").display().to_string()
}

fn default_create_database() -> bool {
    true
}

impl Config {
    pub fn open<P: AsRef<Path>>(path: Option<P>) -> Result<Config, anyhow::Error> {
        let config_path = match path {
            Some(p) => PathBuf::new().join(p),
            None => hondana_home().join("config.yml"),
        };

        match std::fs::File::open(config_path.clone()) {
            Ok(file) => {
                info!("open config from {:?}", config_path);
                let mut cfg: Self = serde_yml::from_reader(file)?;
                cfg.path = config_path;
                Ok(cfg)
            }
            Err(_) => {
                let cfg = Config {
                    path: config_path,
                    ..Default::default()
                };
                cfg.save()?;
                Ok(cfg)
            }
        }
    }

    pub fn save(&self) -> Result<(), anyhow::Error> {
        if let Some(parent) = self.path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        std::fs::write(&self.path, serde_yml::to_string(self)?)?;
        info!("config saved to {:?}", self.path);

        Ok(())
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn test_default_secret_is_alphanumeric() {
        let secret = default_secret();

        assert_eq!(secret.len(), 16);
        assert!(secret.chars().all(|c| c.is_ascii_alphanumeric()));
    }

    #[test]
    fn test_open_missing_file_writes_defaults() {
        let dir = std::env::temp_dir().join("hondana-config-test");
        let _ = std::fs::remove_dir_all(&dir);
        let path = dir.join("config.yml");

        let cfg = Config::open(Some(&path)).unwrap();
        assert!(path.exists());
        assert_eq!(cfg.port, 80);
        assert!(cfg.create_database);

        let reopened = Config::open(Some(&path)).unwrap();
        assert_eq!(reopened.secret, cfg.secret);

        let _ = std::fs::remove_dir_all(&dir);
    }
}
