use config::builder::{ConfigBuilder, DefaultState};
use config::{Config, Environment};
use lazy_static::lazy_static;
use serde::{Deserialize, Serialize};
use std::ops::Deref;
use std::path::Path;
use std::sync::RwLock;

use super::error::{Error, Result};

lazy_static! {
    pub static ref BUILDER: RwLock<ConfigBuilder<DefaultState>> = RwLock::new(Config::builder());
}

/// 日志配置
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LogConfig {
    pub level: String,
    pub file_enabled: bool,
    pub file_name: String,
}

impl Default for LogConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            file_enabled: true,
            file_name: "rights-patcher.log".to_string(),
        }
    }
}

/// Layout of a configuration export relative to `--dirPath`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LayoutConfig {
    pub documents_dir: String,
    pub catalogs_dir: String,
    pub roles_dir: String,
    pub rights_file_name: String,
    pub instance_extension: String,
}

impl Default for LayoutConfig {
    fn default() -> Self {
        Self {
            documents_dir: "Documents".to_string(),
            catalogs_dir: "Catalogs".to_string(),
            roles_dir: "Roles".to_string(),
            rights_file_name: "Rights.xml".to_string(),
            instance_extension: "xml".to_string(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppConfig {
    pub log: LogConfig,
    pub layout: LayoutConfig,
}

impl AppConfig {
    /// Initialize AppConfig from the embedded defaults and the environment.
    pub fn init(default_config: Option<&str>) -> Result<()> {
        let mut builder = Config::builder();

        if let Some(config_contents) = default_config {
            builder = builder.add_source(config::File::from_str(
                config_contents,
                config::FileFormat::Toml,
            ));
        }

        builder = builder.add_source(
            Environment::with_prefix("RIGHTS_PATCHER")
                .prefix_separator("_")
                .separator("__"),
        );

        {
            let mut w = BUILDER.write()?;
            *w = builder;
        }

        Ok(())
    }

    /// 合并用户指定的配置文件
    pub fn merge_config(config_file: Option<&Path>) -> Result<()> {
        if let Some(config_file_path) = config_file {
            let path = config_file_path
                .to_str()
                .ok_or_else(|| Error::new("Configuration path is not valid UTF-8"))?;
            let mut w = BUILDER.write()?;
            *w = w.clone().add_source(config::File::with_name(path));
        }
        Ok(())
    }

    pub fn set(key: &str, value: &str) -> Result<()> {
        {
            let mut w = BUILDER.write()?;
            *w = w.clone().set_override(key, value)?;
        }

        Ok(())
    }

    pub fn get<'de, T>(key: &'de str) -> Result<T>
    where
        T: serde::Deserialize<'de>,
    {
        Ok(BUILDER.read()?.deref().clone().build()?.get::<T>(key)?)
    }

    pub fn fetch() -> Result<AppConfig> {
        let r = BUILDER.read()?;
        let config_clone = r.deref().clone().build()?;
        let app_config: AppConfig = config_clone.try_deserialize()?;

        Ok(app_config)
    }
}
