use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

/// 答案去重策略
///
/// 推理器对经由不同重写路径得到的重复答案做抑制；抑制键可以取
/// 完整变量绑定，也可以只投影到调用方请求的变量上。
#[derive(Debug, Deserialize, Serialize, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum DedupPolicy {
    /// 按完整绑定元组去重
    FullBinding,
    /// 只按请求的变量投影去重
    Projected,
}

#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct EngineConfig {
    /// 规则重写的最大递归深度（循环守卫之外的防御性上限）
    pub max_expansion_depth: usize,
    pub dedup_policy: DedupPolicy,
    pub plan_cache_capacity: usize,
}

#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct LogConfig {
    pub level: String,
    pub dir: String,
    pub file: String,
    pub max_file_size: u64,
    pub max_files: usize,
}

#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct Config {
    pub engine: EngineConfig,
    pub log: LogConfig,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            max_expansion_depth: 32,
            dedup_policy: DedupPolicy::FullBinding,
            plan_cache_capacity: 256,
        }
    }
}

impl Default for LogConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            dir: "logs".to_string(),
            file: "semadb".to_string(),
            max_file_size: 100 * 1024 * 1024, // 100MB
            max_files: 5,
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            engine: EngineConfig::default(),
            log: LogConfig::default(),
        }
    }
}

impl Config {
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self, Box<dyn std::error::Error>> {
        let content = fs::read_to_string(path)?;
        let config: Config = toml::from_str(&content)?;
        Ok(config)
    }

    pub fn save<P: AsRef<Path>>(&self, path: P) -> Result<(), Box<dyn std::error::Error>> {
        let content = toml::to_string_pretty(self)?;
        fs::write(path, content)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[test]
    fn test_config_default() {
        let config = Config::default();
        assert_eq!(config.engine.max_expansion_depth, 32);
        assert_eq!(config.engine.dedup_policy, DedupPolicy::FullBinding);
        assert_eq!(config.log.level, "info");
    }

    #[test]
    fn test_config_load_save() {
        let mut temp_file = NamedTempFile::new().expect("Failed to create temporary file");

        let config = Config::default();
        let toml_content =
            toml::to_string_pretty(&config).expect("Failed to serialize config to TOML");
        temp_file
            .write_all(toml_content.as_bytes())
            .expect("Failed to write TOML content to temporary file");

        let loaded_config =
            Config::load(temp_file.path()).expect("Failed to load config from temporary file");
        assert_eq!(
            config.engine.plan_cache_capacity,
            loaded_config.engine.plan_cache_capacity
        );
        assert_eq!(config.log.file, loaded_config.log.file);
    }

    #[test]
    fn test_dedup_policy_roundtrip() {
        let mut config = Config::default();
        config.engine.dedup_policy = DedupPolicy::Projected;
        let text = toml::to_string_pretty(&config).expect("序列化失败");
        let back: Config = toml::from_str(&text).expect("反序列化失败");
        assert_eq!(back.engine.dedup_policy, DedupPolicy::Projected);
    }
}
