#[cfg(feature = "cli")]
pub mod cli;
pub mod toml_config;

pub use toml_config::AppConfig;

pub const DEV_CONFIG_FILE: &str = "base_config.toml";
pub const PROD_CONFIG_FILE: &str = "config.toml";

/// `dev` 使用基礎配置，其餘（包含未指定）都使用正式配置
pub fn config_file_name(environment: &str) -> &'static str {
    if environment == "dev" {
        DEV_CONFIG_FILE
    } else {
        PROD_CONFIG_FILE
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_file_name() {
        assert_eq!(config_file_name("dev"), "base_config.toml");
        assert_eq!(config_file_name(""), "config.toml");
        assert_eq!(config_file_name("prod"), "config.toml");
        assert_eq!(config_file_name("DEV"), "config.toml");
    }
}
