use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct Configuration {
    pub catalog: CatalogConfig,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct CatalogConfig {
    #[serde(rename = "baseUrl")]
    pub base_url: String,
    #[serde(rename = "apikey")]
    pub api_key: String,
}

impl Configuration {
    pub fn from_file(path: &str) -> anyhow::Result<Self> {
        let content = std::fs::read_to_string(path)?;
        let config: Configuration = serde_yaml::from_str(&content)?;
        Ok(config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_catalog_section() {
        let yaml = "catalog:\n  baseUrl: https://api.example.com/v2\n  apikey: secret\n";
        let config: Configuration = serde_yaml::from_str(yaml).unwrap();

        assert_eq!(config.catalog.base_url, "https://api.example.com/v2");
        assert_eq!(config.catalog.api_key, "secret");
    }
}
