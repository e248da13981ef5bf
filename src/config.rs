use serde::{Deserialize, Serialize};

use crate::error::RouterResult;

pub const DEFAULT_PARAM_PREFIX: &str = "param_";
pub const DEFAULT_QUERY_PREFIX: &str = "query_";

/// ディスパッチャの設定
///
/// ```rust
/// # use domain_router::config::DispatchConfig;
/// let config = DispatchConfig::from_json(r#"{ "expose_query": false }"#).unwrap();
/// assert_eq!(config.param_prefix, "param_");
/// assert!(!config.expose_query);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct DispatchConfig {
    /// パスパラメータを属性に入れるときの接頭辞
    pub param_prefix: String,
    /// クエリを属性に入れるときの接頭辞
    pub query_prefix: String,
    /// 一致したときにクエリを属性に展開するか
    pub expose_query: bool,
}

impl DispatchConfig {
    /// JSON から読む (足りない項目はデフォルト)
    pub fn from_json(json: &str) -> RouterResult<DispatchConfig> {
        Ok(serde_json::from_str(json)?)
    }

    pub fn param_prefix(mut self, prefix: &str) -> Self {
        self.param_prefix = prefix.to_string();
        self
    }

    pub fn query_prefix(mut self, prefix: &str) -> Self {
        self.query_prefix = prefix.to_string();
        self
    }

    pub fn expose_query(mut self, expose: bool) -> Self {
        self.expose_query = expose;
        self
    }
}

impl Default for DispatchConfig {
    fn default() -> Self {
        DispatchConfig {
            param_prefix: DEFAULT_PARAM_PREFIX.to_string(),
            query_prefix: DEFAULT_QUERY_PREFIX.to_string(),
            expose_query: true,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::RouterError;

    #[test]
    fn empty_object_is_default() {
        assert_eq!(DispatchConfig::from_json("{}").unwrap(), DispatchConfig::default());
    }

    #[test]
    fn overrides_are_applied() {
        let config = DispatchConfig::from_json(r#"{ "param_prefix": "p.", "query_prefix": "q." }"#).unwrap();
        assert_eq!(config.param_prefix, "p.");
        assert_eq!(config.query_prefix, "q.");
        assert!(config.expose_query);
    }

    #[test]
    fn bad_json_is_invalid_config() {
        assert!(matches!(
            DispatchConfig::from_json(r#"{ "param_prefix": 3 }"#),
            Err(RouterError::InvalidConfig(_))
        ));
        assert!(matches!(
            DispatchConfig::from_json(r#"{ "unknown": true }"#),
            Err(RouterError::InvalidConfig(_))
        ));
    }

    #[test]
    fn builder_methods() {
        let config = DispatchConfig::default().param_prefix("path:").expose_query(false);
        assert_eq!(config.param_prefix, "path:");
        assert_eq!(config.query_prefix, DEFAULT_QUERY_PREFIX);
        assert!(!config.expose_query);
    }
}
