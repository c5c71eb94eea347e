//! Parser Configuration
//!
//! [`ParserConfig`] is an immutable snapshot handed to the parser when it is
//! built. [`ConfigBuilder`] accepts both typed setters and the SAX-style
//! feature/property names used by XMPP servers.

use crate::error::ConfigError;

/// Namespace-aware parsing; always on
pub const FEATURE_NAMESPACES: &str = "http://xml.org/sax/features/namespaces";
/// Report `xmlns`/`xmlns:*` declarations as ordinary attributes
pub const FEATURE_NAMESPACE_PREFIXES: &str = "http://xml.org/sax/features/namespace-prefixes";
pub const FEATURE_COMMENTS_ALLOWED: &str =
    "http://mina.apache.org/vysper/features/comments-allowed";
pub const FEATURE_RESTART_ALLOWED: &str = "http://mina.apache.org/vysper/features/restart-allowed";
/// Qualified name of the element whose reopening restarts the stream
pub const PROPERTY_RESTART_QNAME: &str = "http://mina.apache.org/vysper/properties/restart-qname";

/// Immutable parser settings
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParserConfig {
    namespace_prefixes: bool,
    comments_allowed: bool,
    restart_allowed: bool,
    restart_qname: Option<String>,
}

impl Default for ParserConfig {
    fn default() -> Self {
        ParserConfig {
            namespace_prefixes: false,
            comments_allowed: true,
            restart_allowed: false,
            restart_qname: None,
        }
    }
}

impl ParserConfig {
    pub fn builder() -> ConfigBuilder {
        ConfigBuilder::default()
    }

    /// Always true; only namespace-aware parsing is supported
    pub fn namespaces(&self) -> bool {
        true
    }

    pub fn namespace_prefixes(&self) -> bool {
        self.namespace_prefixes
    }

    pub fn comments_allowed(&self) -> bool {
        self.comments_allowed
    }

    pub fn restart_allowed(&self) -> bool {
        self.restart_allowed
    }

    pub fn restart_qname(&self) -> Option<&str> {
        self.restart_qname.as_deref()
    }
}

/// Builder for [`ParserConfig`]
#[derive(Debug, Clone, Default)]
pub struct ConfigBuilder {
    config: ParserConfig,
}

impl ConfigBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn namespace_prefixes(mut self, enabled: bool) -> Self {
        self.config.namespace_prefixes = enabled;
        self
    }

    pub fn comments_allowed(mut self, allowed: bool) -> Self {
        self.config.comments_allowed = allowed;
        self
    }

    pub fn restart_allowed(mut self, allowed: bool) -> Self {
        self.config.restart_allowed = allowed;
        self
    }

    pub fn restart_qname(mut self, qname: impl Into<String>) -> Self {
        self.config.restart_qname = Some(qname.into());
        self
    }

    /// Set a feature by name
    pub fn set_feature(&mut self, name: &str, value: bool) -> Result<(), ConfigError> {
        match name {
            FEATURE_NAMESPACES if value => {}
            FEATURE_NAMESPACES => return Err(ConfigError::UnsupportedFeature(name.to_string())),
            FEATURE_NAMESPACE_PREFIXES => self.config.namespace_prefixes = value,
            FEATURE_COMMENTS_ALLOWED => self.config.comments_allowed = value,
            FEATURE_RESTART_ALLOWED => self.config.restart_allowed = value,
            _ => return Err(ConfigError::UnknownFeature(name.to_string())),
        }
        Ok(())
    }

    /// Current value of a feature
    pub fn feature(&self, name: &str) -> Result<bool, ConfigError> {
        match name {
            FEATURE_NAMESPACES => Ok(self.config.namespaces()),
            FEATURE_NAMESPACE_PREFIXES => Ok(self.config.namespace_prefixes),
            FEATURE_COMMENTS_ALLOWED => Ok(self.config.comments_allowed),
            FEATURE_RESTART_ALLOWED => Ok(self.config.restart_allowed),
            _ => Err(ConfigError::UnknownFeature(name.to_string())),
        }
    }

    /// Set a property by name
    pub fn set_property(&mut self, name: &str, value: &str) -> Result<(), ConfigError> {
        match name {
            PROPERTY_RESTART_QNAME => {
                self.config.restart_qname = Some(value.to_string());
                Ok(())
            }
            _ => Err(ConfigError::UnknownProperty(name.to_string())),
        }
    }

    /// Current value of a property; unset properties are `None`
    pub fn property(&self, name: &str) -> Result<Option<&str>, ConfigError> {
        match name {
            PROPERTY_RESTART_QNAME => Ok(self.config.restart_qname()),
            _ => Err(ConfigError::UnknownProperty(name.to_string())),
        }
    }

    pub fn build(self) -> ParserConfig {
        self.config
    }
}

impl From<ParserConfig> for ConfigBuilder {
    fn from(config: ParserConfig) -> Self {
        ConfigBuilder { config }
    }
}
