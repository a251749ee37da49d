//
// config.rs
//
// Engine configuration, deserializable from host-provided settings JSON
//

use serde::Deserialize;

use crate::scanner::ScanStrategy;

/// Icon preview configuration.
///
/// Hosts hand this to the engine once at construction. No scan or diff
/// logic depends on the CDN values; they are only read at resolution time.
#[derive(Debug, Clone, Deserialize)]
#[serde(default, rename_all = "kebab-case")]
pub struct PreviewConfig {
    /// Base URL the icon resolver fetches SVG assets from
    pub cdn_base_url: String,
    /// Icon library version pinned into asset URLs
    pub icon_version: String,
    /// Quiescence window before a scheduled scan runs, in milliseconds.
    /// Trades perceived latency for scan/render cost.
    pub debounce_ms: u64,
    /// Whether a scan covers one import or all of them
    pub scan_strategy: ScanStrategy,
}

impl Default for PreviewConfig {
    fn default() -> Self {
        Self {
            cdn_base_url: "https://unpkg.com/@sicons".to_string(),
            icon_version: "0.12.0".to_string(),
            debounce_ms: 300,
            scan_strategy: ScanStrategy::Exhaustive,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_reference_values() {
        let config = PreviewConfig::default();
        assert_eq!(config.cdn_base_url, "https://unpkg.com/@sicons");
        assert_eq!(config.icon_version, "0.12.0");
        assert_eq!(config.debounce_ms, 300);
        assert_eq!(config.scan_strategy, ScanStrategy::Exhaustive);
    }

    #[test]
    fn deserializes_partial_settings() {
        let config: PreviewConfig =
            serde_json::from_str(r#"{"debounce-ms": 150, "scan-strategy": "single-pass"}"#)
                .unwrap();
        assert_eq!(config.debounce_ms, 150);
        assert_eq!(config.scan_strategy, ScanStrategy::SinglePass);
        // Unspecified fields fall back to defaults
        assert_eq!(config.icon_version, "0.12.0");
    }

    #[test]
    fn deserializes_empty_object() {
        let config: PreviewConfig = serde_json::from_str("{}").unwrap();
        assert_eq!(config.debounce_ms, 300);
    }
}
