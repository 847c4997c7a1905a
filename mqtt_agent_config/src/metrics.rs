use serde::Serialize;

use crate::constants::{
    DEFAULT_METRIC_SDK, METRIC_PLATFORM_PREFIX, METRIC_SDK_PREFIX, METRIC_VERSION_PREFIX,
    METRICS_QUERY_START, METRICS_SEPARATOR,
};

/// Identification reported to the broker in the connect username.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MetricsIdentity {
    sdk: String,
    version: String,
    platform: String,
}

impl MetricsIdentity {
    pub fn new(
        sdk: impl Into<String>,
        version: impl Into<String>,
        platform: impl Into<String>,
    ) -> Self {
        Self {
            sdk: sdk.into(),
            version: version.into(),
            platform: platform.into(),
        }
    }

    /// Identity with the default SDK name.
    pub fn with_default_sdk(version: impl Into<String>, platform: impl Into<String>) -> Self {
        Self::new(DEFAULT_METRIC_SDK, version, platform)
    }

    pub fn sdk(&self) -> &str {
        &self.sdk
    }

    pub fn version(&self) -> &str {
        &self.version
    }

    pub fn platform(&self) -> &str {
        &self.platform
    }

    /// `SDK=<sdk>`
    pub fn sdk_metric(&self) -> String {
        format!("{METRIC_SDK_PREFIX}{}", self.sdk)
    }

    /// `Version=<version>`
    pub fn version_metric(&self) -> String {
        format!("{METRIC_VERSION_PREFIX}{}", self.version)
    }

    /// `Platform=<platform>`
    pub fn platform_metric(&self) -> String {
        format!("{METRIC_PLATFORM_PREFIX}{}", self.platform)
    }

    /// `?SDK=<sdk>&Version=<version>&Platform=<platform>`
    pub fn payload(&self) -> String {
        format!(
            "{METRICS_QUERY_START}{}{METRICS_SEPARATOR}{}{METRICS_SEPARATOR}{}",
            self.sdk_metric(),
            self.version_metric(),
            self.platform_metric()
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_metric_strings() {
        let identity = MetricsIdentity::with_default_sdk("V10.2.1", "NumakerPFMM487");
        assert_eq!(identity.sdk_metric(), "SDK=AmazonFreeRTOS");
        assert_eq!(identity.version_metric(), "Version=V10.2.1");
        assert_eq!(identity.platform_metric(), "Platform=NumakerPFMM487");
    }

    #[test]
    fn test_payload_order() {
        let identity = MetricsIdentity::new("Sdk", "1.0", "Board");
        let payload = identity.payload();
        assert_eq!(payload, "?SDK=Sdk&Version=1.0&Platform=Board");

        let sdk = payload.find("SDK=").unwrap();
        let version = payload.find("Version=").unwrap();
        let platform = payload.find("Platform=").unwrap();
        assert!(sdk < version && version < platform);
    }
}
