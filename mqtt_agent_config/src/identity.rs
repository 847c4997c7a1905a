use serde::Serialize;

use crate::{
    constants::symbol,
    error::{AgentConfigError, AgentConfigResult},
};

/// Broker endpoint and the thing name the agent connects as.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct BrokerIdentity {
    endpoint: String,
    thing_name: String,
}

impl BrokerIdentity {
    /// Both values must be set and free of `<PLACEHOLDER>` markers.
    pub fn new(
        endpoint: impl Into<String>,
        thing_name: impl Into<String>,
    ) -> AgentConfigResult<Self> {
        let endpoint = checked(symbol::IOT_ENDPOINT, endpoint.into())?;
        let thing_name = checked(symbol::THING_NAME, thing_name.into())?;
        Ok(Self {
            endpoint,
            thing_name,
        })
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    pub fn thing_name(&self) -> &str {
        &self.thing_name
    }
}

fn checked(symbol: &'static str, value: String) -> AgentConfigResult<String> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err(AgentConfigError::missing(symbol));
    }
    if has_placeholder(trimmed) {
        return Err(AgentConfigError::UnresolvedPlaceholder { symbol, value });
    }
    Ok(trimmed.to_string())
}

/// True when `value` contains a `<NAME>` marker.
pub fn has_placeholder(value: &str) -> bool {
    value.find('<').is_some_and(|start| {
        value[start + 1..]
            .find('>')
            .is_some_and(|len| len > 0)
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[test]
    fn test_new_trims_values() {
        let identity = BrokerIdentity::new(" abc-ats.iot.us-east-1.example.com ", "sensor-1").unwrap();
        assert_eq!(identity.endpoint(), "abc-ats.iot.us-east-1.example.com");
        assert_eq!(identity.thing_name(), "sensor-1");
    }

    #[test]
    fn test_new_rejects_placeholders() {
        let err = BrokerIdentity::new("<IOT_ENDPOINT>", "sensor-1").unwrap_err();
        assert!(matches!(
            err,
            AgentConfigError::UnresolvedPlaceholder {
                symbol: symbol::IOT_ENDPOINT,
                ..
            }
        ));

        let err = BrokerIdentity::new("host", "thing-<THING_NAME>").unwrap_err();
        assert!(err.to_string().contains(symbol::THING_NAME));
    }

    #[test]
    fn test_new_rejects_empty() {
        assert!(matches!(
            BrokerIdentity::new("host", "  "),
            Err(AgentConfigError::MissingSymbol {
                symbol: symbol::THING_NAME
            })
        ));
    }

    #[rstest]
    #[case("<THING_NAME>", true)]
    #[case("a<B>c", true)]
    #[case("<>", false)]
    #[case("a < b", false)]
    #[case("plain", false)]
    fn test_has_placeholder(#[case] value: &str, #[case] expected: bool) {
        assert_eq!(has_placeholder(value), expected);
    }
}
