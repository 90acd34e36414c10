//! SigV4 signing service identifiers.

use crate::error::AwsError;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// The service name a request is signed for.
///
/// Managed OpenSearch domains verify signatures scoped to `es`, while
/// OpenSearch Serverless collections expect `aoss`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum SigningService {
    /// Amazon OpenSearch Service (`es`).
    #[default]
    #[serde(rename = "es")]
    OpenSearch,
    /// Amazon OpenSearch Serverless (`aoss`).
    #[serde(rename = "aoss")]
    Serverless,
}

impl SigningService {
    /// The SigV4 service name.
    pub fn as_str(&self) -> &'static str {
        match self {
            SigningService::OpenSearch => "es",
            SigningService::Serverless => "aoss",
        }
    }

    /// Whether the target is a serverless collection.
    pub fn is_serverless(&self) -> bool {
        matches!(self, SigningService::Serverless)
    }
}

impl fmt::Display for SigningService {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for SigningService {
    type Err = AwsError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "es" | "opensearch" => Ok(SigningService::OpenSearch),
            "aoss" | "serverless" => Ok(SigningService::Serverless),
            other => Err(AwsError::UnknownService(other.to_string())),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_service_names() {
        assert_eq!(SigningService::OpenSearch.as_str(), "es");
        assert_eq!(SigningService::Serverless.as_str(), "aoss");
        assert_eq!(SigningService::default(), SigningService::OpenSearch);
    }

    #[test]
    fn test_parse_aliases() {
        assert_eq!("es".parse::<SigningService>().unwrap(), SigningService::OpenSearch);
        assert_eq!("AOSS".parse::<SigningService>().unwrap(), SigningService::Serverless);
        assert_eq!(
            " serverless ".parse::<SigningService>().unwrap(),
            SigningService::Serverless
        );
    }

    #[test]
    fn test_parse_unknown() {
        let err = "s3".parse::<SigningService>().unwrap_err();
        assert!(err.to_string().contains("s3"));
    }
}
