use std::fmt::{Display, Formatter, Result as FmtResult};
use std::str::FromStr;

/// What a delete does when the media host fails to remove the blob.
#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RemoteDeletePolicy {
    /// Log the failure and still remove the record. May orphan the blob.
    BestEffort,
    /// Fail the whole delete and keep the record.
    Required,
}

impl RemoteDeletePolicy {
    pub fn is_required(&self) -> bool {
        matches!(self, RemoteDeletePolicy::Required)
    }
}

impl FromStr for RemoteDeletePolicy {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().replace('-', "_").as_str() {
            "best_effort" => Ok(RemoteDeletePolicy::BestEffort),
            "required" => Ok(RemoteDeletePolicy::Required),
            _ => Err(anyhow::anyhow!(
                "Invalid remote delete policy: {} (expected best_effort or required)",
                s
            )),
        }
    }
}

impl Display for RemoteDeletePolicy {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        match self {
            RemoteDeletePolicy::BestEffort => write!(f, "best_effort"),
            RemoteDeletePolicy::Required => write!(f, "required"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_policy_spellings() {
        assert_eq!(
            "best-effort".parse::<RemoteDeletePolicy>().unwrap(),
            RemoteDeletePolicy::BestEffort
        );
        assert_eq!(
            " REQUIRED ".parse::<RemoteDeletePolicy>().unwrap(),
            RemoteDeletePolicy::Required
        );
        assert!("sometimes".parse::<RemoteDeletePolicy>().is_err());
    }

    #[test]
    fn display_matches_parse() {
        for policy in [RemoteDeletePolicy::BestEffort, RemoteDeletePolicy::Required] {
            assert_eq!(policy.to_string().parse::<RemoteDeletePolicy>().unwrap(), policy);
        }
    }
}
