use serde::{Deserialize, Serialize};

/// Who produced a chat message.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SpeakerRole {
    User,
    Agent,
}

impl SpeakerRole {
    pub fn as_str(&self) -> &'static str {
        match self {
            SpeakerRole::User => "user",
            SpeakerRole::Agent => "agent",
        }
    }

    pub fn from_str(s: &str) -> Result<Self, String> {
        match s {
            "user" => Ok(SpeakerRole::User),
            "agent" => Ok(SpeakerRole::Agent),
            _ => Err(format!("Invalid speaker role: {}", s)),
        }
    }
}

impl std::fmt::Display for SpeakerRole {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_round_trip() {
        assert_eq!(SpeakerRole::from_str("user").unwrap(), SpeakerRole::User);
        assert_eq!(SpeakerRole::from_str("agent").unwrap(), SpeakerRole::Agent);
        assert_eq!(SpeakerRole::User.as_str(), "user");
        assert_eq!(SpeakerRole::Agent.as_str(), "agent");
    }

    #[test]
    fn test_invalid_role() {
        assert!(SpeakerRole::from_str("assistant").is_err());
    }
}
