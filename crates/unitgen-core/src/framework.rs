use serde::{Deserialize, Deserializer, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// Test-authoring convention the generated cases are written for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Framework {
    #[default]
    Pytest,
    Doctest,
    Junit,
}

#[derive(Debug, Error, PartialEq, Eq)]
#[error("unknown framework '{0}'. Supported: 'pytest', 'doctest', 'junit'")]
pub struct UnknownFramework(pub String);

impl Framework {
    pub const ALL: [Framework; 3] = [Framework::Pytest, Framework::Doctest, Framework::Junit];

    pub fn as_str(self) -> &'static str {
        match self {
            Framework::Pytest => "pytest",
            Framework::Doctest => "doctest",
            Framework::Junit => "junit",
        }
    }

    /// Human label, as offered in the framework picker.
    pub fn label(self) -> &'static str {
        match self {
            Framework::Pytest => "Pytest (Python)",
            Framework::Doctest => "Doctest (Python)",
            Framework::Junit => "JUnit (Java)",
        }
    }

    pub fn extension(self) -> &'static str {
        match self {
            Framework::Junit => ".java",
            Framework::Pytest | Framework::Doctest => ".py",
        }
    }

    /// Fence tag used when the tests are embedded in Markdown.
    pub fn fence_language(self) -> &'static str {
        match self {
            Framework::Junit => "java",
            Framework::Pytest | Framework::Doctest => "python",
        }
    }
}

impl fmt::Display for Framework {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Framework {
    type Err = UnknownFramework;

    fn from_str(input: &str) -> Result<Self, Self::Err> {
        match input.trim().to_ascii_lowercase().as_str() {
            "pytest" => Ok(Framework::Pytest),
            "doctest" => Ok(Framework::Doctest),
            "junit" => Ok(Framework::Junit),
            _ => Err(UnknownFramework(input.trim().to_string())),
        }
    }
}

// Same leniency as `FromStr`, so config files accept `JUnit` like the env and flags do.
impl<'de> Deserialize<'de> for Framework {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        raw.parse().map_err(serde::de::Error::custom)
    }
}
