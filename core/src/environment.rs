/// Environment variable that selects the runtime environment.
pub const ENV_VAR: &str = "PAYSYNC_ENV";

/// The environment a host runs writes in.
///
/// `Test` makes provider hooks skip network calls entirely so they can be
/// exercised without live credentials.
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq)]
pub enum Environment {
    Production,
    #[default]
    Development,
    Test,
}

impl Environment {
    /// Read the environment from `PAYSYNC_ENV`. Unset or unknown values mean
    /// development.
    pub fn from_env() -> Self {
        std::env::var(ENV_VAR)
            .map(|value| Self::parse(&value))
            .unwrap_or_default()
    }

    pub fn parse(value: &str) -> Self {
        match value.trim().to_ascii_lowercase().as_str() {
            "test" => Self::Test,
            "prod" | "production" => Self::Production,
            _ => Self::Development,
        }
    }

    pub fn is_test(self) -> bool {
        self == Self::Test
    }
}
