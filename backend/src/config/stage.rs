use std::fmt::Display;

#[derive(Default, Debug, Clone, Copy, PartialEq, Eq)]
pub enum Stage {
    #[default]
    Local,
    Development,
    Production,
}

impl Stage {
    pub fn try_from(stage: &str) -> Option<Self> {
        match stage.trim().to_ascii_lowercase().as_str() {
            "local" => Some(Stage::Local),
            "development" | "dev" => Some(Stage::Development),
            "production" | "prod" => Some(Stage::Production),
            _ => None,
        }
    }
}

impl Display for Stage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let stage = match self {
            Stage::Local => "local",
            Stage::Development => "development",
            Stage::Production => "production",
        };
        write!(f, "{}", stage)
    }
}
