use serde::{Deserialize, Serialize};

/// Computes component names for described types
///
/// A type at `app/models` named `User` becomes `app_models_User`, or just
/// `User` when its path starts with one of the configured strip prefixes.
/// Two distinct identities that collapse to the same name under a strip
/// configuration will share a component; callers own that choice.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct NameNormalizer {
    strip_prefixes: Vec<String>,
}

impl NameNormalizer {
    pub fn new<I, S>(strip_prefixes: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            strip_prefixes: strip_prefixes.into_iter().map(Into::into).collect(),
        }
    }

    pub fn strip_prefixes(&self) -> &[String] {
        &self.strip_prefixes
    }

    /// Normalize a namespace path and local name into a reference-safe name
    pub fn normalize(&self, path: &str, name: &str) -> String {
        let omit_path = path.is_empty()
            || self
                .strip_prefixes
                .iter()
                .any(|prefix| path.starts_with(prefix.as_str()));

        if omit_path {
            Self::replace_separators(name)
        } else {
            Self::replace_separators(&format!("{}/{}", path, name))
        }
    }

    /// Replace module (`::`), path (`/`) and package (`.`) separators with `_`
    fn replace_separators(raw: &str) -> String {
        raw.replace("::", "_").replace(['/', '.'], "_")
    }
}
