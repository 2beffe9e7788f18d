//! Keyword policy deciding which runtime processes are relevant.

use serde::{Deserialize, Serialize};

use crate::models::ProcessKind;

/// Two-list classification policy matched against command lines.
///
/// Both lists are matched case-insensitively as substrings. An exclusion
/// match suppresses the record to `System` unless an inclusion substring
/// also matches, in which case inclusion wins.
///
/// The default membership targets Node.js tooling; it is operational policy
/// data, not structural logic, and callers may supply their own lists.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct KindPolicy {
    /// Substrings marking a command as background noise.
    pub exclude: Vec<String>,
    /// Substrings that rescue a command from exclusion.
    pub include: Vec<String>,
}

impl Default for KindPolicy {
    fn default() -> Self {
        Self {
            exclude: [
                "visual studio code",
                "code helper",
                "chrome",
                "chromium",
                "electron",
                "slack",
                "discord",
                "spotify",
            ]
            .iter()
            .map(|s| s.to_string())
            .collect(),
            include: [
                "npm", "yarn", "pnpm", "nodemon", "vite", "webpack", "next", "server",
            ]
            .iter()
            .map(|s| s.to_string())
            .collect(),
        }
    }
}

impl KindPolicy {
    /// Classify a command line.
    pub fn classify(&self, command: &str) -> ProcessKind {
        let command = command.to_lowercase();
        let excluded = self
            .exclude
            .iter()
            .any(|keyword| command.contains(&keyword.to_lowercase()));
        let included = self
            .include
            .iter()
            .any(|keyword| command.contains(&keyword.to_lowercase()));

        if excluded && !included {
            ProcessKind::System
        } else {
            ProcessKind::Relevant
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_plain_command_is_relevant() {
        let policy = KindPolicy::default();
        assert_eq!(policy.classify("node index.js"), ProcessKind::Relevant);
    }

    #[test]
    fn test_exclusion_marks_system() {
        let policy = KindPolicy::default();
        assert_eq!(
            policy.classify("/Applications/Slack.app/Contents/MacOS/Slack --type=renderer"),
            ProcessKind::System
        );
    }

    #[test]
    fn test_inclusion_overrides_exclusion() {
        let policy = KindPolicy::default();
        // Contains both "code helper" (exclude) and "npm" (include):
        // inclusion wins.
        assert_eq!(
            policy.classify("Code Helper (Plugin) npm run dev"),
            ProcessKind::Relevant
        );
    }

    #[test]
    fn test_matching_is_case_insensitive() {
        let policy = KindPolicy::default();
        assert_eq!(policy.classify("SLACK helper"), ProcessKind::System);
        assert_eq!(policy.classify("NPM run build"), ProcessKind::Relevant);
    }

    #[test]
    fn test_custom_policy() {
        let policy = KindPolicy {
            exclude: vec!["daemon".to_string()],
            include: vec!["worker".to_string()],
        };
        assert_eq!(policy.classify("cache daemon"), ProcessKind::System);
        assert_eq!(policy.classify("worker daemon"), ProcessKind::Relevant);
        assert_eq!(policy.classify("anything else"), ProcessKind::Relevant);
    }
}
