//! 会話履歴
//!
//! 呼び出し側が所有する追記専用のログ。照合処理からは参照しない。

use crate::error::Result;
use chrono::{DateTime, Local};
use serde::{Deserialize, Serialize};
use std::path::Path;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    User,
    Assistant,
}

impl std::fmt::Display for Role {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Role::User => write!(f, "🧑‍💼"),
            Role::Assistant => write!(f, "🤖"),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChatEntry {
    pub role: Role,
    pub message: String,
    pub timestamp: DateTime<Local>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ChatLog {
    entries: Vec<ChatEntry>,
}

impl ChatLog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, role: Role, message: impl Into<String>) -> &ChatEntry {
        self.entries.push(ChatEntry {
            role,
            message: message.into(),
            timestamp: Local::now(),
        });
        &self.entries[self.entries.len() - 1]
    }

    pub fn push_user(&mut self, message: impl Into<String>) -> &ChatEntry {
        self.push(Role::User, message)
    }

    pub fn push_assistant(&mut self, message: impl Into<String>) -> &ChatEntry {
        self.push(Role::Assistant, message)
    }

    pub fn entries(&self) -> &[ChatEntry] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn save(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent)?;
            }
        }
        let json = serde_json::to_string_pretty(self)?;
        std::fs::write(path, json)?;
        Ok(())
    }

    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        Ok(serde_json::from_str(&content)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn test_append_only_order() {
        let mut log = ChatLog::new();
        log.push_user("40代男性、東京");
        log.push_assistant("1件の求人が見つかりました。");
        log.push_assistant("【勤務地】東京都");

        let roles: Vec<Role> = log.entries().iter().map(|e| e.role).collect();
        assert_eq!(roles, vec![Role::User, Role::Assistant, Role::Assistant]);
        assert_eq!(log.entries()[0].message, "40代男性、東京");
        assert!(log.entries()[0].timestamp <= log.entries()[2].timestamp);
    }

    #[test]
    fn test_save_and_load() {
        let dir = tempdir().expect("Failed to create temp dir");
        let path = dir.path().join("logs").join("session.json");

        let mut log = ChatLog::new();
        log.push_user("寮希望");
        log.push_assistant("該当なし");
        log.save(&path).unwrap();

        let loaded = ChatLog::load(&path).unwrap();
        assert_eq!(loaded.len(), 2);
        assert_eq!(loaded.entries()[1].role, Role::Assistant);
        assert_eq!(loaded.entries()[1].message, "該当なし");
    }
}
