use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Points in the release workflow where a configured script runs
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum HookType {
    PreRelease,
    PreBump,
    PostBump,
    PreChangelog,
    PostChangelog,
    PreCommit,
    PostCommit,
    PreTag,
    PostTag,
}

impl HookType {
    /// Get the hook name as used under `[scripts]`
    pub fn name(&self) -> &'static str {
        match self {
            HookType::PreRelease => "prerelease",
            HookType::PreBump => "prebump",
            HookType::PostBump => "postbump",
            HookType::PreChangelog => "prechangelog",
            HookType::PostChangelog => "postchangelog",
            HookType::PreCommit => "precommit",
            HookType::PostCommit => "postcommit",
            HookType::PreTag => "pretag",
            HookType::PostTag => "posttag",
        }
    }
}

/// Context information passed to a hook
#[derive(Debug, Clone)]
pub struct HookContext {
    /// Type of hook being executed
    pub hook_type: HookType,
    /// Version before the release
    pub current_version: String,
    /// Version being released, once resolved
    pub new_version: Option<String>,
    /// Tag prefix in use
    pub tag_prefix: String,
    pub dry_run: bool,
}

impl HookContext {
    /// Convert context to environment variables for the hook script
    ///
    /// Maps context fields to GITBUMP_* environment variables
    pub fn to_env_vars(&self) -> HashMap<String, String> {
        let mut env = HashMap::new();

        env.insert("GITBUMP_HOOK".to_string(), self.hook_type.name().to_string());
        env.insert(
            "GITBUMP_CURRENT_VERSION".to_string(),
            self.current_version.clone(),
        );
        env.insert("GITBUMP_TAG_PREFIX".to_string(), self.tag_prefix.clone());
        env.insert("GITBUMP_DRY_RUN".to_string(), self.dry_run.to_string());

        if let Some(ref version) = self.new_version {
            env.insert("GITBUMP_NEW_VERSION".to_string(), version.clone());
            env.insert(
                "GITBUMP_TAG_NAME".to_string(),
                format!("{}{}", self.tag_prefix, version),
            );
        }

        env
    }
}
