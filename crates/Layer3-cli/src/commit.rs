//! Commit message generation from the staged diff

use gitforge_foundation::{Error, GitForgeConfig, Result};
use gitforge_provider::Gateway;

/// `gitforge commit [--context TEXT]`
pub async fn run(context: Option<String>) -> Result<()> {
    let diff = staged_diff()?;
    if diff.trim().is_empty() {
        println!("No staged changes.");
        return Ok(());
    }

    let config = GitForgeConfig::load()?;
    let gateway = Gateway::from_config(&config)?;

    let prompt = build_prompt(&diff, config.emoji, context.as_deref());
    tracing::debug!("Requesting commit message from {}", config.provider.name());

    let message = gateway.generate(&prompt).await?;
    println!("{message}");

    Ok(())
}

/// Staged diff via `git diff --cached`
fn staged_diff() -> Result<String> {
    let output = std::process::Command::new("git")
        .args(["diff", "--cached"])
        .output()
        .map_err(|e| Error::Git(format!("failed to run git: {e}")))?;

    if !output.status.success() {
        let stderr = String::from_utf8_lossy(&output.stderr);
        return Err(Error::Git(stderr.trim().to_string()));
    }

    Ok(String::from_utf8_lossy(&output.stdout).into_owned())
}

fn build_prompt(diff: &str, emoji: bool, context: Option<&str>) -> String {
    let mut prompt = String::from(
        "Write a git commit message for the staged changes below.\n\
         Rules:\n\
         - Conventional Commits format: type(scope): subject\n\
         - Subject at most 72 characters, imperative mood\n\
         - Add a short body only when the change needs explanation\n",
    );
    if emoji {
        prompt.push_str("- Start the subject with one fitting gitmoji\n");
    }
    prompt.push_str("- Output only the commit message, no code fences\n");

    if let Some(context) = context {
        prompt.push_str("\nAdditional context from the author: ");
        prompt.push_str(context);
        prompt.push('\n');
    }

    prompt.push_str("\nStaged diff:\n");
    prompt.push_str(diff);

    prompt
}
