use git_bump::boundary::BoundaryWarning;
use git_bump::ui;

// ============================================================================
// BoundaryWarning Display Tests
// ============================================================================

#[test]
fn test_boundary_warning_no_new_commits_display() {
    let warning = BoundaryWarning::NoNewCommits {
        latest_tag: "v1.0.0".to_string(),
        current_commit_hash: "abc1234def5678".to_string(),
    };

    let display_msg = warning.to_string();
    assert!(
        display_msg.contains("No new commits"),
        "Message should contain 'No new commits', got: {}",
        display_msg
    );
    assert!(
        display_msg.contains("v1.0.0"),
        "Message should contain tag 'v1.0.0', got: {}",
        display_msg
    );
    assert!(
        display_msg.contains("abc1234") && !display_msg.contains("abc1234d"),
        "Message should contain shortened commit hash 'abc1234', got: {}",
        display_msg
    );
}

#[test]
fn test_boundary_warning_short_hash_kept() {
    let warning = BoundaryWarning::NoNewCommits {
        latest_tag: "v2.0.0".to_string(),
        current_commit_hash: "abc".to_string(),
    };
    assert!(warning.to_string().contains("(current: abc)"));
}

#[test]
fn test_boundary_warning_unresolved_file_display() {
    let warning = BoundaryWarning::UnresolvedFile {
        file: "foo.unknownext".to_string(),
        reason: "unsupported file".to_string(),
    };

    let display_msg = warning.to_string();
    assert!(display_msg.contains("foo.unknownext"));
    assert!(display_msg.contains("unsupported file"));
}

#[test]
fn test_boundary_warning_unreadable_file_display() {
    let warning = BoundaryWarning::UnreadableFile {
        file: "bower.json".to_string(),
        reason: "expected value at line 1 column 1".to_string(),
    };

    let display_msg = warning.to_string();
    assert!(display_msg.starts_with("Not updating 'bower.json'"));
    assert!(display_msg.contains("line 1 column 1"));
}

#[test]
fn test_boundary_warning_version_from_tag_display() {
    let warning = BoundaryWarning::VersionFromTag {
        version: "1.4.2".to_string(),
    };
    assert!(warning.to_string().contains("1.4.2"));
    assert!(warning.to_string().contains("git tags"));
}

// ============================================================================
// Checkpoint Formatting Tests
// ============================================================================

#[test]
fn test_format_bump_checkpoint() {
    console::set_colors_enabled(false);
    let message = ui::format_bump("package.json", "1.0.0", "1.1.0");
    assert_eq!(message, "bumping version in package.json from 1.0.0 to 1.1.0");
}

#[test]
fn test_format_release_checkpoint() {
    console::set_colors_enabled(false);
    let message = ui::format_release("1.0.0", "1.1.0", "v1.1.0");
    assert!(message.contains("1.1.0"));
    assert!(message.contains("from 1.0.0"));
    assert!(message.contains("v1.1.0"));
}

#[test]
fn test_format_publish_instruction() {
    console::set_colors_enabled(false);
    let message = ui::format_publish_instruction("v1.1.0");
    assert!(message.contains("git push --follow-tags origin HEAD"));
    assert!(message.contains("v1.1.0"));
}
