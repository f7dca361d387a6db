// src/system/wrapper.rs

//! Rewrites raw script text into the hardened form that is actually executed.
//!
//! The wrapper cannot stop a hostile script. What it does is catch the common
//! accidents in ad hoc scripts: typos in variable names, a failing command whose
//! error is ignored, and pipelines that hide a failure in an early stage.

/// Interpreter directive placed on the first line of every wrapped script.
pub const INTERPRETER_DIRECTIVE: &str = "#!/usr/bin/env bash";

/// Strict mode plus an EXIT trap that reports completion.
pub const SAFETY_PREAMBLE: &str = "\
# Script execution safety measures
set -euo pipefail  # Exit on error, undefined vars, pipe failures

# Runs however the script ends
cleanup() {
    echo \"Script execution finished\"
}
trap cleanup EXIT

# Script content begins here";

/// Produces the executable form of `raw`.
///
/// Any leading `#!` line is dropped since the wrapper supplies its own. A body
/// that already carries the preamble is not wrapped a second time.
pub fn prepare(raw: &str) -> String {
    let body = strip_interpreter_directive(raw.trim());
    let body = body
        .strip_prefix(SAFETY_PREAMBLE)
        .map(str::trim_start)
        .unwrap_or(body);

    let mut script = String::with_capacity(
        INTERPRETER_DIRECTIVE.len() + SAFETY_PREAMBLE.len() + body.len() + 4,
    );
    script.push_str(INTERPRETER_DIRECTIVE);
    script.push_str("\n\n");
    script.push_str(SAFETY_PREAMBLE);
    script.push_str("\n\n");
    script.push_str(body);
    script
}

/// Removes the first line when it is an interpreter directive.
pub fn strip_interpreter_directive(content: &str) -> &str {
    if !content.starts_with("#!") {
        return content;
    }
    match content.split_once('\n') {
        Some((_, rest)) => rest.trim_start_matches('\n'),
        None => "",
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_prepare_adds_directive_and_strict_mode() {
        let script = prepare("echo hi");
        assert!(script.starts_with("#!/usr/bin/env bash\n"));
        assert!(script.contains("set -euo pipefail"));
        assert!(script.contains("trap cleanup EXIT"));
        assert!(script.ends_with("\n\necho hi"));
    }

    #[test]
    fn test_prepare_replaces_existing_directive() {
        let script = prepare("#!/bin/sh\necho hi\n");
        assert_eq!(script.matches("#!").count(), 1);
        assert!(!script.contains("/bin/sh"));
        assert!(script.ends_with("echo hi"));
    }

    #[test]
    fn test_prepare_without_directive_equals_prepare_with_directive() {
        let body = "x=1\necho \"$x\"";
        let with_directive = format!("#!/bin/bash\n{}", body);
        assert_eq!(prepare(body), prepare(&with_directive));
    }

    #[test]
    fn test_prepare_is_idempotent() {
        let once = prepare("ls -la | wc -l");
        let twice = prepare(&once);
        assert_eq!(once, twice);
        assert_eq!(twice.matches("set -euo pipefail").count(), 1);
    }

    #[test]
    fn test_strip_interpreter_directive() {
        assert_eq!(strip_interpreter_directive("#!/bin/bash"), "");
        assert_eq!(strip_interpreter_directive("#!/bin/bash\n\necho a"), "echo a");
        assert_eq!(strip_interpreter_directive("# comment\necho a"), "# comment\necho a");
    }

    #[test]
    fn test_prepare_keeps_inner_content_verbatim() {
        let body = "if true; then\n    echo '  spaced  '\nfi";
        assert!(prepare(body).ends_with(body));
    }
}
