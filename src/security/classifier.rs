use crate::git::args::split_lenient;

/// Git operations that can irreversibly lose history, branches or local work
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DestructiveOp {
    ForcePush,
    RemoteDelete,
    HardReset,
    Clean,
    DeleteBranch,
    ForceBranch,
    ForceCheckout,
    DiscardChanges,
    Rebase,
    FilterHistory,
    AmendCommit,
    DropStash,
    PruneHistory,
    DeleteTag,
    ForceRemove,
}

impl DestructiveOp {
    fn summary(self) -> &'static str {
        match self {
            DestructiveOp::ForcePush => "force push rewrites remote history",
            DestructiveOp::RemoteDelete => "push deletes remote refs",
            DestructiveOp::HardReset => "hard reset discards uncommitted changes",
            DestructiveOp::Clean => "clean permanently deletes untracked files",
            DestructiveOp::DeleteBranch => "deletes a branch",
            DestructiveOp::ForceBranch => "force-moving a branch can orphan commits",
            DestructiveOp::ForceCheckout => "forced checkout discards local changes",
            DestructiveOp::DiscardChanges => "overwrites working tree changes",
            DestructiveOp::Rebase => "rebase rewrites commit history",
            DestructiveOp::FilterHistory => "rewrites the entire repository history",
            DestructiveOp::AmendCommit => "amend rewrites the last commit",
            DestructiveOp::DropStash => "permanently drops stashed changes",
            DestructiveOp::PruneHistory => "discards unreachable history",
            DestructiveOp::DeleteTag => "deletes a tag",
            DestructiveOp::ForceRemove => "forced removal discards file changes",
        }
    }
}

/// The classifier's judgment about a single command string
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Verdict {
    pub is_destructive: bool,
    /// Empty when the command is safe
    pub reason: String,
    pub operation: Option<DestructiveOp>,
}

impl Verdict {
    pub fn safe() -> Self {
        Self::default()
    }

    fn destructive(op: DestructiveOp, trigger: &str) -> Self {
        Self {
            is_destructive: true,
            reason: format!("{} ({})", op.summary(), trigger),
            operation: Some(op),
        }
    }
}

/// Decide whether a command would irreversibly discard history, branches or
/// working tree changes.
///
/// Matching is keyword and flag based. Commands chained with `&&`, `||`,
/// `|` or `;` are checked segment by segment and the first destructive
/// segment wins. Anything unrecognised is treated as safe.
pub fn classify(command: &str) -> Verdict {
    let tokens = split_lenient(command);

    segments(&tokens)
        .iter()
        .find_map(|segment| classify_segment(segment))
        .unwrap_or_default()
}

fn segments(tokens: &[String]) -> Vec<Vec<&str>> {
    let mut segments = vec![Vec::new()];

    for token in tokens {
        match token.as_str() {
            "&&" | "||" | "|" | ";" => segments.push(Vec::new()),
            t if t.ends_with(';') => {
                if let Some(current) = segments.last_mut() {
                    current.push(t.trim_end_matches(';'));
                }
                segments.push(Vec::new());
            }
            t => {
                if let Some(current) = segments.last_mut() {
                    current.push(t);
                }
            }
        }
    }

    segments
}

fn classify_segment(tokens: &[&str]) -> Option<Verdict> {
    let git_pos = tokens.iter().position(|t| is_git_binary(t))?;
    let (subcommand, rest) = find_subcommand(&tokens[git_pos + 1..])?;
    let args = Args(rest);

    match subcommand.to_ascii_lowercase().as_str() {
        "push" => classify_push(&args),
        "reset" => args
            .long("--hard")
            .then(|| Verdict::destructive(DestructiveOp::HardReset, "--hard")),
        "clean" => args
            .force()
            .map(|flag| Verdict::destructive(DestructiveOp::Clean, flag)),
        "branch" => classify_branch(&args),
        "checkout" => classify_checkout(&args),
        "switch" => classify_switch(&args),
        "restore" => classify_restore(&args),
        "rebase" => classify_rebase(&args),
        sub @ ("filter-branch" | "filter-repo") => {
            Some(Verdict::destructive(DestructiveOp::FilterHistory, sub))
        }
        "commit" => args
            .long("--amend")
            .then(|| Verdict::destructive(DestructiveOp::AmendCommit, "--amend")),
        "stash" => match args.positionals().first() {
            Some(&(action @ ("drop" | "clear"))) => {
                Some(Verdict::destructive(DestructiveOp::DropStash, action))
            }
            _ => None,
        },
        "reflog" => match args.positionals().first() {
            Some(&(action @ ("expire" | "delete"))) => {
                Some(Verdict::destructive(DestructiveOp::PruneHistory, action))
            }
            _ => None,
        },
        "gc" => (args.long("--prune=now") || args.long("--prune=all"))
            .then(|| Verdict::destructive(DestructiveOp::PruneHistory, "--prune")),
        "tag" => args
            .delete()
            .map(|flag| Verdict::destructive(DestructiveOp::DeleteTag, flag)),
        "rm" => args
            .force()
            .map(|flag| Verdict::destructive(DestructiveOp::ForceRemove, flag)),
        _ => None,
    }
}

fn classify_push(args: &Args) -> Option<Verdict> {
    if args.long("--force-with-lease") {
        return Some(Verdict::destructive(
            DestructiveOp::ForcePush,
            "--force-with-lease",
        ));
    }
    if let Some(flag) = args.force() {
        return Some(Verdict::destructive(DestructiveOp::ForcePush, flag));
    }
    if let Some(flag) = args.delete() {
        return Some(Verdict::destructive(DestructiveOp::RemoteDelete, flag));
    }
    if args.long("--mirror") {
        return Some(Verdict::destructive(DestructiveOp::RemoteDelete, "--mirror"));
    }

    // Refspecs: "+src:dst" forces the update, ":dst" deletes the remote ref
    args.positionals().iter().find_map(|refspec| {
        if refspec.starts_with('+') {
            Some(Verdict::destructive(DestructiveOp::ForcePush, "+refspec"))
        } else if refspec.starts_with(':') && refspec.len() > 1 {
            Some(Verdict::destructive(DestructiveOp::RemoteDelete, ":refspec"))
        } else {
            None
        }
    })
}

fn classify_branch(args: &Args) -> Option<Verdict> {
    if args.short('D') {
        return Some(Verdict::destructive(DestructiveOp::DeleteBranch, "-D"));
    }
    if let Some(flag) = args.delete() {
        return Some(Verdict::destructive(DestructiveOp::DeleteBranch, flag));
    }
    if args.short('M') {
        return Some(Verdict::destructive(DestructiveOp::ForceBranch, "-M"));
    }
    args.force()
        .map(|flag| Verdict::destructive(DestructiveOp::ForceBranch, flag))
}

fn classify_checkout(args: &Args) -> Option<Verdict> {
    if let Some(flag) = args.force() {
        return Some(Verdict::destructive(DestructiveOp::ForceCheckout, flag));
    }
    if args.short('B') {
        return Some(Verdict::destructive(DestructiveOp::ForceBranch, "-B"));
    }
    // "checkout -- <path>" and "checkout ." overwrite files from the index
    if args.has_pathspec() || args.positionals().contains(&".") {
        return Some(Verdict::destructive(
            DestructiveOp::DiscardChanges,
            "checkout of paths",
        ));
    }
    None
}

fn classify_switch(args: &Args) -> Option<Verdict> {
    if args.long("--discard-changes") {
        return Some(Verdict::destructive(
            DestructiveOp::DiscardChanges,
            "--discard-changes",
        ));
    }
    if let Some(flag) = args.force() {
        return Some(Verdict::destructive(DestructiveOp::ForceCheckout, flag));
    }
    args.short('C')
        .then(|| Verdict::destructive(DestructiveOp::ForceBranch, "-C"))
}

fn classify_restore(args: &Args) -> Option<Verdict> {
    let staged = args.long("--staged") || args.short('S');
    let worktree = args.long("--worktree") || args.short('W');

    // Without --staged, restore defaults to the working tree
    (!staged || worktree).then(|| Verdict::destructive(DestructiveOp::DiscardChanges, "restore"))
}

/// Options that resume, stop or inspect an in-progress rebase
const REBASE_CONTROL: &[&str] = &[
    "--continue",
    "--abort",
    "--quit",
    "--edit-todo",
    "--show-current-patch",
];

fn classify_rebase(args: &Args) -> Option<Verdict> {
    if REBASE_CONTROL.iter().any(|option| args.long(option)) {
        return None;
    }
    let trigger = if args.long("--interactive") || args.short('i') {
        "rebase --interactive"
    } else {
        "rebase"
    };
    Some(Verdict::destructive(DestructiveOp::Rebase, trigger))
}

fn is_git_binary(token: &str) -> bool {
    token == "git" || token.ends_with("/git")
}

/// Skip git's global options and return the subcommand with its arguments
fn find_subcommand<'a>(tokens: &'a [&'a str]) -> Option<(&'a str, &'a [&'a str])> {
    let mut i = 0;
    while i < tokens.len() {
        let token = tokens[i];
        match token {
            "-C" | "-c" | "--git-dir" | "--work-tree" | "--namespace" => i += 2,
            t if t.starts_with('-') => i += 1,
            t => return Some((t, &tokens[i + 1..])),
        }
    }
    None
}

/// Subcommand arguments, with flags only recognised before a `--` separator
struct Args<'a>(&'a [&'a str]);

impl<'a> Args<'a> {
    fn options(&self) -> impl Iterator<Item = &'a str> + '_ {
        self.0.iter().copied().take_while(|t| *t != "--")
    }

    fn long(&self, name: &str) -> bool {
        self.options().any(|t| {
            t == name || (t.starts_with(name) && t[name.len()..].starts_with('='))
        })
    }

    /// Short flags may be bundled, e.g. `-fdx`
    fn short(&self, flag: char) -> bool {
        self.options().any(|t| {
            t.len() > 1 && t.starts_with('-') && !t.starts_with("--") && t[1..].contains(flag)
        })
    }

    fn force(&self) -> Option<&'static str> {
        if self.long("--force") {
            Some("--force")
        } else if self.short('f') {
            Some("-f")
        } else {
            None
        }
    }

    fn delete(&self) -> Option<&'static str> {
        if self.long("--delete") {
            Some("--delete")
        } else if self.short('d') {
            Some("-d")
        } else {
            None
        }
    }

    fn positionals(&self) -> Vec<&'a str> {
        self.options().filter(|t| !t.starts_with('-')).collect()
    }

    fn has_pathspec(&self) -> bool {
        self.0
            .iter()
            .position(|t| *t == "--")
            .is_some_and(|pos| pos + 1 < self.0.len())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn op(command: &str) -> Option<DestructiveOp> {
        classify(command).operation
    }

    #[test]
    fn test_safe_command() {
        let verdict = classify("git status");
        assert!(!verdict.is_destructive);
        assert_eq!(verdict.reason, "");
        assert!(verdict.operation.is_none());
    }

    #[test]
    fn test_force_push_detection() {
        let verdict = classify("git push --force origin main");
        assert!(verdict.is_destructive);
        assert!(verdict.reason.contains("force"));
        assert!(verdict.reason.contains("--force"));
        assert_eq!(verdict.operation, Some(DestructiveOp::ForcePush));
    }

    #[test]
    fn test_force_push_variants() {
        assert_eq!(op("git push -f origin main"), Some(DestructiveOp::ForcePush));
        assert_eq!(op("git push -uf origin main"), Some(DestructiveOp::ForcePush));
        assert_eq!(
            op("git push --force-with-lease origin main"),
            Some(DestructiveOp::ForcePush)
        );
        assert_eq!(op("git push origin +main"), Some(DestructiveOp::ForcePush));
    }

    #[test]
    fn test_push_without_force_is_safe() {
        assert_eq!(op("git push origin main"), None);
        assert_eq!(op("git push --follow-tags origin main"), None);
        assert_eq!(op("git push -u origin feature"), None);
    }

    #[test]
    fn test_remote_delete_detection() {
        assert_eq!(
            op("git push origin --delete feature"),
            Some(DestructiveOp::RemoteDelete)
        );
        assert_eq!(op("git push origin :feature"), Some(DestructiveOp::RemoteDelete));
    }

    #[test]
    fn test_hard_reset_detection() {
        assert_eq!(op("git reset --hard HEAD~1"), Some(DestructiveOp::HardReset));
        assert_eq!(op("git reset --soft HEAD~1"), None);
        assert_eq!(op("git reset HEAD file.txt"), None);
    }

    #[test]
    fn test_clean_detection() {
        assert_eq!(op("git clean -fd"), Some(DestructiveOp::Clean));
        assert_eq!(op("git clean -xdf"), Some(DestructiveOp::Clean));
        assert_eq!(op("git clean --force"), Some(DestructiveOp::Clean));
        assert_eq!(op("git clean -n"), None);
    }

    #[test]
    fn test_branch_detection() {
        assert_eq!(
            op("git branch -D feature-branch"),
            Some(DestructiveOp::DeleteBranch)
        );
        assert_eq!(
            op("git branch -d feature-branch"),
            Some(DestructiveOp::DeleteBranch)
        );
        assert_eq!(
            op("git branch --delete feature"),
            Some(DestructiveOp::DeleteBranch)
        );
        assert_eq!(op("git branch -f main HEAD~2"), Some(DestructiveOp::ForceBranch));
        assert_eq!(op("git branch -a"), None);
        assert_eq!(op("git branch feature-d"), None);
    }

    #[test]
    fn test_checkout_detection() {
        assert_eq!(op("git checkout -f main"), Some(DestructiveOp::ForceCheckout));
        assert_eq!(
            op("git checkout --force main"),
            Some(DestructiveOp::ForceCheckout)
        );
        assert_eq!(
            op("git checkout -- src/main.rs"),
            Some(DestructiveOp::DiscardChanges)
        );
        assert_eq!(op("git checkout ."), Some(DestructiveOp::DiscardChanges));
        assert_eq!(op("git checkout main"), None);
        assert_eq!(op("git checkout -b feature"), None);
    }

    #[test]
    fn test_restore_detection() {
        assert_eq!(op("git restore file.txt"), Some(DestructiveOp::DiscardChanges));
        assert_eq!(op("git restore --staged file.txt"), None);
        assert_eq!(
            op("git restore --staged --worktree file.txt"),
            Some(DestructiveOp::DiscardChanges)
        );
    }

    #[test]
    fn test_rebase_detection() {
        assert_eq!(op("git rebase main"), Some(DestructiveOp::Rebase));
        let verdict = classify("git rebase -i HEAD~3");
        assert_eq!(verdict.operation, Some(DestructiveOp::Rebase));
        assert!(verdict.reason.contains("--interactive"));
        assert_eq!(op("git rebase --continue"), None);
        assert_eq!(op("git rebase --abort"), None);
        assert_eq!(op("git rebase --quit"), None);
        assert_eq!(op("git rebase --edit-todo"), None);
        assert_eq!(op("git rebase --show-current-patch"), None);
        assert_eq!(op("git rebase --skip"), Some(DestructiveOp::Rebase));
    }

    #[test]
    fn test_history_rewrites() {
        assert_eq!(
            op("git filter-branch --tree-filter 'rm file' HEAD"),
            Some(DestructiveOp::FilterHistory)
        );
        assert_eq!(
            op("git filter-repo --path secrets.txt --invert-paths"),
            Some(DestructiveOp::FilterHistory)
        );
        assert_eq!(
            op("git commit --amend -m 'better message'"),
            Some(DestructiveOp::AmendCommit)
        );
        assert_eq!(op("git commit -m 'add --amend flag docs'"), None);
    }

    #[test]
    fn test_stash_and_reflog() {
        assert_eq!(op("git stash drop stash@{0}"), Some(DestructiveOp::DropStash));
        assert_eq!(op("git stash clear"), Some(DestructiveOp::DropStash));
        assert_eq!(op("git stash list"), None);
        assert_eq!(
            op("git reflog expire --expire=now --all"),
            Some(DestructiveOp::PruneHistory)
        );
        assert_eq!(op("git gc --prune=now"), Some(DestructiveOp::PruneHistory));
        assert_eq!(op("git gc"), None);
    }

    #[test]
    fn test_global_options_are_skipped() {
        assert_eq!(
            op("git -C ../other push --force"),
            Some(DestructiveOp::ForcePush)
        );
        assert_eq!(
            op("git --no-pager -c color.ui=never reset --hard"),
            Some(DestructiveOp::HardReset)
        );
    }

    #[test]
    fn test_chained_commands() {
        assert_eq!(
            op("git fetch origin && git reset --hard origin/main"),
            Some(DestructiveOp::HardReset)
        );
        assert_eq!(op("git status; git branch -D old"), Some(DestructiveOp::DeleteBranch));
        assert_eq!(op("git add -A && git commit -m 'wip'"), None);
    }

    #[test]
    fn test_non_git_and_empty_input() {
        assert_eq!(classify(""), Verdict::safe());
        assert_eq!(classify("git"), Verdict::safe());
        assert_eq!(classify("ls -la"), Verdict::safe());
    }

    #[test]
    fn test_subcommand_case_insensitive() {
        assert_eq!(op("git PUSH --force"), Some(DestructiveOp::ForcePush));
    }

    #[test]
    fn test_classify_is_idempotent() {
        let command = "git push --force origin main";
        assert_eq!(classify(command), classify(command));
    }
}
