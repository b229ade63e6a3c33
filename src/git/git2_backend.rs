use anyhow::{Context, Result, anyhow, bail};
use git2::{
    Cred, FetchOptions, RemoteCallbacks, Repository, SubmoduleUpdateOptions,
    build::{CheckoutBuilder, RepoBuilder},
};
use std::path::Path;

use super::{PullOutcome, SyncBackend};

/// [`SyncBackend`] backed by libgit2.
#[derive(Debug, Default, Clone, Copy)]
pub struct Git2Backend;

/// Fetch options shared by the mirror clone, its pulls and submodule updates.
///
/// The default upstream is public HTTPS and never asks for credentials; a
/// private `repo` over SSH authenticates through the agent.
fn fetch_opts_with_creds() -> FetchOptions<'static> {
    let mut cb = RemoteCallbacks::new();
    cb.credentials(|_url, username_from_url, _allowed| {
        Cred::ssh_key_from_agent(username_from_url.unwrap_or("git")).or_else(|_| Cred::default())
    });

    let mut fo = FetchOptions::new();
    fo.remote_callbacks(cb);
    fo
}

/// Initialize and update all submodules, descending into nested ones.
///
/// # Errors
/// Returns an error if any submodule fails to initialize or update.
fn update_submodules(repo: &Repository) -> Result<()> {
    for mut sm in repo.submodules()? {
        sm.init(false)?;
        let mut opt = SubmoduleUpdateOptions::new();
        opt.fetch(fetch_opts_with_creds());
        sm.update(true, Some(&mut opt))
            .with_context(|| format!("update submodule {}", sm.name().unwrap_or("<unnamed>")))?;
        let nested = sm.open()?;
        update_submodules(&nested)?;
    }
    Ok(())
}

/// Perform `git fetch <remote>` for branches and tags.
fn fetch(repo: &Repository, remote: &str) -> Result<()> {
    let mut fo = fetch_opts_with_creds();
    let mut r = repo
        .find_remote(remote)
        .with_context(|| format!("remote {} not configured", remote))?;
    let heads = format!("+refs/heads/*:refs/remotes/{}/*", remote);
    r.fetch(&[heads.as_str(), "+refs/tags/*:refs/tags/*"], Some(&mut fo), None)
        .with_context(|| format!("git fetch {}", remote))?;
    Ok(())
}

impl SyncBackend for Git2Backend {
    fn clone_repo(&self, url: &str, dest: &Path) -> Result<()> {
        tracing::info!(url, dest = %dest.display(), "cloning");
        let mut builder = RepoBuilder::new();
        builder.fetch_options(fetch_opts_with_creds());

        let repo = builder
            .clone(url, dest)
            .with_context(|| format!("git clone {}", url))?;
        update_submodules(&repo)?;
        Ok(())
    }

    /// Fetch `remote`, then fast-forward the checked-out branch to its
    /// remote-tracking counterpart.
    ///
    /// # Errors
    /// Fails on a detached HEAD, a missing upstream branch, or when local and
    /// remote history have diverged.
    fn pull(&self, dest: &Path, remote: &str) -> Result<PullOutcome> {
        let repo = Repository::open(dest)
            .with_context(|| format!("cannot open repository at {}", dest.display()))?;
        fetch(&repo, remote)?;

        let head = repo.head().context("mirror has no checked-out branch")?;
        if !head.is_branch() {
            bail!("mirror HEAD is detached, cannot pull");
        }
        let local_name = head
            .name()
            .ok_or_else(|| anyhow!("invalid reference name"))?
            .to_string();
        let branch = head
            .shorthand()
            .ok_or_else(|| anyhow!("invalid branch name"))?
            .to_string();

        let upstream_name = format!("refs/remotes/{}/{}", remote, branch);
        let upstream = repo
            .find_reference(&upstream_name)
            .with_context(|| format!("no upstream branch {}", upstream_name))?;
        let fetched = repo.reference_to_annotated_commit(&upstream)?;

        let (analysis, _) = repo.merge_analysis(&[&fetched])?;
        if analysis.is_up_to_date() {
            tracing::debug!(branch = %branch, "already up to date");
            return Ok(PullOutcome::UpToDate);
        }
        if !analysis.is_fast_forward() {
            bail!(
                "non-fast-forward update: local branch {} has diverged from {}/{}",
                branch,
                remote,
                branch
            );
        }

        let mut local = repo.find_reference(&local_name)?;
        local.set_target(
            fetched.id(),
            &format!("gnore: fast-forward {} to {}", branch, fetched.id()),
        )?;
        repo.set_head(&local_name)?;
        repo.checkout_head(Some(CheckoutBuilder::new().force()))?;
        update_submodules(&repo)?;
        tracing::info!(branch = %branch, commit = %fetched.id(), "fast-forwarded");
        Ok(PullOutcome::Updated)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use git2::{Commit, IndexAddOption, Signature};
    use std::fs;
    use tempfile::{TempDir, tempdir};

    fn commit_index(repo: &Repository, msg: &str) {
        let mut index = repo.index().unwrap();
        let tree = repo.find_tree(index.write_tree().unwrap()).unwrap();
        let sig = Signature::now("gnore", "gnore@example.com").unwrap();
        let parent = repo.head().ok().and_then(|h| h.peel_to_commit().ok());
        let parents: Vec<&Commit> = parent.iter().collect();
        repo.commit(Some("HEAD"), &sig, &sig, msg, &tree, &parents)
            .unwrap();
    }

    fn commit_all(repo: &Repository, msg: &str) {
        let mut index = repo.index().unwrap();
        index
            .add_all(["*"].iter(), IndexAddOption::DEFAULT, None)
            .unwrap();
        index.write().unwrap();
        commit_index(repo, msg);
    }

    fn upstream() -> (TempDir, Repository) {
        let td = tempdir().unwrap();
        let repo = Repository::init(td.path()).unwrap();
        fs::write(td.path().join("Rust.gitignore"), "/target\n").unwrap();
        commit_all(&repo, "initial");
        (td, repo)
    }

    fn url(td: &TempDir) -> String {
        td.path().to_str().unwrap().to_string()
    }

    /// Template repo meant to be nested under `community/`.
    fn community() -> (TempDir, Repository) {
        let td = tempdir().unwrap();
        let repo = Repository::init(td.path()).unwrap();
        fs::write(td.path().join("Sub.gitignore"), "sub-v1\n").unwrap();
        commit_all(&repo, "community initial");
        (td, repo)
    }

    /// Upstream with `community()` registered as submodule `community`.
    fn upstream_with_community(sub: &TempDir) -> (TempDir, Repository) {
        let (up, repo) = upstream();
        {
            let mut sm = repo
                .submodule(&url(sub), Path::new("community"), true)
                .unwrap();
            sm.clone(None).unwrap();
            sm.add_finalize().unwrap();
        }
        commit_index(&repo, "add community submodule");
        (up, repo)
    }

    /// Move the upstream's `community` pointer to the sub repo's current HEAD.
    fn bump_community(repo: &Repository, sub: &Repository) {
        let target = sub.head().unwrap().peel_to_commit().unwrap().id();
        let mut sm = repo.find_submodule("community").unwrap();
        let checkout = sm.open().unwrap();
        checkout
            .find_remote("origin")
            .unwrap()
            .fetch(&["+refs/heads/*:refs/remotes/origin/*"], None, None)
            .unwrap();
        checkout.set_head_detached(target).unwrap();
        checkout
            .checkout_head(Some(CheckoutBuilder::new().force()))
            .unwrap();
        sm.add_to_index(true).unwrap();
        commit_index(repo, "bump community");
    }

    #[test]
    fn clone_checks_out_upstream_files() {
        let (up, _repo) = upstream();
        let work = tempdir().unwrap();
        let dest = work.path().join("mirror");
        fs::create_dir_all(&dest).unwrap();

        Git2Backend.clone_repo(&url(&up), &dest).unwrap();

        assert!(dest.join(".git").exists());
        assert_eq!(
            fs::read_to_string(dest.join("Rust.gitignore")).unwrap(),
            "/target\n"
        );
        let cloned = Repository::open(&dest).unwrap();
        assert!(cloned.find_remote("origin").is_ok());
    }

    #[test]
    fn clone_of_missing_repository_fails() {
        let work = tempdir().unwrap();
        let dest = work.path().join("mirror");
        let missing = work.path().join("no-such-upstream");
        let err = Git2Backend
            .clone_repo(missing.to_str().unwrap(), &dest)
            .unwrap_err();
        assert!(format!("{err}").contains("git clone"));
    }

    #[test]
    fn pull_without_changes_is_up_to_date() {
        let (up, _repo) = upstream();
        let work = tempdir().unwrap();
        let dest = work.path().join("mirror");
        Git2Backend.clone_repo(&url(&up), &dest).unwrap();

        let first = Git2Backend.pull(&dest, "origin").unwrap();
        let second = Git2Backend.pull(&dest, "origin").unwrap();
        assert_eq!(first, PullOutcome::UpToDate);
        assert_eq!(second, PullOutcome::UpToDate);
    }

    #[test]
    fn pull_fast_forwards_new_upstream_commits() {
        let (up, repo) = upstream();
        let work = tempdir().unwrap();
        let dest = work.path().join("mirror");
        Git2Backend.clone_repo(&url(&up), &dest).unwrap();

        fs::write(up.path().join("Go.gitignore"), "vendor/\n").unwrap();
        commit_all(&repo, "add go");

        assert_eq!(
            Git2Backend.pull(&dest, "origin").unwrap(),
            PullOutcome::Updated
        );
        assert_eq!(
            fs::read_to_string(dest.join("Go.gitignore")).unwrap(),
            "vendor/\n"
        );
    }

    #[test]
    fn pull_rejects_diverged_history() {
        let (up, repo) = upstream();
        let work = tempdir().unwrap();
        let dest = work.path().join("mirror");
        Git2Backend.clone_repo(&url(&up), &dest).unwrap();

        let local = Repository::open(&dest).unwrap();
        fs::write(dest.join("Local.gitignore"), "local\n").unwrap();
        commit_all(&local, "local change");

        fs::write(up.path().join("Remote.gitignore"), "remote\n").unwrap();
        commit_all(&repo, "remote change");

        let err = Git2Backend.pull(&dest, "origin").unwrap_err();
        assert!(format!("{err}").contains("non-fast-forward"));
    }

    #[test]
    fn pull_from_unknown_remote_fails() {
        let (up, _repo) = upstream();
        let work = tempdir().unwrap();
        let dest = work.path().join("mirror");
        Git2Backend.clone_repo(&url(&up), &dest).unwrap();

        assert!(Git2Backend.pull(&dest, "upstream").is_err());
    }

    #[test]
    fn clone_checks_out_submodules() {
        let (sub, _sub_repo) = community();
        let (up, _repo) = upstream_with_community(&sub);
        let work = tempdir().unwrap();
        let dest = work.path().join("mirror");

        Git2Backend.clone_repo(&url(&up), &dest).unwrap();

        assert_eq!(
            fs::read_to_string(dest.join("community/Sub.gitignore")).unwrap(),
            "sub-v1\n"
        );
        assert_eq!(
            fs::read_to_string(dest.join("Rust.gitignore")).unwrap(),
            "/target\n"
        );
    }

    #[test]
    fn pull_moves_submodule_to_new_pointer() {
        let (sub, sub_repo) = community();
        let (up, repo) = upstream_with_community(&sub);
        let work = tempdir().unwrap();
        let dest = work.path().join("mirror");
        Git2Backend.clone_repo(&url(&up), &dest).unwrap();

        fs::write(sub.path().join("Sub.gitignore"), "sub-v2\n").unwrap();
        commit_all(&sub_repo, "community v2");
        bump_community(&repo, &sub_repo);

        assert_eq!(
            Git2Backend.pull(&dest, "origin").unwrap(),
            PullOutcome::Updated
        );
        assert_eq!(
            fs::read_to_string(dest.join("community/Sub.gitignore")).unwrap(),
            "sub-v2\n"
        );
    }
}
