#![cfg(feature = "async")]

mod common;

use common::{empty_repo, write};
use git_scribe::{AsyncRepository, GitError};

#[tokio::test]
async fn test_async_round_trip() {
    let (dir, repo) = empty_repo();
    let repo = AsyncRepository::from(repo);
    write(dir.path(), "a.txt", "one\ntwo\n");

    let status = repo.status().await.unwrap();
    assert_eq!(status.len(), 1);
    assert!(status[0].is_untracked());

    let untracked = repo.untracked_diff(vec![]).await.unwrap();
    assert_eq!(untracked[0].additions, 2);

    assert!(matches!(
        repo.amend_commit("nothing yet".into()).await,
        Err(GitError::NoCommits)
    ));

    repo.stage(vec!["a.txt".into()]).await.unwrap();
    let staged = repo.diff(true, vec![]).await.unwrap();
    assert_eq!(staged.len(), 1);

    repo.commit("add a".into()).await.unwrap();
    let history = repo.history(0).await.unwrap();
    assert_eq!(history.len(), 1);
    assert_eq!(history[0].subject, "add a");
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_concurrent_mutations_are_serialized() {
    let (dir, repo) = empty_repo();
    let repo = AsyncRepository::from(repo);
    let names: Vec<String> = (0..8).map(|i| format!("file{}.txt", i)).collect();
    for name in &names {
        write(dir.path(), name, "content\n");
    }

    // Concurrent `git add` calls would race on the index lock without serialization.
    let handles: Vec<_> = names
        .iter()
        .cloned()
        .map(|name| {
            let repo = repo.clone();
            tokio::spawn(async move { repo.stage(vec![name]).await })
        })
        .collect();
    for handle in handles {
        handle.await.unwrap().unwrap();
    }

    let status = repo.status().await.unwrap();
    assert_eq!(status.len(), names.len());
    assert!(status.iter().all(|f| f.staged));

    repo.discard_changes("file0.txt".into()).await.unwrap();
    let status = repo.status().await.unwrap();
    let first = status.iter().find(|f| f.path == "file0.txt").unwrap();
    assert!(first.is_untracked());
}
