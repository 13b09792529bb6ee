use chrono::{DateTime, FixedOffset, Offset, Utc};
use futures::stream::{self, StreamExt};
use git2::{Commit, DiffFindOptions, DiffOptions, ErrorCode, Oid, Patch, Repository, Sort};
use serde::Serialize;
use std::collections::HashMap;
use std::path::Path;
use std::time::Instant;
use tokio::task::spawn_blocking;
use tracing::{debug, info};

use crate::error::Result;
use crate::types::{CommitSummary, ContributionRecord, FileTypeStats};

/// Lines changed in one file of one commit.
#[derive(Debug, Clone, PartialEq, Eq)]
struct FileChange {
    extension: String,
    added: u64,
    removed: u64,
}

/// A commit reduced to what the contributions document needs.
#[derive(Debug, Clone)]
struct CommitContribution {
    author: String,
    summary: CommitSummary,
    files: Vec<FileChange>,
}

/// Build a contributions document from the history reachable from HEAD.
///
/// Records appear in the order their author's newest commit is reached, and
/// each record lists that author's commits newest first.
pub async fn generate_document(repo_path: impl AsRef<Path>) -> Result<Vec<ContributionRecord>> {
    let start_time = Instant::now();
    let repo_path = repo_path.as_ref().to_path_buf();

    let commits = {
        let repo_path = repo_path.clone();
        spawn_blocking(move || list_commits(&repo_path)).await??
    };
    debug!(commits = commits.len(), "collected commit ids");

    let chunk_size = get_optimal_chunk_size(commits.len());
    let chunks: Vec<Vec<Oid>> = commits.chunks(chunk_size).map(<[Oid]>::to_vec).collect();

    // `buffered` keeps chunk results in history order.
    let results = stream::iter(chunks)
        .map(|chunk| {
            let repo_path = repo_path.clone();
            spawn_blocking(move || process_commit_chunk(&repo_path, &chunk))
        })
        .buffered(get_optimal_task_count())
        .collect::<Vec<_>>()
        .await;

    let mut contributions = Vec::with_capacity(commits.len());
    for result in results {
        contributions.extend(result??);
    }

    let records = group_by_author(contributions);
    info!(
        authors = records.len(),
        commits = commits.len(),
        elapsed_secs = start_time.elapsed().as_secs_f64(),
        "generated contributions document"
    );
    Ok(records)
}

/// Write records as a pretty-printed JSON document.
pub async fn write_document(records: &[ContributionRecord], path: impl AsRef<Path>) -> Result<()> {
    let mut buffer = Vec::new();
    let formatter = serde_json::ser::PrettyFormatter::with_indent(b"    ");
    let mut serializer = serde_json::Serializer::with_formatter(&mut buffer, formatter);
    records.serialize(&mut serializer)?;
    tokio::fs::write(path.as_ref(), buffer).await?;
    Ok(())
}

fn list_commits(repo_path: &Path) -> Result<Vec<Oid>> {
    let repo = Repository::open(repo_path)?;
    let mut revwalk = repo.revwalk()?;
    revwalk.set_sorting(Sort::TIME)?;

    match revwalk.push_head() {
        Ok(()) => {}
        Err(e) if matches!(e.code(), ErrorCode::UnbornBranch | ErrorCode::NotFound) => {
            debug!("repository has no commits yet");
            return Ok(Vec::new());
        }
        Err(e) => return Err(e.into()),
    }

    Ok(revwalk.collect::<std::result::Result<Vec<_>, _>>()?)
}

/// Process a chunk of commits
fn process_commit_chunk(repo_path: &Path, chunk: &[Oid]) -> Result<Vec<CommitContribution>> {
    let repo = Repository::open(repo_path)?;
    let mut contributions = Vec::with_capacity(chunk.len());

    for &oid in chunk {
        let commit = repo.find_commit(oid)?;
        let signature = commit.author();
        let author = signature.name().unwrap_or("Unknown").to_string();
        let date = format_date(signature.when());

        // Merge commits list no files, like `git log --numstat`.
        let files = if commit.parent_count() > 1 {
            Vec::new()
        } else {
            file_changes(&repo, &commit)?
        };

        contributions.push(CommitContribution {
            author,
            summary: CommitSummary {
                hash: oid.to_string(),
                date,
                message: commit.summary().unwrap_or("").to_string(),
            },
            files,
        });
    }

    Ok(contributions)
}

fn file_changes(repo: &Repository, commit: &Commit<'_>) -> Result<Vec<FileChange>> {
    let tree = commit.tree()?;
    let parent_tree = match commit.parent_count() {
        0 => None,
        _ => Some(commit.parent(0)?.tree()?),
    };

    let mut diff_opts = DiffOptions::new();
    diff_opts.include_untracked(false).context_lines(0);
    let mut diff =
        repo.diff_tree_to_tree(parent_tree.as_ref(), Some(&tree), Some(&mut diff_opts))?;

    // Pair deletes with adds so a moved file counts only its edits.
    let mut find_opts = DiffFindOptions::new();
    find_opts.renames(true);
    diff.find_similar(Some(&mut find_opts))?;

    let mut files = Vec::new();
    for idx in 0..diff.deltas().len() {
        let Some(patch) = Patch::from_diff(&diff, idx)? else {
            continue;
        };
        let delta = patch.delta();
        if delta.flags().is_binary() {
            continue;
        }
        let Some(extension) = delta
            .new_file()
            .path()
            .or_else(|| delta.old_file().path())
            .and_then(file_extension)
        else {
            continue;
        };

        let (_, added, removed) = patch.line_stats()?;
        files.push(FileChange {
            extension,
            added: added as u64,
            removed: removed as u64,
        });
    }

    Ok(files)
}

/// The text after the last `.` of a path, if it is made of word characters.
fn file_extension(path: &Path) -> Option<String> {
    let path = path.to_string_lossy();
    let (_, extension) = path.rsplit_once('.')?;
    let is_word = |c: char| c.is_alphanumeric() || c == '_';
    (!extension.is_empty() && extension.chars().all(is_word)).then(|| extension.to_string())
}

/// Author date as `YYYY-MM-DD` in the author's own offset.
fn format_date(time: git2::Time) -> String {
    let offset = FixedOffset::east_opt(time.offset_minutes() * 60).unwrap_or_else(|| Utc.fix());
    DateTime::<Utc>::from_timestamp(time.seconds(), 0)
        .map(|dt| dt.with_timezone(&offset).format("%Y-%m-%d").to_string())
        .unwrap_or_else(|| "Unknown".to_string())
}

fn group_by_author(contributions: Vec<CommitContribution>) -> Vec<ContributionRecord> {
    let mut records: Vec<ContributionRecord> = Vec::new();
    let mut positions: HashMap<String, usize> = HashMap::new();

    for contribution in contributions {
        let position = *positions
            .entry(contribution.author.clone())
            .or_insert_with(|| {
                records.push(ContributionRecord {
                    author: contribution.author.clone(),
                    contributions: FileTypeStats::new(),
                    commits: Vec::new(),
                });
                records.len() - 1
            });

        let record = &mut records[position];
        for file in &contribution.files {
            record
                .contributions
                .accumulate(&file.extension, file.added, file.removed);
        }
        record.commits.push(contribution.summary);
    }

    records
}

/// Get optimal chunk size based on commit count
fn get_optimal_chunk_size(total_commits: usize) -> usize {
    const MIN_CHUNK_SIZE: usize = 100;
    const MAX_CHUNK_SIZE: usize = 2000;

    let per_task = total_commits.div_ceil(get_optimal_task_count());
    per_task.clamp(MIN_CHUNK_SIZE, MAX_CHUNK_SIZE)
}

/// Get optimal number of parallel tasks based on system resources
fn get_optimal_task_count() -> usize {
    let cpu_count = num_cpus::get();
    // Use 75% of available CPUs to leave room for other system processes
    (cpu_count * 3 / 4).max(1)
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_file_extension() {
        assert_eq!(file_extension(Path::new("src/main.rs")), Some("rs".to_string()));
        assert_eq!(file_extension(Path::new("archive.tar.gz")), Some("gz".to_string()));
        assert_eq!(file_extension(Path::new(".gitignore")), Some("gitignore".to_string()));
        assert_eq!(file_extension(Path::new("Makefile")), None);
        assert_eq!(file_extension(Path::new("conf.d/Makefile")), None);
        assert_eq!(file_extension(Path::new("weird.")), None);
        assert_eq!(file_extension(Path::new("name.c++")), None);
    }

    #[test]
    fn test_format_date_uses_author_offset() {
        // 2024-01-01T23:30:00Z
        let seconds = 1_704_151_800;
        assert_eq!(format_date(git2::Time::new(seconds, 0)), "2024-01-01");
        assert_eq!(format_date(git2::Time::new(seconds, 60)), "2024-01-02");
        assert_eq!(format_date(git2::Time::new(seconds, -120)), "2024-01-01");
    }

    #[test]
    fn test_group_by_author_keeps_first_seen_order() {
        let commit = |author: &str, hash: &str, files: Vec<(&str, u64, u64)>| CommitContribution {
            author: author.to_string(),
            summary: CommitSummary {
                hash: hash.to_string(),
                date: "2024-01-01".to_string(),
                message: String::new(),
            },
            files: files
                .into_iter()
                .map(|(extension, added, removed)| FileChange {
                    extension: extension.to_string(),
                    added,
                    removed,
                })
                .collect(),
        };

        let records = group_by_author(vec![
            commit("Zoe", "c3", vec![("rs", 4, 1)]),
            commit("Ann", "c2", vec![("md", 1, 0)]),
            commit("Zoe", "c1", vec![("toml", 2, 0), ("rs", 1, 1)]),
        ]);

        assert_eq!(records.len(), 2);
        assert_eq!(records[0].author, "Zoe");
        assert_eq!(
            records[0].commits.iter().map(|c| c.hash.as_str()).collect::<Vec<_>>(),
            vec!["c3", "c1"]
        );
        assert_eq!(
            records[0].contributions.keys().collect::<Vec<_>>(),
            vec!["rs", "toml"]
        );
        assert_eq!(records[0].contributions.get("rs").map(|c| (c.added, c.removed)), Some((5, 2)));
        assert_eq!(records[1].author, "Ann");
    }
}
