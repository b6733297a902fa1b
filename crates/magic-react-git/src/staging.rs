//! Git staging (index) operations.

use crate::{GitRepository, GitResult};

impl GitRepository {
    /// Stage all changes, including removals, like `git add .`.
    pub fn stage_all(&self) -> GitResult<()> {
        self.with_repo_mut(|repo| {
            let mut index = repo.index()?;
            index.add_all(["*"].iter(), git2::IndexAddOption::DEFAULT, None)?;
            index.update_all(["*"].iter(), None)?;
            index.write()?;
            Ok(())
        })
    }

    /// Check if the index differs from HEAD.
    pub fn has_staged(&self) -> GitResult<bool> {
        self.with_repo(|repo| {
            let head_tree = match repo.head() {
                Ok(head) => Some(head.peel_to_tree()?),
                Err(_) => None,
            };
            let index = repo.index()?;
            if head_tree.is_none() {
                return Ok(!index.is_empty());
            }
            let diff = repo.diff_tree_to_index(head_tree.as_ref(), Some(&index), None)?;
            Ok(diff.deltas().len() > 0)
        })
    }
}

#[cfg(test)]
mod tests {
    use crate::GitRepository;
    use std::fs;
    use tempfile::TempDir;

    #[test]
    fn test_stage_all_picks_up_new_files() {
        let dir = TempDir::new().unwrap();
        let repo = GitRepository::init(dir.path()).unwrap();
        assert!(!repo.has_staged().unwrap());

        fs::create_dir_all(dir.path().join("src/Data")).unwrap();
        fs::write(dir.path().join("src/Data/routes.js"), "export {};\n").unwrap();
        fs::write(dir.path().join("package.json"), "{}\n").unwrap();

        repo.stage_all().unwrap();
        assert!(repo.has_staged().unwrap());

        let staged = repo.with_repo(|r| r.index().unwrap().len());
        assert_eq!(staged, 2);
    }
}
