//! The scaffolding pipeline.
//!
//! ```text
//! check target ─▶ load spec ─▶ bootstrap ─▶ install ─▶ clean up ─▶ copy assets
//!      ─▶ expand layouts ─▶ routing module ─▶ directories ─▶ format ─▶ commit
//! ```
//!
//! Stages run strictly in this order and the first failure aborts the rest.
//! Nothing already written is rolled back.

use std::future::Future;
use std::path::{Path, PathBuf};

use magic_react_common_config::ScaffoldConfig;
use magic_react_common_fs as fs;
use magic_react_common_log::spans::{instrument_future, layout_span, stage_span, Timer};
use magic_react_common_log::timed;
use magic_react_git::{CommitOptions, GitCommit, GitRepository, GitResult};
use magic_react_routes::{
    load_spec, write_groups, Expander, FsSink, RouteRenderer, RouteSpec, RouteTable, SchemaDefaults,
    SchemaError, Synthesizer, ROUTES_MODULE_PATH,
};
use tracing::{debug, info};

use crate::assets;
use crate::error::CliError;
use crate::output::Printer;
use crate::tools::{Invocation, ToolRunner};

/// Inputs of one run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScaffoldOptions {
    pub project_name: String,
    pub routes_file: PathBuf,
    pub skip_creation: bool,
    pub no_commit: bool,
    /// Directory the project is created in and relative paths resolve from.
    pub workdir: PathBuf,
}

impl ScaffoldOptions {
    pub fn project_dir(&self) -> PathBuf {
        self.workdir.join(&self.project_name)
    }

    pub fn routes_path(&self) -> PathBuf {
        self.workdir.join(&self.routes_file)
    }
}

/// What a successful run produced.
#[derive(Debug, Clone)]
pub struct ScaffoldSummary {
    pub project_dir: PathBuf,
    pub layouts: usize,
    pub views: usize,
    pub files_written: usize,
    pub links: Vec<String>,
    pub commit: Option<GitCommit>,
}

/// Drives a run against a tool runner.
pub struct Scaffolder<'a, R: ToolRunner + ?Sized> {
    config: &'a ScaffoldConfig,
    runner: &'a R,
    printer: Printer,
}

impl<'a, R: ToolRunner + ?Sized> Scaffolder<'a, R> {
    pub fn new(config: &'a ScaffoldConfig, runner: &'a R, printer: Printer) -> Self {
        Self {
            config,
            runner,
            printer,
        }
    }

    pub async fn run(&self, options: &ScaffoldOptions) -> Result<ScaffoldSummary, CliError> {
        let project_dir = options.project_dir();
        let src = project_dir.join("src");
        let project = options.project_name.as_str();
        let tools = &self.config.tools;

        self.check_target(options, &project_dir).await?;

        let spec = self
            .stage("validate", "Validating routes", self.load_spec(options))
            .await?;
        let renderer = self.renderer(options).await?;
        info!(
            layouts = spec.layout_count(),
            views = spec.view_count(),
            "routes file accepted"
        );

        if options.skip_creation {
            debug!(dir = %project_dir.display(), "bootstrap skipped");
        } else {
            let invocation = Invocation::bootstrap(tools, project, &options.workdir);
            self.stage("bootstrap", "Creating React project", self.run_tool(invocation))
                .await?;
        }

        let invocation = Invocation::install(tools, project, &project_dir, &self.config.dependencies);
        self.stage("install", "Installing dependencies", self.run_tool(invocation))
            .await?;

        self.stage("cleanup", "Removing default files", self.cleanup(&src))
            .await?;

        let mut files_written = self
            .stage("assets", "Copying project files", async {
                Ok::<_, CliError>(write_groups(&FsSink, &project_dir, &assets::project_groups()).await?)
            })
            .await?;

        files_written += self
            .stage("expand", "Generating layouts and views", async {
                let expander = Expander::new(&renderer);
                let groups = spec
                    .layouts
                    .iter()
                    .map(|(key, layout)| {
                        layout_span(key)
                            .in_scope(|| timed!("plan_layout", expander.expand_layout(key, layout)))
                    })
                    .collect::<Result<Vec<_>, _>>()?;
                Ok::<_, CliError>(write_groups(&FsSink, &project_dir, &groups).await?)
            })
            .await?;

        let links = self
            .stage("routes", "Writing routing module", async {
                let module = Synthesizer::new(&renderer)
                    .with_icon_package(self.config.icon_package.as_str())
                    .synthesize(&spec)?;
                fs::write_with_parents(project_dir.join(ROUTES_MODULE_PATH), module.source.as_bytes())
                    .await?;
                let table = RouteTable::build(&spec, &module.bindings);
                Ok::<_, CliError>(table.links().into_iter().map(str::to_string).collect::<Vec<_>>())
            })
            .await?;
        files_written += 1;

        files_written += self
            .stage("directories", "Creating directory structure", self.directories(&src))
            .await?;

        let invocation = Invocation::format(tools, project, &project_dir);
        self.stage("format", "Formatting sources", self.run_tool(invocation))
            .await?;

        let commit = if options.no_commit {
            debug!("commit skipped");
            None
        } else {
            self.stage("commit", "Committing", self.commit(&project_dir)).await?
        };

        Ok(ScaffoldSummary {
            project_dir,
            layouts: spec.layout_count(),
            views: spec.view_count(),
            files_written,
            links,
            commit,
        })
    }

    async fn stage<T, F>(&self, name: &'static str, message: &str, work: F) -> Result<T, CliError>
    where
        F: Future<Output = Result<T, CliError>>,
    {
        self.printer.step(message);
        let timer = Timer::start(name);
        let result = instrument_future(work, stage_span(name)).await;
        timer.finish();
        result
    }

    async fn check_target(&self, options: &ScaffoldOptions, project_dir: &Path) -> Result<(), CliError> {
        let exists = fs::exists(project_dir).await?;
        match (options.skip_creation, exists) {
            (false, true) => Err(CliError::user_with_hint(
                format!("Directory \"{}\" already exists", options.project_name),
                "Pass --skip-creation to scaffold into an existing project",
            )),
            (true, false) => Err(CliError::user_with_hint(
                format!("Directory \"{}\" does not exist", options.project_name),
                "Run without --skip-creation to bootstrap the project first",
            )),
            _ => Ok(()),
        }
    }

    async fn load_spec(&self, options: &ScaffoldOptions) -> Result<RouteSpec, CliError> {
        let defaults = SchemaDefaults {
            title: self.config.defaults.title.clone(),
            icon: self.config.defaults.icon.clone(),
        };
        let path = options.routes_path();

        match load_spec(&path, &defaults).await {
            Ok(spec) => Ok(spec),
            Err(SchemaError::Read {
                source: fs::FsError::NotFound { .. },
                ..
            }) => Err(self.missing_spec(options, &path).await),
            Err(err) => Err(err.into()),
        }
    }

    /// A not-found error listing spec-like files next to the missing one.
    async fn missing_spec(&self, options: &ScaffoldOptions, path: &Path) -> CliError {
        let dir = path.parent().unwrap_or(options.workdir.as_path());
        let suggestions = fs::list_files(dir)
            .await
            .unwrap_or_default()
            .into_iter()
            .filter(|file| {
                matches!(
                    file.extension().and_then(|e| e.to_str()),
                    Some("json" | "yaml" | "yml")
                )
            })
            .filter_map(|file| {
                file.strip_prefix(&options.workdir)
                    .map(|p| p.display().to_string())
                    .ok()
            })
            .collect();

        CliError::not_found_with_suggestions(
            "routes file",
            options.routes_file.display().to_string(),
            suggestions,
        )
    }

    async fn renderer(&self, options: &ScaffoldOptions) -> Result<RouteRenderer, CliError> {
        let overrides = self.config.templates.as_ref().map(|dir| options.workdir.join(dir));
        Ok(RouteRenderer::with_overrides(overrides.as_deref()).await?)
    }

    async fn run_tool(&self, invocation: Invocation) -> Result<(), CliError> {
        Ok(self.runner.run(&invocation).await?)
    }

    async fn cleanup(&self, src: &Path) -> Result<(), CliError> {
        let pattern = self.config.cleanup_regex()?;
        let removed = fs::remove_files_where(src, |name| pattern.is_match(name)).await?;
        debug!(count = removed.len(), "default files removed");
        Ok(())
    }

    /// Create every configured directory under `src`, returning the number
    /// of placeholder files added.
    async fn directories(&self, src: &Path) -> Result<usize, CliError> {
        let mut placeholders = 0;
        for dir in &self.config.directories {
            let path = fs::path::safe_join(src, dir).ok_or_else(|| {
                CliError::user(format!("Directory \"{dir}\" escapes the project source tree"))
            })?;
            if fs::ensure_tracked_dir(&path).await? {
                placeholders += 1;
            }
        }
        Ok(placeholders)
    }

    fn commit_options(&self) -> CommitOptions {
        let commit = &self.config.commit;
        let options = CommitOptions::with_message(commit.message.as_str());
        match (&commit.author_name, &commit.author_email) {
            (Some(name), Some(email)) => options.author(name.as_str(), email.as_str()),
            _ => options,
        }
    }

    async fn commit(&self, project_dir: &Path) -> Result<Option<GitCommit>, CliError> {
        let root = project_dir.to_path_buf();
        let options = self.commit_options();

        let outcome = tokio::task::spawn_blocking(move || -> GitResult<GitCommit> {
            let (repo, created) = GitRepository::open_or_init(&root)?;
            if created {
                debug!(path = %root.display(), "repository initialized");
            }
            repo.stage_all()?;
            repo.commit(&options)
        })
        .await
        .map_err(|e| anyhow::anyhow!("commit task failed: {e}"))?;

        match outcome {
            Ok(commit) => Ok(Some(commit)),
            Err(err) if err.is_nothing_to_commit() => {
                self.printer.warning("nothing changed, no commit created");
                Ok(None)
            }
            Err(err) => Err(err.into()),
        }
    }
}
