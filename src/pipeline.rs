//! Release pipeline orchestration
//!
//! Drives each component through a fixed stage sequence, strictly one
//! component at a time and in registry order:
//!
//! 1. Validate the checkout is on the main branch
//! 2. Patch the Helm chart
//! 3. Pin dependencies on earlier components (if any)
//! 4. Patch the OpenAPI document and validate the build (full releases only)
//! 5. Run the precommit hook (full releases only, if declared)
//! 6. Commit, push and open a review request
//! 7. Wait for the review request to be approved
//! 8. Tag main and push the tag
//!
//! Every selected component is validated before any of them is released.
//! The first failure ends the run; nothing already done is undone.

use std::fmt;
use std::path::PathBuf;
use std::sync::Arc;

use tracing::{debug, info};

use crate::approval::{ApprovalProvider, ApprovalRequest};
use crate::config::Settings;
use crate::error::{ReleaseError, Result};
use crate::patch;
use crate::registry::Component;
use crate::tools::ExternalTools;
use crate::ui;
use crate::version::VersionSpec;
use crate::workdir::WorkdirGuard;

/// Where a component is in its release.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PipelineStage {
    Validate,
    PatchChart,
    UpdateDependencies,
    PatchOpenApi,
    PrecommitHook,
    CommitAndPublish,
    AwaitApproval,
    TagAndPush,
}

impl PipelineStage {
    pub fn name(&self) -> &'static str {
        match self {
            PipelineStage::Validate => "validate",
            PipelineStage::PatchChart => "patch-chart",
            PipelineStage::UpdateDependencies => "update-dependencies",
            PipelineStage::PatchOpenApi => "patch-openapi",
            PipelineStage::PrecommitHook => "precommit-hook",
            PipelineStage::CommitAndPublish => "commit-and-publish",
            PipelineStage::AwaitApproval => "await-approval",
            PipelineStage::TagAndPush => "tag-and-push",
        }
    }

    /// Heading shown to the operator when the stage starts.
    pub fn heading(&self) -> &'static str {
        match self {
            PipelineStage::Validate => "Validating",
            PipelineStage::PatchChart => "Updating Helm",
            PipelineStage::UpdateDependencies => "Updating Go Dependencies",
            PipelineStage::PatchOpenApi => "Updating OpenAPI",
            PipelineStage::PrecommitHook => "Calling Precommit Hook",
            PipelineStage::CommitAndPublish => "Committing Update",
            PipelineStage::AwaitApproval => "Merge",
            PipelineStage::TagAndPush => "Release",
        }
    }
}

impl fmt::Display for PipelineStage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Outcome of a completed run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReleaseReport {
    /// Canonical tag pushed for every released component
    pub tag: String,
    /// Released components, in release order
    pub components: Vec<String>,
}

pub struct ReleasePipeline<A> {
    settings: Settings,
    tools: Arc<dyn ExternalTools>,
    approval: A,
}

impl<A: ApprovalProvider> ReleasePipeline<A> {
    pub fn new(settings: Settings, tools: Arc<dyn ExternalTools>, approval: A) -> Self {
        ReleasePipeline {
            settings,
            tools,
            approval,
        }
    }

    pub fn approval(&self) -> &A {
        &self.approval
    }

    /// Validates every component, then releases them one after another.
    pub fn run(&self, components: &[Component], version: &VersionSpec) -> Result<ReleaseReport> {
        info!(version = %version, count = components.len(), "starting release");

        for component in components {
            self.validate(component)?;
        }

        let mut report = ReleaseReport {
            tag: version.canonical(),
            components: Vec::with_capacity(components.len()),
        };

        for component in components {
            self.release(component, version)?;
            report.components.push(component.name.clone());
        }

        info!(tag = %report.tag, "release complete");
        Ok(report)
    }

    /// Fails unless the component checkout is on the main branch.
    pub fn validate(&self, component: &Component) -> Result<()> {
        ui::display_component(PipelineStage::Validate.heading(), &component.name);

        let stage = PipelineStage::Validate;
        let _guard = self.enter(component, stage)?;

        self.run_stage(component, stage, || {
            let branch = self.tools.current_branch()?;
            if branch != self.settings.main_branch {
                return Err(ReleaseError::validation(format!(
                    "component {} is checked out to '{}', expected '{}'",
                    component.name, branch, self.settings.main_branch
                )));
            }
            Ok(())
        })
    }

    /// Runs every post-validation stage for one component.
    pub fn release(&self, component: &Component, version: &VersionSpec) -> Result<()> {
        ui::display_component("Releasing", &component.name);

        let _guard = self.enter(component, PipelineStage::PatchChart)?;
        let tag = version.canonical();

        self.run_stage(component, PipelineStage::PatchChart, || {
            self.patch_chart(version)
        })?;

        if !component.dependencies.is_empty() {
            self.run_stage(component, PipelineStage::UpdateDependencies, || {
                self.update_dependencies(component, &tag)
            })?;
        }

        if !version.is_prerelease() {
            self.run_stage(component, PipelineStage::PatchOpenApi, || {
                self.patch_openapi(version)
            })?;

            if let Some(hook) = &component.precommit_hook {
                self.run_stage(component, PipelineStage::PrecommitHook, || {
                    hook.run().map_err(|e| e.in_hook(hook.name()))
                })?;
            }
        }

        let title = format!("Version {}", tag);

        self.run_stage(component, PipelineStage::CommitAndPublish, || {
            self.commit_and_publish(&title)
        })?;

        self.run_stage(component, PipelineStage::AwaitApproval, || {
            self.approval.await_approval(&ApprovalRequest {
                component: component.name.clone(),
                branch: self.settings.work_branch.clone(),
                title: title.clone(),
            })
        })?;

        self.run_stage(component, PipelineStage::TagAndPush, || {
            self.tag_and_push(&tag)
        })?;

        ui::display_success(&format!("Released {} {}", component.name, tag));
        Ok(())
    }

    fn checkout_dir(&self, component: &Component) -> PathBuf {
        self.settings.workspace.join(&component.name)
    }

    fn enter(&self, component: &Component, stage: PipelineStage) -> Result<WorkdirGuard> {
        WorkdirGuard::enter(self.checkout_dir(component))
            .map_err(|e| e.in_stage(&component.name, stage))
    }

    fn run_stage<F>(&self, component: &Component, stage: PipelineStage, body: F) -> Result<()>
    where
        F: FnOnce() -> Result<()>,
    {
        if stage != PipelineStage::Validate {
            ui::display_stage(stage.heading());
        }
        info!(component = %component.name, stage = %stage, "stage started");

        body().map_err(|e| e.in_stage(&component.name, stage))
    }

    fn patch_chart(&self, version: &VersionSpec) -> Result<()> {
        let chart = patch::discover_one(&self.settings.chart_glob)?;
        debug!(path = %chart.display(), "patching chart");
        patch::patch_chart_file(&chart, version)
    }

    fn update_dependencies(&self, component: &Component, tag: &str) -> Result<()> {
        for dependency in &component.dependencies {
            let module = format!("{}/{}", self.settings.module_prefix, dependency);
            self.tools.pin_dependency(&module, tag)?;
        }
        self.tools.tidy_dependencies()
    }

    fn patch_openapi(&self, version: &VersionSpec) -> Result<()> {
        match patch::discover_optional(&self.settings.openapi_glob)? {
            Some(document) => {
                debug!(path = %document.display(), "patching openapi document");
                patch::patch_openapi_file(&document, version)?;
                self.tools.build_validate()
            }
            None => {
                debug!(pattern = %self.settings.openapi_glob, "no openapi document");
                Ok(())
            }
        }
    }

    fn commit_and_publish(&self, title: &str) -> Result<()> {
        let branch = &self.settings.work_branch;
        self.tools.create_branch(branch)?;
        self.tools.stage_all()?;
        self.tools.commit(title)?;
        self.tools.force_push(&self.settings.remote, branch)?;
        self.tools.open_review_request(branch, title, "")
    }

    fn tag_and_push(&self, tag: &str) -> Result<()> {
        self.tools.checkout(&self.settings.main_branch)?;
        self.tools.pull()?;
        self.tools.create_tag(tag)?;
        self.tools.push_tag(&self.settings.remote, tag)?;
        self.tools.delete_branch(&self.settings.work_branch)
    }
}
