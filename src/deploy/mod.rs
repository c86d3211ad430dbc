//! Deployment descriptor compiler: Project → descriptor tree for the
//! external deployment tool.
//!
//! Public API: `compile(project, config) -> DeployOutput`. One descriptor per
//! Compute Block plus one top-level service descriptor; directory naming
//! reuses the serializer's slug + id-fragment strategy so both trees agree.

pub mod events;
pub mod files;

use std::collections::BTreeMap;

use tracing::warn;

use crate::error::CompilerError;
use crate::layout::naming::BlockDirAllocator;
use crate::model::graph::ProjectGraph;
use crate::model::types::Project;

/// A generated descriptor file with its path and content.
#[derive(Debug, Clone)]
pub struct GeneratedFile {
    pub path: String,
    pub content: String,
}

/// The complete output of the deploy compile pass. The external deployment
/// API consumes this tree; the compiler itself never touches the filesystem.
#[derive(Debug, Clone)]
pub struct DeployOutput {
    pub files: Vec<GeneratedFile>,
}

/// Deployment configuration supplied per deploy.
#[derive(Debug, Clone, Default)]
pub struct DeployConfig {
    /// Merged over the project's environment variables; these win on clash.
    pub environment_variables: BTreeMap<String, String>,
}

/// Compile a project into its deployment descriptor tree.
pub fn compile(project: &Project, config: &DeployConfig) -> Result<DeployOutput, Vec<CompilerError>> {
    let graph = ProjectGraph::build(project)?;
    let event_map = events::collect_events(project, &graph);

    let mut environment = project.config.environment_variables.clone();
    environment.extend(
        config
            .environment_variables
            .iter()
            .map(|(k, v)| (k.clone(), v.clone())),
    );

    let mut allocator = BlockDirAllocator::new();
    let mut output_files = Vec::new();
    let mut function_files = Vec::new();

    for state in &project.workflow_states {
        let Some(block) = state.as_compute_block() else {
            continue;
        };

        let dir = allocator.allocate(block);
        let function_name = dir
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| block.id.clone());

        if block.language.runtime().is_none() {
            warn!(
                block = %block.name,
                language = %block.language,
                "no runtime mapping, emitting placeholder shim"
            );
        }

        let block_events = event_map.get(&block.id).map(Vec::as_slice).unwrap_or(&[]);
        let function_file = format!("functions/{}.yml", function_name);
        output_files.push(GeneratedFile {
            path: function_file.clone(),
            content: files::gen_function_yml(&function_name, block, block_events, &environment),
        });
        function_files.push(function_file);

        output_files.push(GeneratedFile {
            path: format!("handlers/{}_shim.{}", function_name, block.language.extension()),
            content: files::gen_runtime_shim(block),
        });
    }

    output_files.push(GeneratedFile {
        path: "serverless.yml".into(),
        content: files::gen_service_yml(project, &function_files),
    });
    output_files.push(GeneratedFile {
        path: "handle_output.py".into(),
        content: files::gen_output_script(),
    });

    Ok(DeployOutput {
        files: output_files,
    })
}
