//! The prompt generation pipeline.
//!
//! ```text
//! Prepare -> ValidateParameters -> ReadStdin -> ResolvePaths
//!         -> BuildVariables -> Render -> WriteOutput
//! ```
//!
//! Each stage runs only when the previous one succeeded. The first failure is
//! returned as a [`PipelineFailure`] naming the stage; nothing is retried or
//! recovered here.
//!
//! [`Orchestrator`] holds no per-run state, so one instance can serve
//! concurrent runs.


use crate::config::Config;
use crate::error::{PipelineError, PipelineFailure, Stage};
use crate::options::PipelineOptions;
use crate::params::{ParamRules, ValidatedParams, validate_params};
use crate::paths::{
    PromptTemplatePath, ResolutionSource, ResolvedPath, TemplateRequest, TemplateRoot,
    TemplateStatus, resolve_input, resolve_output, resolve_schema, resolve_template,
};
use crate::render::{FileTemplateRenderer, OutputSink, TemplateRenderer};
use crate::stdin::{StdinPolicy, StdinSource, process_stdin};
use crate::variables::{ProcessedVariables, VariableSources, build_variables};
use serde_json::{Map, Value};
use std::path::Path;

/// Result of a pipeline stage, tagged on failure.
pub type StageResult<T> = std::result::Result<T, PipelineFailure>;

trait AtStage<T> {
    fn at(self, stage: Stage) -> StageResult<T>;
}

impl<T> AtStage<T> for crate::error::Result<T> {
    fn at(self, stage: Stage) -> StageResult<T> {
        self.map_err(|error| PipelineFailure::new(stage, error))
    }
}

/// The four resolved paths of a request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedPaths {
    pub input: ResolvedPath,
    pub output: ResolvedPath,
    pub template: PromptTemplatePath,
    pub schema: PromptTemplatePath,
}

/// A fully resolved request, ready to render.
#[derive(Debug, Clone)]
pub struct PromptRequest {
    pub params: ValidatedParams,
    pub options: PipelineOptions,
    pub stdin_text: String,
    pub paths: ResolvedPaths,
    pub variables: ProcessedVariables,
}

/// Runs the pipeline with a given renderer.
#[derive(Debug, Clone, Default)]
pub struct Orchestrator<R = FileTemplateRenderer> {
    renderer: R,
}

impl Orchestrator<FileTemplateRenderer> {
    /// An orchestrator using the file renderer configured by `config.render`.
    pub fn from_config(config: &Config) -> Self {
        Self::new(FileTemplateRenderer::from_config(&config.render))
    }
}

impl<R: TemplateRenderer> Orchestrator<R> {
    pub fn new(renderer: R) -> Self {
        Self { renderer }
    }

    pub fn renderer(&self) -> &R {
        &self.renderer
    }

    /// Run every stage and write the rendered prompt to `sink`.
    ///
    /// # Returns
    ///
    /// * `Ok(())` - The prompt was written
    /// * `Err(PipelineFailure)` - The first failing stage and its error
    pub fn run<S, I, O>(
        &self,
        tokens: &[S],
        config: &Config,
        options: &Map<String, Value>,
        stdin: I,
        sink: &mut O,
    ) -> StageResult<()>
    where
        S: AsRef<str>,
        I: StdinSource,
        O: OutputSink + ?Sized,
    {
        let request = self.prepare(tokens, config, options, stdin)?;

        let text = self
            .renderer
            .render(request.paths.template.as_path(), request.variables.all())
            .at(Stage::Render)?;
        tracing::debug!(bytes = text.len(), "rendered prompt");

        sink.write(&text).at(Stage::WriteOutput)?;

        tracing::info!(
            directive = %request.params.directive,
            layer = %request.params.layer,
            template = request.paths.template.path(),
            "prompt generated"
        );
        Ok(())
    }

    /// Run every stage up to and including variable building.
    pub fn prepare<S, I>(
        &self,
        tokens: &[S],
        config: &Config,
        options: &Map<String, Value>,
        stdin: I,
    ) -> StageResult<PromptRequest>
    where
        S: AsRef<str>,
        I: StdinSource,
    {
        let rules = ParamRules::from_config(&config.params).at(Stage::Prepare)?;

        let params = validate_params(tokens, &rules).at(Stage::ValidateParameters)?;
        let options = PipelineOptions::from_map(options).at(Stage::ValidateParameters)?;
        tracing::debug!(directive = %params.directive, layer = %params.layer, "validated parameters");

        let policy = StdinPolicy::new(&options, config);
        let stdin_text = process_stdin(stdin, &policy).at(Stage::ReadStdin)?;

        let working_dir = config.working_dir();
        let paths = resolve_paths(&params, &options, config, &working_dir).at(Stage::ResolvePaths)?;

        let sources = VariableSources {
            stdin_text: &stdin_text,
            input: &paths.input,
            output: &paths.output,
            schema: Some(&paths.schema),
        };
        let variables =
            build_variables(&options.extra, &sources, &config.variables).at(Stage::BuildVariables)?;

        Ok(PromptRequest {
            params,
            options,
            stdin_text,
            paths,
            variables,
        })
    }
}

/// Resolve input, output, template and schema paths.
///
/// # Returns
///
/// * `Err(PipelineError::PathNotFound)` - An input file was named but does not exist
/// * `Err(PipelineError::TemplateNotFound)` - No template candidate exists
pub fn resolve_paths(
    params: &ValidatedParams,
    options: &PipelineOptions,
    config: &Config,
    working_dir: &Path,
) -> crate::error::Result<ResolvedPaths> {
    let input = resolve_input(options, working_dir)?;
    if let Some(path) = input.file_path()
        && !input.exists()
    {
        return Err(PipelineError::PathNotFound {
            path: path.to_string(),
        });
    }
    tracing::debug!(input = input.value(), "resolved input");

    let output = resolve_output(options, params, working_dir)?;
    tracing::debug!(
        output = output.value(),
        generated = output.is_generated(),
        "resolved output"
    );

    let request = TemplateRequest {
        params,
        adaptation: options.adaptation.as_deref(),
        from_layer: options.from_layer.as_deref(),
        source_file: input.file_path(),
        schema_mode: options.schema_mode,
    };

    let prompt_root = TemplateRoot {
        base_dir: config.prompt_base_dir(),
        source: base_dir_source(config.app_prompt.base_dir.as_deref()),
        working_dir,
    };
    let template = resolve_template(&request, &prompt_root)?;
    match template.status() {
        TemplateStatus::Found => {
            tracing::debug!(template = template.path(), "resolved template");
        }
        TemplateStatus::Fallback => {
            tracing::warn!(
                template = template.path(),
                requested = template.attempted().first().map(String::as_str),
                "adaptation template missing, using fallback"
            );
        }
        TemplateStatus::NotFound => {
            return Err(PipelineError::TemplateNotFound {
                path: template.path().to_string(),
                attempted: template.attempted().to_vec(),
            });
        }
    }

    let schema_root = TemplateRoot {
        base_dir: config.schema_base_dir(),
        source: base_dir_source(config.app_schema.base_dir.as_deref()),
        working_dir,
    };
    let schema = resolve_schema(&request, &schema_root)?;
    tracing::debug!(schema = schema.path(), found = schema.exists(), "resolved schema");

    Ok(ResolvedPaths {
        input,
        output,
        template,
        schema,
    })
}

fn base_dir_source(configured: Option<&str>) -> ResolutionSource {
    match configured {
        Some(dir) if !dir.is_empty() => ResolutionSource::Config,
        _ => ResolutionSource::Default,
    }
}
