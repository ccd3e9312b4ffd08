use crate::application::dto::{TargetOutcome, TransformationRequest, TransformationResponse};
use crate::application::factories::BackendRegistry;
use crate::deployment_model::domain::DeploymentModel;
use crate::deployment_model::services::ModelBuilder;
use crate::ports::inbound::TransformationPort;
use crate::ports::outbound::{FileAccessFactory, ModelReader, ProgressReporter, ToolLocator};
use crate::shared::Result;
use crate::transformation::{LifecycleDriver, TransformationContext};
use chrono::Utc;
use std::sync::Arc;

/// TransformModelUseCase - Core use case for model transformation
///
/// Reads the model once, then drives one lifecycle per requested target.
/// Every run gets its own context and file access; only the model is
/// shared between runs.
///
/// # Type Parameters
/// * `MR` - ModelReader implementation
/// * `FAF` - FileAccessFactory implementation
/// * `TL` - ToolLocator implementation, cloned into every run
/// * `PR` - ProgressReporter implementation
pub struct TransformModelUseCase<MR, FAF, TL, PR> {
    model_reader: MR,
    file_access_factory: FAF,
    tool_locator: TL,
    progress_reporter: PR,
    registry: BackendRegistry,
}

impl<MR, FAF, TL, PR> TransformModelUseCase<MR, FAF, TL, PR>
where
    MR: ModelReader,
    FAF: FileAccessFactory,
    TL: ToolLocator + Clone + 'static,
    PR: ProgressReporter,
{
    /// Creates a new TransformModelUseCase with injected dependencies
    pub fn new(
        model_reader: MR,
        file_access_factory: FAF,
        tool_locator: TL,
        progress_reporter: PR,
        registry: BackendRegistry,
    ) -> Self {
        Self {
            model_reader,
            file_access_factory,
            tool_locator,
            progress_reporter,
            registry,
        }
    }

    /// Executes the transformation use case
    ///
    /// # Arguments
    /// * `request` - Model path, output location and targets
    ///
    /// # Returns
    /// One outcome per requested target, in request order
    pub fn execute(&self, request: TransformationRequest) -> Result<TransformationResponse> {
        self.registry.validate(&request.targets)?;
        let model = Arc::new(self.load_model(&request)?);

        let total = request.targets.len();
        let mut outcomes = Vec::with_capacity(total);
        for (index, target) in request.targets.iter().enumerate() {
            self.progress_reporter.report_target(index + 1, total, target);
            outcomes.push(self.run_target(target, Arc::clone(&model), &request));
        }

        let failed = outcomes.iter().filter(|o| !o.is_success()).count();
        if failed == 0 {
            self.progress_reporter
                .report_completion(&format!("✅ Generated {} target(s)", total));
        } else {
            self.progress_reporter.report_completion(&format!(
                "⚠️  {} of {} target(s) failed",
                failed, total
            ));
        }

        Ok(TransformationResponse::new(model.name().to_string(), outcomes))
    }

    /// Reads and builds the model, named after the file stem
    fn load_model(&self, request: &TransformationRequest) -> Result<DeploymentModel> {
        self.progress_reporter.report(&format!(
            "📖 Loading deployment model from: {}",
            request.model_path.display()
        ));
        let graph = self.model_reader.read_model(&request.model_path)?;
        let name = request
            .model_path
            .file_stem()
            .map(|stem| stem.to_string_lossy().into_owned())
            .unwrap_or_else(|| "model".to_string());
        let model = ModelBuilder::build(&name, graph)?;

        self.progress_reporter.report(&format!(
            "✅ Detected {} component(s) and {} relation(s)",
            model.topology().component_count(),
            model.topology().edge_count()
        ));
        Ok(model)
    }

    fn run_target(
        &self,
        target: &str,
        model: Arc<DeploymentModel>,
        request: &TransformationRequest,
    ) -> TargetOutcome {
        let context = TransformationContext::new(
            target,
            model,
            self.file_access_factory.create(target),
            Box::new(self.tool_locator.clone()),
            request.settings_for(target),
        );
        tracing::info!(target_name = target, run_id = %context.run_id(), "starting target run");

        let started_at = context.started_at();

        let mut driver = match self.registry.create(context) {
            Ok(lifecycle) => LifecycleDriver::new(lifecycle),
            Err(error) => {
                return self
                    .failure(target, Vec::new(), error)
                    .with_timing(started_at, Utc::now())
            }
        };
        let result = driver.run();
        let written = driver.lifecycle().context().file_access().written_files();

        let outcome = match result {
            Ok(()) => {
                tracing::info!(target_name = target, files = written.len(), "target run finished");
                TargetOutcome::succeeded(target, written)
            }
            Err(error) => self.failure(target, written, error),
        };
        outcome.with_timing(started_at, Utc::now())
    }

    fn failure(
        &self,
        target: &str,
        written: Vec<std::path::PathBuf>,
        error: anyhow::Error,
    ) -> TargetOutcome {
        let message = format!("{:#}", error);
        tracing::warn!(target_name = target, error = %message, "target run failed");
        self.progress_reporter
            .report_error(&format!("❌ {}: {}", target, message));
        TargetOutcome::failed(target, written, message)
    }
}

impl<MR, FAF, TL, PR> TransformationPort for TransformModelUseCase<MR, FAF, TL, PR>
where
    MR: ModelReader,
    FAF: FileAccessFactory,
    TL: ToolLocator + Clone + 'static,
    PR: ProgressReporter,
{
    fn transform(&self, request: TransformationRequest) -> Result<TransformationResponse> {
        self.execute(request)
    }

    fn available_targets(&self) -> Vec<String> {
        self.registry.names().into_iter().map(String::from).collect()
    }
}
