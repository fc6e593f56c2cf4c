use cardioscreen::{
    predict_batch, report, table, ModelInfo, ModelManager, ModelSource, OnnxClassifier,
    OptimizationLevel, PipelineError, RuntimeConfig, Schema,
};
use anyhow::{bail, Context};
use clap::Parser;
use log::{error, info};
use std::fs::File;
use std::path::PathBuf;
use std::process::ExitCode;
use std::time::Instant;

#[derive(Parser)]
#[command(author, version, about = "Classify patient records for heart disease", long_about = None)]
struct Args {
    /// CSV or spreadsheet (xlsx, xlsm, xls, ods) with one patient per row
    #[arg(short, long)]
    input: PathBuf,

    /// Local ONNX model file
    #[arg(short, long, conflicts_with = "model_url")]
    model: Option<PathBuf>,

    /// URL of an ONNX model to download into the cache
    #[arg(long, requires = "model_sha256")]
    model_url: Option<String>,

    /// Expected SHA-256 of the downloaded model
    #[arg(long)]
    model_sha256: Option<String>,

    /// Cache name for the downloaded model
    #[arg(long, default_value = "heart-disease")]
    model_name: String,

    /// Force a fresh download of the model file
    #[arg(short, long)]
    fresh: bool,

    /// Print every row with its prediction before the report
    #[arg(long)]
    preview: bool,

    /// Write the labelled table to this CSV file
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Intra-op threads for ONNX Runtime (0 lets the runtime decide)
    #[arg(long, default_value_t = 0)]
    threads: usize,

    #[arg(long, value_enum, default_value_t = OptimizationLevel::All)]
    optimization: OptimizationLevel,
}

impl Args {
    fn model_source(&self) -> anyhow::Result<ModelSource> {
        match (&self.model, &self.model_url, &self.model_sha256) {
            (Some(path), _, _) => Ok(ModelSource::Local(path.clone())),
            (None, Some(url), Some(sha256)) => Ok(ModelSource::Remote(ModelInfo::new(
                self.model_name.clone(),
                url.clone(),
                sha256.clone(),
            ))),
            _ => bail!("Provide either --model <path> or --model-url <url> with --model-sha256 <hex>"),
        }
    }
}

async fn load_model(args: &Args) -> anyhow::Result<OnnxClassifier> {
    let source = args.model_source()?;
    let manager = ModelManager::new_default().context("Failed to create model cache")?;

    if let (true, ModelSource::Remote(info)) = (args.fresh, &source) {
        info!("Fresh download requested - removing any cached model file...");
        manager.remove_download(&info.name)?;
    }

    let model_path = manager.resolve(&source).await?;
    info!("Loading model from {}", model_path.display());

    let config = RuntimeConfig {
        optimization_level: args.optimization,
        ..RuntimeConfig::with_threads(args.threads)
    };
    let classifier = OnnxClassifier::builder()
        .with_runtime_config(config)
        .with_model_file(&model_path)?
        .build()?;
    Ok(classifier)
}

async fn run(args: Args) -> anyhow::Result<()> {
    let start_time = Instant::now();
    let classifier = load_model(&args).await?;
    info!("Model ready (took {:.2?})", start_time.elapsed());

    let batch = table::read_table(&args.input)
        .with_context(|| format!("Failed to read {}", args.input.display()))?;

    let classify_start = Instant::now();
    let result = match predict_batch(batch, &Schema::heart_disease(), &classifier) {
        Ok(result) => result,
        Err(PipelineError::MissingFields(e)) => {
            eprintln!("\n{}", e);
            eprintln!("Ensure your file includes the following columns:");
            eprintln!("  {}", Schema::heart_disease().fields().join(", "));
            return Err(e.into());
        }
        Err(e) => return Err(e.into()),
    };
    info!("Classified {} rows in {:.2?}", result.len(), classify_start.elapsed());

    if args.preview {
        println!("{}", report::render_preview(&result));
    }
    println!("{}", report::render(&result));

    if let Some(path) = &args.output {
        let file = File::create(path)
            .with_context(|| format!("Failed to create {}", path.display()))?;
        table::write_csv(&result, file)?;
        info!("Wrote predictions to {}", path.display());
    }

    Ok(())
}

#[tokio::main]
async fn main() -> ExitCode {
    env_logger::init();
    let args = Args::parse();

    match run(args).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            error!("{:#}", e);
            eprintln!("Error: {:#}", e);
            ExitCode::FAILURE
        }
    }
}
