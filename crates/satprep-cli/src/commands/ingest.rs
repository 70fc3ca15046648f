//! Ingest command

use crate::app::{IngestArgs, OutputFormat};
use crate::output;
use crate::progress::ProgressReporter;
use anyhow::Result;
use satprep_core::{
    open_index, Config, HttpEmbedder, IngestProgress, IngestionPipeline, PdfLoader,
};
use std::sync::Arc;

pub async fn run(args: IngestArgs, mut config: Config, format: OutputFormat) -> Result<()> {
    if let Some(root) = args.root {
        config.root_directory = Some(root);
    }
    let root = config.validate_for_ingest()?.to_path_buf();

    // Walk first: an empty tree must fail before any index or provider is touched
    let paths = IngestionPipeline::discover(&root)?;

    let index = open_index(&config).await?;
    let embedder = Arc::new(HttpEmbedder::from_config(config.llm_service.clone())?);
    let pipeline = IngestionPipeline::new(
        Arc::new(PdfLoader::new()),
        embedder,
        index.clone(),
        config.chunking,
    );

    let show_progress = format == OutputFormat::Cli;
    let reporter = Arc::new(ProgressReporter::new());
    if show_progress {
        reporter.set_message(&format!(
            "Found {} PDFs under {}",
            paths.len(),
            root.display()
        ));
    }

    let sink = reporter.clone();
    let report = pipeline
        .ingest_paths(
            &paths,
            Some(Box::new(move |p: IngestProgress| {
                if show_progress {
                    sink.update(&p);
                }
            })),
        )
        .await;

    if show_progress {
        reporter.finish();
    }

    print!("{}", output::format_ingest_report(&report, index.name(), format));
    Ok(())
}
