use crate::core::{Pipeline, SkipCounts};
use crate::utils::error::Result;
use serde::Serialize;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RunReport {
    pub output_path: String,
    pub requested: usize,
    pub generated: usize,
    pub skipped: SkipCounts,
}

pub struct LabelEngine<P: Pipeline> {
    pipeline: P,
}

impl<P: Pipeline> LabelEngine<P> {
    pub fn new(pipeline: P) -> Self {
        Self { pipeline }
    }

    pub fn pipeline(&self) -> &P {
        &self.pipeline
    }

    pub fn run(&self) -> Result<RunReport> {
        tracing::info!("Starting label generation");

        let pairs = self.pipeline.extract()?;
        let requested = pairs.len();
        tracing::info!("Extracted {} label requests", requested);

        let outcome = self.pipeline.transform(pairs)?;
        let generated = outcome.records.len();
        let skipped = outcome.skipped;
        if generated == 0 {
            tracing::warn!("No valid labels to generate; the output will hold the bare template");
        }

        let output_path = self.pipeline.load(outcome)?;
        tracing::info!("Generated {} labels into {}", generated, output_path);

        Ok(RunReport {
            output_path,
            requested,
            generated,
            skipped,
        })
    }
}
