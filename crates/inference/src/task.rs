//! Inference task - second pipeline stage.

use contracts::{
    ContactClassifier, ContactReport, ContactResult, FusionOutput, ContractError, CONTACT_CLASSES,
};
use tokio::sync::{mpsc, watch};
use tokio::task::JoinHandle;
use tracing::{debug, error, info, instrument, warn};

use crate::dump::FrameDump;
use crate::error::InferenceError;

/// Statistics from an inference task run
#[derive(Debug, Clone, Copy, Default)]
pub struct InferenceStats {
    /// Frames classified
    pub frames_classified: u64,

    /// Reports forwarded to the publisher
    pub reports_forwarded: u64,
}

/// Inference + decomposition stage
///
/// Consumes `FusionOutput` strictly in production order and forwards one
/// `ContactReport` per frame. Terminates on: fusion channel closed, stop
/// signal, publisher channel closed, or a classifier fault (fatal, with
/// diagnostic).
pub struct InferenceTask {
    rx: mpsc::Receiver<FusionOutput>,
    report_tx: mpsc::Sender<ContactReport>,
    classifier: Box<dyn ContactClassifier>,
    dump: Option<FrameDump>,
    stop: watch::Receiver<bool>,
}

impl InferenceTask {
    /// Create an inference task
    pub fn new(
        rx: mpsc::Receiver<FusionOutput>,
        report_tx: mpsc::Sender<ContactReport>,
        classifier: Box<dyn ContactClassifier>,
        dump: Option<FrameDump>,
        stop: watch::Receiver<bool>,
    ) -> Self {
        Self {
            rx,
            report_tx,
            classifier,
            dump,
            stop,
        }
    }

    /// Run until the input closes, the stop signal fires, or the engine
    /// faults
    #[instrument(name = "inference_task_run", skip(self), fields(classifier = %self.classifier.name()))]
    pub async fn run(mut self) -> Result<InferenceStats, InferenceError> {
        info!(classifier = %self.classifier.name(), "inference task started");

        let mut stats = InferenceStats::default();

        loop {
            let output = tokio::select! {
                changed = self.stop.changed() => {
                    if changed.is_err() || *self.stop.borrow() {
                        info!("stop signal observed, inference task exiting");
                        break;
                    }
                    continue;
                }
                maybe = self.rx.recv() => match maybe {
                    Some(output) => output,
                    None => {
                        info!("fusion channel closed, inference task exiting");
                        break;
                    }
                },
            };

            let report = self.classify(output, &mut stats)?;

            if self.report_tx.send(report).await.is_err() {
                warn!("publisher channel closed, inference task exiting");
                break;
            }
            stats.reports_forwarded += 1;
        }

        info!(
            frames = stats.frames_classified,
            reports = stats.reports_forwarded,
            "inference task finished"
        );
        Ok(stats)
    }

    /// Spawn the task on the runtime
    pub fn spawn(self) -> JoinHandle<Result<InferenceStats, InferenceError>> {
        tokio::spawn(self.run())
    }

    fn classify(
        &mut self,
        output: FusionOutput,
        stats: &mut InferenceStats,
    ) -> Result<ContactReport, InferenceError> {
        if let Some(dump) = self.dump.as_mut() {
            dump.record(&output.frame);
        }

        let seq = output.frame.seq;
        let class_index = self.classifier.infer(&output.frame).map_err(|e| {
            error!(seq, error = %e, "classifier fault is fatal, terminating pipeline");
            match e {
                ContractError::Inference { message } => InferenceError::ClassifierFault {
                    name: self.classifier.name().to_string(),
                    seq,
                    message,
                },
                other => InferenceError::Contract(other),
            }
        })?;

        if class_index as usize >= CONTACT_CLASSES {
            error!(seq, class_index, "out-of-range class is a contract violation");
            return Err(InferenceError::ClassOutOfRange {
                name: self.classifier.name().to_string(),
                seq,
                class_index,
            });
        }

        stats.frames_classified += 1;
        let contacts = ContactResult::from_class_index(class_index);

        metrics::counter!(
            "inference_frames_total",
            "class" => class_index.to_string()
        )
        .increment(1);

        debug!(seq, class_index, contacts = %contacts, "frame classified");

        Ok(ContactReport {
            seq,
            timestamp: output.timestamp,
            class_index,
            contacts,
            row: output.row,
        })
    }
}
