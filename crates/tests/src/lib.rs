//! # Integration Tests
//!
//! End-to-end tests over the full pipeline, without any external
//! transport or engine: mock sources feed the fusion engine, a mock or
//! faulting classifier drives the inference task, and reports fan out to
//! publisher sinks.

#[cfg(test)]
mod contract_tests {
    use contracts::{ContactResult, CONTACT_CLASSES};

    #[test]
    fn test_class_index_round_trip() {
        for k in 0..CONTACT_CLASSES as u8 {
            let contacts = ContactResult::from_class_index(k);
            let recomposed = contacts.legs[0] as u8 * 8
                + contacts.legs[1] as u8 * 4
                + contacts.legs[2] as u8 * 2
                + contacts.legs[3] as u8;
            assert_eq!(recomposed, k);
            assert_eq!(contacts.to_class_index(), k);
        }
    }
}

#[cfg(test)]
mod e2e_tests {
    use std::time::Duration;

    use contracts::{
        Channel, ContactClassifier, ContractError, EngineConfig, NormalizedFrame, SamplePacket,
        FEATURE_WIDTH, WINDOW_HEIGHT,
    };
    use fusion_engine::FusionEngine;
    use inference::{InferenceError, InferenceTask, MockClassifier};
    use ingestion::{IngestionPipeline, MockSampleSource};
    use publisher::{create_publisher, LogSink, Publisher, SinkHandle};
    use tokio::sync::{mpsc, watch};

    /// End-to-end: MockSampleSource -> FusionEngine -> InferenceTask ->
    /// Publisher
    ///
    /// Verifies the complete flow:
    /// 1. Mock sources generate both channels
    /// 2. The fusion engine pairs, windows, and normalizes
    /// 3. The inference task classifies in order
    /// 4. The publisher fans reports out to sinks
    #[tokio::test]
    async fn test_e2e_mock_pipeline() {
        let leg_source = MockSampleSource::leg(2000.0);
        let imu_source = MockSampleSource::imu(2000.0);

        let mut ingestion = IngestionPipeline::new(512);
        ingestion
            .register_source(Box::new(leg_source), None)
            .unwrap();
        ingestion
            .register_source(Box::new(imu_source), None)
            .unwrap();

        let (fusion_tx, fusion_rx) = mpsc::channel(8);
        let (report_tx, mut report_rx) = mpsc::channel(64);
        let (_stop_tx, stop_rx) = watch::channel(false);

        let inference_handle = InferenceTask::new(
            fusion_rx,
            report_tx,
            Box::new(MockClassifier::new(0b0101).unwrap()),
            None,
            stop_rx,
        )
        .spawn();

        ingestion.start_all();
        let ingestion_rx = ingestion.take_receiver().unwrap();

        let target_frames = 5u64;
        let fusion_handle = tokio::spawn(async move {
            let mut engine = FusionEngine::new(&EngineConfig::default());
            while let Ok(packet) = ingestion_rx.recv().await {
                if let Some(output) = engine.push(packet) {
                    if fusion_tx.send(output).await.is_err() {
                        break;
                    }
                    if engine.frame_count() >= target_frames {
                        break;
                    }
                }
            }
            engine.frame_count()
        });

        // Collect the reports in order
        let collect = async {
            let mut reports = Vec::new();
            while reports.len() < target_frames as usize {
                match report_rx.recv().await {
                    Some(report) => reports.push(report),
                    None => break,
                }
            }
            reports
        };
        let reports = tokio::time::timeout(Duration::from_secs(10), collect)
            .await
            .expect("pipeline timed out");

        ingestion.stop_all();

        let frames = tokio::time::timeout(Duration::from_secs(2), fusion_handle)
            .await
            .expect("fusion task timed out")
            .unwrap();
        assert!(frames >= target_frames);

        let stats = tokio::time::timeout(Duration::from_secs(2), inference_handle)
            .await
            .expect("inference task timed out")
            .unwrap()
            .unwrap();
        assert!(stats.frames_classified >= target_frames);

        assert_eq!(reports.len(), target_frames as usize);
        for (i, report) in reports.iter().enumerate() {
            assert_eq!(report.seq, i as u64 + 1, "reports must stay in order");
            assert_eq!(report.class_index, 0b0101);
            assert_eq!(report.contacts.legs, [false, true, false, true]);
        }

        // Mock signals vary every column, so the whole window is finite
        assert!(reports[0].row.as_slice().iter().all(|v| v.is_finite()));
    }

    /// The fusion engine produces nothing until both channels have data,
    /// then exactly one row per matched pair (scenario: leg-only backlog).
    #[tokio::test]
    async fn test_e2e_starved_channel_produces_nothing() {
        let mut ingestion = IngestionPipeline::new(512);
        ingestion
            .register_source(Box::new(MockSampleSource::leg(2000.0)), None)
            .unwrap();

        ingestion.start_all();
        let ingestion_rx = ingestion.take_receiver().unwrap();

        let mut engine = FusionEngine::new(&EngineConfig::default());
        let deadline = tokio::time::Instant::now() + Duration::from_millis(100);
        let mut outputs = 0u64;
        loop {
            let packet: SamplePacket = tokio::select! {
                maybe = ingestion_rx.recv() => match maybe {
                    Ok(packet) => packet,
                    Err(_) => break,
                },
                _ = tokio::time::sleep_until(deadline) => break,
            };
            assert_eq!(packet.channel, Channel::Leg);
            if engine.push(packet).is_some() {
                outputs += 1;
            }
        }

        ingestion.stop_all();
        assert_eq!(outputs, 0);
        assert_eq!(engine.pairs_built(), 0);
        assert!(engine.meta().leg_depth > 0);
    }

    /// A classifier fault mid-stream terminates the inference task with a
    /// diagnostic error instead of retrying.
    #[tokio::test]
    async fn test_e2e_classifier_fault_terminates_pipeline() {
        struct DyingEngine {
            frames_left: u32,
        }

        impl ContactClassifier for DyingEngine {
            fn name(&self) -> &str {
                "dying"
            }

            fn infer(&mut self, _frame: &NormalizedFrame) -> Result<u8, ContractError> {
                if self.frames_left == 0 {
                    return Err(ContractError::inference("engine session lost"));
                }
                self.frames_left -= 1;
                Ok(0b1111)
            }
        }

        let mut ingestion = IngestionPipeline::new(512);
        ingestion
            .register_source(Box::new(MockSampleSource::leg(2000.0)), None)
            .unwrap();
        ingestion
            .register_source(Box::new(MockSampleSource::imu(2000.0)), None)
            .unwrap();

        let (fusion_tx, fusion_rx) = mpsc::channel(8);
        let (report_tx, mut report_rx) = mpsc::channel(64);
        let (_stop_tx, stop_rx) = watch::channel(false);

        let inference_handle = InferenceTask::new(
            fusion_rx,
            report_tx,
            Box::new(DyingEngine { frames_left: 2 }),
            None,
            stop_rx,
        )
        .spawn();

        ingestion.start_all();
        let ingestion_rx = ingestion.take_receiver().unwrap();

        let fusion_handle = tokio::spawn(async move {
            let mut engine = FusionEngine::new(&EngineConfig::default());
            while let Ok(packet) = ingestion_rx.recv().await {
                if let Some(output) = engine.push(packet) {
                    if fusion_tx.send(output).await.is_err() {
                        break;
                    }
                }
            }
        });

        // Drain whatever made it through before the fault
        let drain = async { while report_rx.recv().await.is_some() {} };
        let _ = tokio::time::timeout(Duration::from_secs(10), drain).await;

        let result = tokio::time::timeout(Duration::from_secs(5), inference_handle)
            .await
            .expect("inference task timed out")
            .unwrap();

        match result {
            Err(InferenceError::ClassifierFault { seq, .. }) => assert_eq!(seq, 3),
            other => panic!("expected fatal classifier fault, got {other:?}"),
        }

        ingestion.stop_all();
        fusion_handle.abort();
    }

    /// Publisher fan-out across multiple sinks from config.
    #[tokio::test]
    async fn test_publisher_multiple_sinks() {
        use contracts::{SinkConfig, SinkType};
        use std::collections::HashMap;

        let (tx, rx) = mpsc::channel(10);

        let sink_configs = vec![
            SinkConfig {
                name: "log1".to_string(),
                sink_type: SinkType::Log,
                queue_capacity: 50,
                params: HashMap::new(),
            },
            SinkConfig {
                name: "log2".to_string(),
                sink_type: SinkType::Log,
                queue_capacity: 50,
                params: HashMap::new(),
            },
        ];

        let publisher = create_publisher(sink_configs, rx).await.unwrap();

        let metrics = publisher.metrics();
        assert_eq!(metrics.len(), 2);

        let handle = publisher.spawn();

        for seq in 1..=5u64 {
            let report = contracts::ContactReport {
                seq,
                timestamp: seq as f64 * 0.1,
                class_index: 0,
                contacts: contracts::ContactResult::from_class_index(0),
                row: contracts::FeatureRow::default(),
            };
            tx.send(report).await.unwrap();
        }

        drop(tx);

        let _ = tokio::time::timeout(Duration::from_secs(2), handle).await;
    }

    /// Full window parity: the frames coming out of a live pipeline obey
    /// the window shape and sequence contract.
    #[tokio::test]
    async fn test_frames_have_window_shape() {
        let mut ingestion = IngestionPipeline::new(512);
        ingestion
            .register_source(Box::new(MockSampleSource::leg(2000.0)), None)
            .unwrap();
        ingestion
            .register_source(Box::new(MockSampleSource::imu(2000.0)), None)
            .unwrap();

        ingestion.start_all();
        let ingestion_rx = ingestion.take_receiver().unwrap();

        let mut engine = FusionEngine::new(&EngineConfig::default());
        let mut frames = Vec::new();
        let deadline = tokio::time::Instant::now() + Duration::from_secs(10);

        while frames.len() < 3 {
            let packet = tokio::select! {
                maybe = ingestion_rx.recv() => match maybe {
                    Ok(packet) => packet,
                    Err(_) => break,
                },
                _ = tokio::time::sleep_until(deadline) => break,
            };
            if let Some(output) = engine.push(packet) {
                frames.push(output.frame);
            }
        }

        ingestion.stop_all();

        assert_eq!(frames.len(), 3, "pipeline too slow to fill the window");
        for (i, frame) in frames.iter().enumerate() {
            assert_eq!(frame.seq, i as u64 + 1);
            assert_eq!(frame.as_slice().len(), WINDOW_HEIGHT * FEATURE_WIDTH);
        }
    }

    /// Sink isolation smoke test: a log sink alongside a handle-level
    /// mock shows per-sink metrics without cross-stalling.
    #[tokio::test]
    async fn test_sink_isolation_metrics() {
        let (tx, rx) = mpsc::channel(16);

        let handles = vec![
            SinkHandle::spawn(LogSink::new("fast"), 16),
            SinkHandle::spawn(LogSink::new("other"), 16),
        ];
        let publisher = Publisher::with_handles(handles, rx);
        let handle = publisher.spawn();

        for seq in 1..=10u64 {
            let report = contracts::ContactReport {
                seq,
                timestamp: seq as f64,
                class_index: 1,
                contacts: contracts::ContactResult::from_class_index(1),
                row: contracts::FeatureRow::default(),
            };
            tx.send(report).await.unwrap();
        }
        drop(tx);

        tokio::time::timeout(Duration::from_secs(2), handle)
            .await
            .expect("publisher timed out")
            .unwrap();
    }
}
