//! End-to-end frame loop tests with a muted audio sink

use alerting::{AlertDispatcher, ClipLibrary, MutedSink};
use dms::{
    AlertRequest, ChannelRule, ChannelSeverity, EngineConfig, FatigueEngine, OverallSeverity,
    StatusRecord,
};
use monitor::{FrameInput, Monitor};
use std::sync::Arc;

fn new_monitor(config: EngineConfig) -> Monitor {
    let engine = FatigueEngine::new(config).unwrap();
    let alerts = AlertDispatcher::new(ClipLibrary::new(), Arc::new(MutedSink)).unwrap();
    Monitor::new(engine, alerts)
}

fn frame(ear: f32, mar: f32, pitch: f32, t_ms: u64) -> String {
    format!(r#"{{"ear":{ear},"mar":{mar},"pitch":{pitch},"t_ms":{t_ms}}}"#)
}

async fn replay(monitor: &mut Monitor, lines: &[String]) -> Vec<StatusRecord> {
    let input = lines.join("\n");
    let mut output = Vec::new();
    monitor
        .run(input.as_bytes(), &mut output, std::future::pending())
        .await
        .unwrap();

    String::from_utf8(output)
        .unwrap()
        .lines()
        .map(|line| serde_json::from_str(line).unwrap())
        .collect()
}

#[tokio::test]
async fn eye_closure_warns_after_blink_window() {
    let mut monitor = new_monitor(EngineConfig::default());
    let lines: Vec<_> = (0..25).map(|i| frame(0.1, 0.2, 0.0, i * 33)).collect();

    let statuses = replay(&mut monitor, &lines).await;

    assert_eq!(statuses.len(), 25);
    for (i, status) in statuses.iter().enumerate() {
        let expected = if i < 20 {
            ChannelSeverity::None
        } else {
            ChannelSeverity::Warning
        };
        assert_eq!(status.eye, expected, "frame {}", i + 1);
    }
    assert_eq!(statuses[20].action, AlertRequest::DriverShort);
    assert_eq!(monitor.summary().alerts, 1);
}

#[tokio::test]
async fn yawn_warns_at_warn_frames() {
    let mut monitor = new_monitor(EngineConfig::default());
    let lines: Vec<_> = (0..60).map(|i| frame(0.3, 0.8, 0.0, i * 33)).collect();

    let statuses = replay(&mut monitor, &lines).await;

    assert_eq!(statuses[48].yawn, ChannelSeverity::None);
    assert_eq!(statuses[49].yawn, ChannelSeverity::Warning);
    assert_eq!(statuses[59].yawn, ChannelSeverity::Warning);
    assert_eq!(statuses[59].overall, OverallSeverity::Warning);
}

#[tokio::test]
async fn second_warning_within_cooldown_is_silent() {
    // Single closed frame is already a warning
    let config = EngineConfig {
        eye: ChannelRule::noise_filtered(0, 0, 110),
        ..Default::default()
    };
    let mut monitor = new_monitor(config);
    let lines = vec![
        frame(0.1, 0.2, 0.0, 0),
        frame(0.3, 0.2, 0.0, 500),
        frame(0.1, 0.2, 0.0, 1_000),
        frame(0.3, 0.2, 0.0, 1_500),
        frame(0.1, 0.2, 0.0, 2_500),
    ];

    let actions: Vec<_> = replay(&mut monitor, &lines)
        .await
        .into_iter()
        .map(|s| s.action)
        .collect();

    assert_eq!(
        actions,
        vec![
            AlertRequest::DriverShort,
            AlertRequest::None,
            AlertRequest::None,
            AlertRequest::None,
            AlertRequest::DriverShort,
        ]
    );
}

#[tokio::test]
async fn direct_critical_fires_long_alarm() {
    let config = EngineConfig {
        nod: ChannelRule::simple(1, 1),
        ..Default::default()
    };
    let mut monitor = new_monitor(config);
    let lines = vec![frame(0.3, 0.2, 0.0, 0), frame(0.3, 0.2, -30.0, 33)];

    let statuses = replay(&mut monitor, &lines).await;

    assert_eq!(statuses[0].overall, OverallSeverity::Normal);
    assert_eq!(statuses[1].overall, OverallSeverity::Critical);
    assert_eq!(statuses[1].action, AlertRequest::DriverPassengerLong);
}

#[tokio::test]
async fn missing_face_and_bad_lines_do_not_advance_state() {
    let mut monitor = new_monitor(EngineConfig::default());
    let mut lines: Vec<_> = (0..21).map(|i| frame(0.1, 0.2, 0.0, i * 33)).collect();
    lines.insert(10, "{}".to_string());
    lines.insert(11, "garbage".to_string());
    lines.insert(12, String::new());

    let statuses = replay(&mut monitor, &lines).await;

    // 21 metric frames + 1 no-face frame; garbage and blank lines are dropped
    assert_eq!(statuses.len(), 22);
    assert_eq!(statuses[10], StatusRecord::idle());
    assert_eq!(statuses[21].eye, ChannelSeverity::Warning);

    let summary = monitor.summary();
    assert_eq!(summary.frames, 22);
    assert_eq!(summary.no_face_frames, 1);
    assert_eq!(summary.skipped_lines, 1);
}

#[tokio::test]
async fn degenerate_ratios_never_alert() {
    let mut monitor = new_monitor(EngineConfig::default());
    let lines: Vec<_> = (0..300)
        .map(|i| format!(r#"{{"ear":null,"mar":null,"pitch":2.0,"t_ms":{}}}"#, i * 33))
        .collect();

    let statuses = replay(&mut monitor, &lines).await;

    assert!(statuses.iter().all(|s| s.overall == OverallSeverity::Normal));
    assert_eq!(monitor.summary().alerts, 0);
}

#[test]
fn handle_is_synchronous() {
    let mut monitor = new_monitor(EngineConfig::default());
    let status = monitor.handle(&FrameInput {
        ear: Some(0.3),
        mar: Some(0.1),
        pitch: Some(0.0),
        t_ms: Some(0),
    });
    assert_eq!(status, StatusRecord::idle());
    monitor.shutdown();
    assert!(!monitor.alerts().is_playing());
}
