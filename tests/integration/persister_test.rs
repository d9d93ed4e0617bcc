use hostmon::core::{Alert, AlertPersister};
use tempfile::TempDir;

fn triggered(metric: &str, value: f64) -> Alert {
    let mut alert = Alert::new(metric, 50.0);
    alert.value = Some(value);
    alert.host = Some("test-host".to_string());
    alert.set_timestamp();
    alert
}

#[test]
fn test_concurrent_appends_produce_complete_lines() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("alerts.json");

    let runtime = tokio::runtime::Builder::new_multi_thread()
        .worker_threads(4)
        .enable_time()
        .build()
        .unwrap();

    let (persister, worker) = AlertPersister::spawn(runtime.handle(), path.clone(), 64);

    runtime.block_on(async {
        let mut handles = Vec::new();
        for i in 0..32 {
            let persister = persister.clone();
            handles.push(tokio::spawn(async move {
                persister.append(vec![triggered("cpu_usage", 50.0 + i as f64)]);
            }));
        }
        for handle in handles {
            handle.await.unwrap();
        }
    });

    // dropping the last handle flushes the queue and stops the worker
    drop(persister);
    runtime.block_on(worker).unwrap();

    let contents = std::fs::read_to_string(&path).unwrap();
    let lines: Vec<&str> = contents.lines().collect();
    assert_eq!(lines.len(), 32);

    for line in lines {
        let batch: Vec<Alert> = serde_json::from_str(line).expect("every line is a complete JSON array");
        assert_eq!(batch.len(), 1);
        assert_eq!(batch[0].metric, "cpu_usage");
        assert!(batch[0].value.is_some());
    }
}

#[test]
fn test_multi_alert_batch_is_one_line() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("alerts.json");

    let runtime = tokio::runtime::Builder::new_multi_thread()
        .worker_threads(2)
        .enable_time()
        .build()
        .unwrap();

    let (persister, worker) = AlertPersister::spawn(runtime.handle(), path.clone(), 8);
    persister.append(vec![triggered("cpu_usage", 91.0), triggered("memory_usage", 88.0)]);

    drop(persister);
    runtime.block_on(worker).unwrap();

    let contents = std::fs::read_to_string(&path).unwrap();
    let lines: Vec<&str> = contents.lines().collect();
    assert_eq!(lines.len(), 1);

    let batch: Vec<Alert> = serde_json::from_str(lines[0]).unwrap();
    assert_eq!(batch.len(), 2);
}
