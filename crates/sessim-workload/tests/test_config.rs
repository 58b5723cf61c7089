use sessim_workload::config::RawWorkloadConfig;
use sessim_workload::generator::CloudletGenerator;
use sessim_workload::series::SeriesTable;

fn name_wrapper(file_name: &str) -> String {
    format!("test-configs/{}", file_name)
}

#[test]
fn test_series_table_from_file() {
    let table = SeriesTable::from_file(&name_wrapper("app_table.yaml"));
    assert_eq!(table.step_count(), 4);
    assert_eq!(table.last_time(), 40.);
    assert_eq!(table.get("CPULength").unwrap()[1], 120.);
    let names: Vec<&str> = table.names().collect();
    assert_eq!(names, vec!["Time", "CPULength", "RAM", "IOLength"]);
}

#[test]
fn test_stat_workload_from_config() {
    let config = RawWorkloadConfig::from_file(&name_wrapper("stat_workload.yaml"));
    let mut generator = config.build();
    let mut calls_with_sessions = 0;
    for tick in 0..3 {
        let batches = generator.generate(tick as f64 * 100., 100.);
        for batch in &batches {
            for session in &batch.sessions {
                assert_eq!(session.user_id, 1);
                assert_eq!(session.cloudlet_count, 4);
                // app last Time 40, db last Time 55, step 5
                assert_eq!(session.deadline, batch.time + 60.);
                assert_eq!(session.db_tier.member_count(), 2);
            }
        }
        if !batches.is_empty() {
            calls_with_sessions += 1;
        }
    }
    // the configured budget is spent
    for tick in 3..10 {
        assert!(generator.generate(tick as f64 * 100., 100.).is_empty());
    }
    // rate 10 per unit of 100 over windows of length 100: an empty draw in
    // all three budgeted calls is next to impossible
    assert!(calls_with_sessions > 0);
}

#[test]
fn test_const_workload_from_config() {
    let config = RawWorkloadConfig::from_file(&name_wrapper("const_workload.yaml"));
    let mut generator = config.build();
    let mut batches = generator.generate(10., 5.);
    assert_eq!(batches.len(), 1);
    assert_eq!(batches[0].sessions.len(), 2);
    let session = &mut batches[0].sessions[0];
    assert_eq!(session.user_id, 4);
    assert_eq!(session.metadata, vec!["browse".to_string(), "checkout".to_string()]);
    assert_eq!(session.deadline, 16.);
    let cloudlet = session.app_tier.next().unwrap();
    assert_eq!(cloudlet.cpu_length, 100.);
    assert_eq!(cloudlet.ram, 256);
    assert_eq!(cloudlet.io_length, Some(10.));
}

#[test]
#[should_panic(expected = "Unknown workload generator kind")]
fn test_unknown_kind_is_rejected() {
    let config = RawWorkloadConfig {
        kind: "periodic".to_string(),
        seed: 1,
        user_id: 0,
        sessions_per_tick: 1,
        frequency: None,
        const_session: None,
        stat_session: None,
        start_time: None,
        end_time: None,
        budget: None,
        jittered_arrivals: false,
    };
    config.build();
}

#[test]
#[should_panic(expected = "Can't read file")]
fn test_missing_config_file_is_rejected() {
    RawWorkloadConfig::from_file(&name_wrapper("does_not_exist.yaml"));
}
