use chrono::{NaiveDate, NaiveDateTime};
use serde_json::{Value, json};
use taskflow_core::{
    DailyScheduler, Importance, ParsedTask, Priority, SchedulableTask, SchedulerConfig,
    TaskParser, pending_by_due_date,
};

/// Monday.
fn now() -> NaiveDateTime {
    NaiveDate::from_ymd_opt(2024, 1, 1)
        .unwrap()
        .and_hms_opt(0, 0, 0)
        .unwrap()
}

/// What the store does with a parsed task: assign an id and carry `time`
/// over as `estimatedTime`.
fn store(i: usize, parsed: &ParsedTask) -> SchedulableTask {
    let mut v = serde_json::to_value(parsed).unwrap();
    let obj = v.as_object_mut().unwrap();
    obj.insert("_id".into(), json!(i as i64 + 1));
    let hours = obj["time"].clone();
    obj.insert("estimatedTime".into(), hours);
    serde_json::from_value(v).unwrap()
}

fn store_all(parsed: &[ParsedTask]) -> Vec<SchedulableTask> {
    parsed.iter().enumerate().map(|(i, p)| store(i, p)).collect()
}

fn parse_all(texts: &[&str]) -> Vec<ParsedTask> {
    let raw: Vec<Value> = texts.iter().map(|t| json!(t)).collect();
    TaskParser::new().unwrap().process_tasks(&raw, now())
}

#[test]
fn test_free_text_to_daily_plan() {
    let parsed = parse_all(&[
        "Write essay about 4 hours hard next week",
        "Review notes 2 hours hard next week",
        "Clean room tomorrow easy",
    ]);
    assert_eq!(parsed.len(), 3);
    assert_eq!(parsed[0].estimated_hours, 4.0);
    assert_eq!(parsed[0].priority, Priority::High);
    assert_eq!(parsed[0].importance, Importance::Critical);
    assert_eq!(parsed[2].due_date, NaiveDate::from_ymd_opt(2024, 1, 2).unwrap());

    let records = store_all(&parsed);
    let pending = pending_by_due_date(records).unwrap();
    let out = DailyScheduler::default().schedule(&pending, now()).unwrap();

    let days: Vec<&str> = out.schedule.days().map(|(day, _)| day).collect();
    assert_eq!(days, vec!["2024-01-02", "2024-01-08"]);

    let v = serde_json::to_value(&out).unwrap();
    let tomorrow = &v["schedule"]["2024-01-02"][0];
    assert_eq!(tomorrow["_id"], json!(3));
    assert_eq!(tomorrow["score"], json!(60.0));
    assert_eq!(tomorrow["start_time"], json!("9:00"));
    assert_eq!(tomorrow["end_time"], json!("10:00"));
    assert_eq!(tomorrow["days_until_deadline"], json!(1));

    // Equal scores keep due-date order, so the essay books the morning first.
    let next_week = v["schedule"]["2024-01-08"].as_array().unwrap();
    assert_eq!(next_week.len(), 1);
    assert_eq!(next_week[0]["_id"], json!(1));
    assert_eq!(next_week[0]["start_time"], json!("9:00"));
    assert_eq!(next_week[0]["end_time"], json!("13:00"));

    assert_eq!(
        v["unscheduled_tasks"],
        json!([{
            "_id": 2,
            "title": "Review Notes",
            "priority": "high",
            "importance": "critical",
            "dueDate": "2024-01-08",
            "estimatedTime": 2.0,
            "progress": 0,
            "status": "todo",
            "score": 50.0,
            "days_until_deadline": 7
        }])
    );
}

#[test]
fn test_larger_day_fits_everything() {
    let parsed = parse_all(&[
        "Write essay about 4 hours hard next week",
        "Review notes 2 hours hard next week",
    ]);
    let records = store_all(&parsed);

    let scheduler = DailyScheduler::new(SchedulerConfig {
        max_hours_per_day: 8.0,
        day_start_hour: 8,
    });
    let out = scheduler
        .schedule(&pending_by_due_date(records).unwrap(), now())
        .unwrap();

    assert!(out.unscheduled_tasks.is_empty());
    let day = out.schedule.day("2024-01-08").unwrap();
    let slots: Vec<(&str, &str)> = day
        .iter()
        .map(|e| (e.start_time.as_str(), e.end_time.as_str()))
        .collect();
    assert_eq!(slots, vec![("8:00", "12:00"), ("12:00", "14:00")]);
}

#[test]
fn test_completed_tasks_never_reach_the_plan() {
    let parsed = parse_all(&["Clean room tomorrow easy", "Laundry easy"]);
    let mut records = store_all(&parsed);
    records[0].status = Some(taskflow_core::TaskStatus::Completed);

    let out = DailyScheduler::default()
        .schedule(&pending_by_due_date(records).unwrap(), now())
        .unwrap();

    assert_eq!(out.schedule.len(), 1);
    let day = out.schedule.day("2024-01-02").unwrap();
    assert_eq!(day.len(), 1);
    assert_eq!(day[0].scored.task.title, "Laundry");
}
