use std::fs;
use std::path::Path;

use massive_prep::shard::{self, ShardSet, DEFAULT_LANGUAGES, DEFAULT_PARTITIONS};
use massive_prep::LocaleMatch;
use serde_json::{json, Value};
use tempfile::TempDir;

fn read_shard(path: &Path) -> Vec<Value> {
    fs::read_to_string(path)
        .unwrap()
        .lines()
        .map(|line| serde_json::from_str(line).unwrap())
        .collect()
}

fn write_lines(path: &Path, values: &[Value]) {
    let text: String = values.iter().map(|v| format!("{v}\n")).collect();
    fs::write(path, text).unwrap();
}

fn default_set() -> ShardSet {
    ShardSet::new(&DEFAULT_LANGUAGES, &DEFAULT_PARTITIONS, LocaleMatch::Subtag)
}

#[test]
fn record_lands_in_its_language_partition_shard() {
    let tmp = TempDir::new().unwrap();
    let input = tmp.path().join("data");
    let output = tmp.path().join("output_jsonl");
    fs::create_dir(&input).unwrap();

    let hi = json!({"id":"1","utt":"hi","annot_utt":"hi","locale":"en-US","partition":"train"});
    let hola = json!({"id":"2","utt":"hola","annot_utt":"hola","locale":"es-ES","partition":"test"});
    write_lines(&input.join("a.jsonl"), &[hi.clone(), hola.clone()]);

    let written = shard::split_dir(&input, &output, default_set(), |_| {}).unwrap();
    assert_eq!(written.len(), 9);

    assert_eq!(read_shard(&output.join("en-train.jsonl")), vec![hi]);
    for part in DEFAULT_PARTITIONS {
        let records = read_shard(&output.join(format!("en-{part}.jsonl")));
        assert!(!records.contains(&hola), "en-{part} holds record 2");
    }
}

#[test]
fn every_pair_gets_a_file_even_when_empty() {
    let tmp = TempDir::new().unwrap();
    let input = tmp.path().join("data");
    let output = tmp.path().join("out");
    fs::create_dir(&input).unwrap();
    write_lines(
        &input.join("x.jsonl"),
        &[json!({"id":"1","locale":"fr-FR","partition":"train"})],
    );

    let mut generated = Vec::new();
    shard::split_dir(&input, &output, default_set(), |done| {
        generated.push(done.key.file_name())
    })
    .unwrap();

    assert_eq!(generated.len(), 9);
    assert_eq!(generated[0], "en-test.jsonl");
    assert_eq!(generated[8], "de-dev.jsonl");
    for name in &generated {
        assert_eq!(fs::read_to_string(output.join(name)).unwrap(), "");
    }
}

#[test]
fn shards_round_trip_in_encounter_order() {
    let tmp = TempDir::new().unwrap();
    let input = tmp.path().join("data");
    let output = tmp.path().join("out");
    fs::create_dir(&input).unwrap();

    let inputs_b = vec![
        json!({"id":"b1","locale":"sw-KE","partition":"dev","utt":"saa ngapi","scenario":"datetime"}),
        json!({"id":"b2","locale":"de-DE","partition":"dev","utt":"wie spät"}),
    ];
    let inputs_a = vec![
        json!({"id":"a1","locale":"sw-KE","partition":"dev","utt":"habari","slot_method":[{"slot":"x"}]}),
        json!({"id":"a2","locale":"sw-KE","partition":"train","utt":"asante"}),
        json!({"id":"a3","locale":"sw-KE","partition":"dev","utt":"ndiyo"}),
    ];
    // b.jsonl is created first; a.jsonl still comes first in listing order
    write_lines(&input.join("b.jsonl"), &inputs_b);
    write_lines(&input.join("a.jsonl"), &inputs_a);

    shard::split_dir(&input, &output, default_set(), |_| {}).unwrap();

    assert_eq!(
        read_shard(&output.join("sw-dev.jsonl")),
        vec![inputs_a[0].clone(), inputs_a[2].clone(), inputs_b[0].clone()]
    );
    assert_eq!(read_shard(&output.join("sw-train.jsonl")), vec![inputs_a[1].clone()]);
    assert_eq!(read_shard(&output.join("de-dev.jsonl")), vec![inputs_b[1].clone()]);
}

#[test]
fn output_is_compact_unescaped_and_keeps_key_order() {
    let tmp = TempDir::new().unwrap();
    let input = tmp.path().join("data");
    let output = tmp.path().join("out");
    fs::create_dir(&input).unwrap();
    fs::write(
        input.join("a.jsonl"),
        "{\"partition\": \"test\", \"utt\": \"wie spät ist es\", \"locale\": \"de-DE\", \"id\": \"7\"}\n",
    )
    .unwrap();

    shard::split_dir(&input, &output, default_set(), |_| {}).unwrap();

    assert_eq!(
        fs::read_to_string(output.join("de-test.jsonl")).unwrap(),
        "{\"partition\":\"test\",\"utt\":\"wie spät ist es\",\"locale\":\"de-DE\",\"id\":\"7\"}\n"
    );
}

#[test]
fn prefix_policy_lets_overlapping_languages_share_records() {
    let tmp = TempDir::new().unwrap();
    let input = tmp.path().join("data");
    let output = tmp.path().join("out");
    fs::create_dir(&input).unwrap();
    let rec = json!({"id":"1","locale":"sw-KE","partition":"test"});
    write_lines(&input.join("a.jsonl"), &[rec.clone()]);

    let prefix = ShardSet::new(&["s", "sw"], &["test"], LocaleMatch::Prefix);
    shard::split_dir(&input, &output, prefix, |_| {}).unwrap();
    assert_eq!(read_shard(&output.join("s-test.jsonl")), vec![rec.clone()]);
    assert_eq!(read_shard(&output.join("sw-test.jsonl")), vec![rec.clone()]);

    let subtag = ShardSet::new(&["s", "sw"], &["test"], LocaleMatch::Subtag);
    shard::split_dir(&input, &output, subtag, |_| {}).unwrap();
    assert!(read_shard(&output.join("s-test.jsonl")).is_empty());
    assert_eq!(read_shard(&output.join("sw-test.jsonl")), vec![rec]);
}

#[test]
fn malformed_input_fails_before_any_shard_is_written() {
    let tmp = TempDir::new().unwrap();
    let input = tmp.path().join("data");
    let output = tmp.path().join("out");
    fs::create_dir(&input).unwrap();
    write_lines(
        &input.join("a.jsonl"),
        &[json!({"id":"1","locale":"en-US","partition":"train"})],
    );
    fs::write(input.join("b.jsonl"), "not json\n").unwrap();

    let err = shard::split_dir(&input, &output, default_set(), |_| {}).unwrap_err();
    assert!(format!("{err:#}").contains("b.jsonl line 1"));
    assert!(output.is_dir());
    assert!(!output.join("en-train.jsonl").exists());
}

#[test]
fn missing_input_dir_is_an_error() {
    let tmp = TempDir::new().unwrap();
    let result = shard::split_dir(
        &tmp.path().join("dataset/data"),
        &tmp.path().join("out"),
        default_set(),
        |_| {},
    );
    assert!(result.is_err());
}

#[test]
fn numbers_pass_through_unchanged() {
    let tmp = TempDir::new().unwrap();
    let input = tmp.path().join("data");
    let output = tmp.path().join("out");
    fs::create_dir(&input).unwrap();
    let line = r#"{"id":123456789012345678901234567890,"score":1.50,"locale":"en-US","partition":"train"}"#;
    fs::write(input.join("a.jsonl"), format!("{line}\n")).unwrap();

    shard::split_dir(&input, &output, default_set(), |_| {}).unwrap();

    assert_eq!(
        fs::read_to_string(output.join("en-train.jsonl")).unwrap(),
        format!("{line}\n")
    );
}

#[test]
fn repeated_runs_do_not_accumulate() {
    let tmp = TempDir::new().unwrap();
    let input = tmp.path().join("data");
    let output = tmp.path().join("out");
    fs::create_dir(&input).unwrap();
    let rec = json!({"id":"1","locale":"de-DE","partition":"dev"});
    write_lines(&input.join("a.jsonl"), &[rec.clone()]);

    shard::split_dir(&input, &output, default_set(), |_| {}).unwrap();
    let written = shard::split_dir(&input, &output, default_set(), |_| {}).unwrap();

    let de_dev = written
        .iter()
        .find(|s| s.key.file_name() == "de-dev.jsonl")
        .unwrap();
    assert_eq!(de_dev.records, 1);
    assert_eq!(read_shard(&output.join("de-dev.jsonl")), vec![rec]);
}
