use std::io::Cursor;

use callqa_audio::Waveform;
use callqa_features::report::{STATUS_FAILED, STATUS_OK};
use callqa_features::{
    AcousticFeatures, FeatureError, Issue, Pipeline, PipelineConfig, RawUtterance, Role,
    Transcript,
};

const SR: u32 = 16000;

/// Builds a buffer from `(seconds, frequency)` parts; frequency 0 is silence.
fn tone_parts(parts: &[(f64, f64)]) -> Vec<f32> {
    let mut out = Vec::new();
    for &(secs, freq) in parts {
        let n = (secs * SR as f64) as usize;
        out.extend((0..n).map(|i| {
            if freq == 0.0 {
                0.0
            } else {
                (0.3 * (2.0 * std::f64::consts::PI * freq * i as f64 / SR as f64).sin()) as f32
            }
        }));
    }
    out
}

fn wav_bytes(samples: &[f32]) -> Vec<u8> {
    let spec = hound::WavSpec {
        channels: 1,
        sample_rate: SR,
        bits_per_sample: 16,
        sample_format: hound::SampleFormat::Int,
    };
    let mut cursor = Cursor::new(Vec::new());
    {
        let mut writer = hound::WavWriter::new(&mut cursor, spec).unwrap();
        for &s in samples {
            writer.write_sample((s * 32767.0) as i16).unwrap();
        }
        writer.finalize().unwrap();
    }
    cursor.into_inner()
}

fn pipeline() -> Pipeline {
    Pipeline::new(PipelineConfig::default()).unwrap()
}

fn two_party() -> Vec<RawUtterance> {
    vec![
        RawUtterance::new("0", 0.0, 5.0, "Dạ em chào anh"),
        RawUtterance::new("1", 5.2, 12.0, "Chào em, cho anh hỏi về sản phẩm A"),
    ]
}

#[test]
fn two_party_call_from_wav() {
    let audio = wav_bytes(&tone_parts(&[(5.0, 150.0), (0.2, 0.0), (6.8, 220.0)]));
    let report = pipeline().extract_bytes(&two_party(), &audio);

    assert_eq!(report.status, STATUS_OK);
    assert_eq!(report.message, "Features and metadata extracted successfully");
    assert!(report.task_id.is_some());

    let segments = report.segments.unwrap();
    assert_eq!(segments[0].speaker, Role::Customer);
    assert_eq!(segments[1].speaker, Role::Sales);
    assert_eq!(segments[1].speaker_id, "1");
    assert!((segments[1].acoustic.pitch_hz - 220.0).abs() < 5.0);
    assert!((segments[0].acoustic.pitch_hz - 150.0).abs() < 5.0);

    let meta = report.metadata.unwrap();
    assert_eq!(meta.duration, 12.0);
    assert_eq!(meta.turns, 1);
    assert!((meta.ratio_sales - 6.8 / 12.0).abs() < 1e-9);

    let summary = report.summary.unwrap();
    assert_eq!(summary.sales.unwrap().segment_count, 1);
    assert!(summary.greeting.has_greeting);
}

#[test]
fn corrupted_single_utterance() {
    let raw = vec![RawUtterance::new(
        "0",
        1.0,
        1.1,
        "dạ cảm ơn anh một hai ba bốn năm sáu bảy",
    )];
    let wave = Waveform::new(tone_parts(&[(2.0, 200.0)]), SR);
    let out = pipeline().extract(&raw, &wave).unwrap();

    let seg = &out.segments[0];
    assert!(seg.is_corrupted);
    assert_eq!(seg.word_count, 11);
    assert_eq!(seg.acoustic, AcousticFeatures::default());
    assert_eq!(seg.lexical.counts.politeness_count, 2);
    assert_eq!(seg.categories.speed_category, "unknown");
    assert!(!seg.issues.contains(&Issue::SpeakingTooSlow));
}

#[test]
fn identical_inputs_serialize_identically() {
    let audio = wav_bytes(&tone_parts(&[(5.0, 150.0), (0.2, 0.0), (6.8, 220.0)]));
    let a = serde_json::to_string(&pipeline().extract_bytes(&two_party(), &audio)).unwrap();
    let b = serde_json::to_string(&pipeline().extract_bytes(&two_party(), &audio)).unwrap();
    assert_eq!(a, b);
}

#[test]
fn silence_ratio_tracks_gaps() {
    let wave = Waveform::new(tone_parts(&[(2.0, 200.0), (2.0, 0.0), (2.0, 200.0)]), SR);
    let raw = vec![
        RawUtterance::new("0", 0.0, 2.0, "một"),
        RawUtterance::new("1", 1.0, 5.0, "hai"),
        RawUtterance::new("1", 2.2, 3.8, "ba"),
        RawUtterance::new("0", 5.0, 9.0, "bốn"),
    ];
    let out = pipeline().extract(&raw, &wave).unwrap();
    for seg in &out.segments {
        let r = seg.acoustic.silence_ratio;
        assert!((0.0..=1.0).contains(&r), "ratio {r} out of range");
    }
    assert!(out.segments[0].acoustic.silence_ratio < 0.05);
    let straddling = out.segments[1].acoustic.silence_ratio;
    assert!((0.4..0.6).contains(&straddling), "ratio {straddling}");
    assert_eq!(out.segments[2].acoustic.silence_ratio, 1.0);
}

#[test]
fn speed_ignores_case_punctuation_and_fillers() {
    let wave = Waveform::new(tone_parts(&[(6.0, 200.0)]), SR);
    let raw = vec![
        RawUtterance::new("0", 0.0, 2.0, "Xin Chào!"),
        RawUtterance::new("1", 2.0, 4.0, "xin chao"),
        RawUtterance::new("1", 4.0, 6.0, "à ừ dạ"),
    ];
    let out = pipeline().extract(&raw, &wave).unwrap();
    assert_eq!(out.segments[0].acoustic.speed_spm, out.segments[1].acoustic.speed_spm);
    assert_eq!(out.segments[0].acoustic.speed_spm, 60.0);
    assert_eq!(out.segments[2].acoustic.speed_spm, 0.0);
}

#[test]
fn turns_and_interruptions() {
    let wave = Waveform::new(vec![0.0; SR as usize * 10], SR);
    let raw = vec![
        RawUtterance::new("a", 0.0, 3.0, "x"),
        RawUtterance::new("a", 3.0, 5.0, "x"),
        RawUtterance::new("b", 5.1, 6.0, "x"),
        RawUtterance::new("a", 6.1, 9.0, "x"),
    ];
    let out = pipeline().extract(&raw, &wave).unwrap();
    assert_eq!(out.metadata.turns, 2);
    let flags: Vec<bool> = out.segments.iter().map(|s| s.lexical.is_interrupted).collect();
    assert_eq!(flags, vec![false, false, false, true]);
    assert_eq!(out.summary.sales.unwrap().interruptions, 1);
}

#[test]
fn zero_duration_call() {
    let wave = Waveform::new(Vec::new(), SR);
    let raw = vec![RawUtterance::new("0", 0.0, 0.0, "")];
    let out = pipeline().extract(&raw, &wave).unwrap();
    assert_eq!(out.metadata.duration, 0.0);
    assert_eq!(out.metadata.ratio_sales, 0.0);
    assert_eq!(out.segments[0].acoustic.volume_db, -100.0);
    assert_eq!(out.segments[0].acoustic.silence_ratio, 0.0);
}

#[test]
fn undecodable_audio_reports_failure() {
    let report = pipeline().extract_bytes(&two_party(), b"definitely not a wav file");
    assert_eq!(report.status, STATUS_FAILED);
    assert!(report.message.starts_with("audio decode failed"));
    assert!(report.segments.is_none());
    assert!(report.metadata.is_none());
}

#[test]
fn empty_transcript_reports_failure() {
    let audio = wav_bytes(&tone_parts(&[(1.0, 200.0)]));
    let report = pipeline().extract_bytes(&[], &audio);
    assert_eq!(report.status, STATUS_FAILED);
    assert_eq!(report.message, "transcript contains no utterances");

    let v = serde_json::to_value(&report).unwrap();
    assert!(v.get("segments").is_none());
}

#[test]
fn yaml_infinite_timestamp_is_rejected() {
    let doc = "- {speaker: a, start: 0.0, end: .inf, text: alo}\n\
               - {speaker: b, start: 1.0, end: 2.0, text: vâng}\n";
    let raw = serde_yaml::from_str::<Transcript>(doc).unwrap().into_utterances();
    assert!(raw[0].end.is_infinite());

    let wave = Waveform::new(tone_parts(&[(3.0, 200.0)]), SR);
    let err = pipeline().extract(&raw, &wave).unwrap_err();
    assert!(matches!(err, FeatureError::InvalidTimestamp { index: 0, .. }));

    let report = pipeline().extract_bytes(&raw, &wav_bytes(&tone_parts(&[(3.0, 200.0)])));
    assert_eq!(report.status, STATUS_FAILED);
    assert!(report.segments.is_none());
}

#[test]
fn diarizer_document_shape() {
    let doc = r#"{"dialogue": [
        {"speaker": 0, "start": 0.0, "end": 5.0, "text": "Dạ em chào anh"},
        {"speaker": 1, "start": 5.2, "end": 12.0, "text": "Chào em, cho anh hỏi về sản phẩm A"}
    ]}"#;
    let raw = serde_json::from_str::<Transcript>(doc).unwrap().into_utterances();
    let wave = Waveform::new(vec![0.0; SR as usize * 12], SR);
    let out = pipeline().extract(&raw, &wave).unwrap();
    assert_eq!(out.segments[1].speaker_id, "1");
    assert_eq!(out.segments[1].speaker, Role::Sales);
}

#[test]
fn segment_json_fields() {
    let wave = Waveform::new(tone_parts(&[(12.0, 200.0)]), SR);
    let out = pipeline().extract(&two_party(), &wave).unwrap();
    let v = serde_json::to_value(&out.segments[1]).unwrap();
    for key in [
        "speaker",
        "speaker_id",
        "start_time",
        "end_time",
        "text",
        "word_count",
        "is_corrupted",
        "speed_spm",
        "volume_db",
        "pitch_hz",
        "pitch_stddev",
        "silence_ratio",
        "disfluency_count",
        "politeness_count",
        "negative_count",
        "positive_count",
        "is_interrupted",
        "speed_category",
        "volume_category",
        "pitch_category",
        "pitch_stddev_category",
        "issues",
    ] {
        assert!(v.get(key).is_some(), "missing {key}");
    }
    assert_eq!(v["speaker"], "Sales");
}
