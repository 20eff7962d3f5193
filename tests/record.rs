use ndarray::{Array1, Array3};
use recordforge::{Record, RecordDecoder, Sample, encode_record};

fn sample(side: usize, classes: usize) -> Sample {
    let image = Array3::from_shape_fn((side, side, 3), |(y, x, c)| (y * 100 + x * 10 + c) as f32);
    let mut label = Array1::<f32>::zeros(classes);
    label[1] = 1.0;
    Sample { image, label }
}

#[test]
fn features_are_mode_prefixed() {
    let record = encode_record(&sample(2, 3), "train");
    let names: Vec<&str> = record.feature_names().collect();
    assert_eq!(names, vec!["train/image", "train/label"]);
}

#[test]
fn label_feature_is_raw_little_endian_f32() {
    let record = encode_record(&sample(2, 3), "train");
    let mut expected = Vec::new();
    for v in [0.0f32, 1.0, 0.0] {
        expected.extend_from_slice(&v.to_le_bytes());
    }
    assert_eq!(record.feature("train/label").unwrap(), expected.as_slice());
}

#[test]
fn image_feature_is_flattened_row_major() {
    let record = encode_record(&sample(2, 3), "train");
    let bytes = record.feature("train/image").unwrap();
    assert_eq!(bytes.len(), 2 * 2 * 3 * 4);
    // First pixel's channels are (0, 1, 2) in row-major order.
    assert_eq!(&bytes[0..4], &0.0f32.to_le_bytes());
    assert_eq!(&bytes[4..8], &1.0f32.to_le_bytes());
    assert_eq!(&bytes[8..12], &2.0f32.to_le_bytes());
}

#[test]
fn encoding_is_idempotent() {
    let s = sample(4, 3);
    let first = encode_record(&s, "train").to_bytes();
    let second = encode_record(&s, "train").to_bytes();
    assert_eq!(first, second);
}

#[test]
fn round_trip_is_bit_equal() -> anyhow::Result<()> {
    let s = sample(4, 3);
    let bytes = encode_record(&s, "eval").to_bytes();

    let record = Record::from_bytes(&bytes)?;
    let decoder = RecordDecoder {
        mode: "eval".to_string(),
        side_length: 4,
        num_classes: 3,
    };
    assert_eq!(decoder.image(&record)?, s.image);
    assert_eq!(decoder.label(&record)?, s.label);
    Ok(())
}

#[test]
fn decoder_with_wrong_mode_finds_no_feature() {
    let record = encode_record(&sample(2, 3), "train");
    let decoder = RecordDecoder {
        mode: "eval".to_string(),
        side_length: 2,
        num_classes: 3,
    };
    assert!(decoder.image(&record).is_err());
}

#[test]
fn decoder_with_wrong_shape_config_fails_loudly() {
    // The record embeds no shape metadata, so a misconfigured reader must
    // be caught by the length check rather than silently misreading.
    let record = encode_record(&sample(2, 3), "train");
    let decoder = RecordDecoder {
        mode: "train".to_string(),
        side_length: 3,
        num_classes: 3,
    };
    assert!(decoder.image(&record).is_err());
}
