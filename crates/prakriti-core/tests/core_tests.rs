use std::io::Cursor;

use prakriti_core::dataset::{is_missing, stratified_folds, stratified_split, test_allocation, Dataset};
use prakriti_core::encoding::{CategoryEncoder, FeatureEncoders, LabelEncoder, UnseenPolicy};
use prakriti_core::types::FeatureSchema;
use prakriti_core::Error;

const CSV: &str = "\
Body Size,Hair Color,Dosha
Slim,\"Black/Brown,dull\",Vata
Medium,Red,Pitta
Large,,Kapha
Slim,Red,Vata
";

fn dataset() -> Dataset { Dataset::from_reader(Cursor::new(CSV), "Dosha", "Unknown").expect("parse csv") }

#[test]
fn csv_keeps_quoted_commas_and_fills_blanks() {
    let ds = dataset();
    assert_eq!(ds.feature_names(), &["Body Size".to_string(), "Hair Color".to_string()]);
    assert_eq!(ds.len(), 4);
    assert_eq!(ds.rows()[0][1], "Black/Brown,dull");
    assert_eq!(ds.rows()[2][1], "Unknown", "empty cell becomes the sentinel");
    assert_eq!(ds.filled_cells(), 1);
    assert_eq!(ds.class_distribution().get("Vata"), Some(&2));
}

#[test]
fn pandas_na_tokens_become_the_sentinel() {
    let csv = "Body Size,Hair Color,Sleep,Dosha\nNA,N/A,Sound,Vata\nnull,NaN,none,Pitta\n";
    let ds = Dataset::from_reader(Cursor::new(csv), "Dosha", "Unknown").unwrap();
    assert_eq!(ds.rows()[0], vec!["Unknown", "Unknown", "Sound"]);
    assert_eq!(ds.rows()[1], vec!["Unknown", "Unknown", "none"], "lower-case none is an answer");
    assert_eq!(ds.filled_cells(), 4);
    assert!(is_missing("") && is_missing("<NA>") && !is_missing(" NA"));
}

#[test]
fn missing_target_column_is_an_error() {
    let err = Dataset::from_reader(Cursor::new("a,b\n1,2\n"), "Dosha", "Unknown").unwrap_err();
    assert!(matches!(err, Error::Dataset(_)));
}

#[test]
fn encoder_codes_follow_sorted_order() {
    let enc = CategoryEncoder::fit(["Slim", "Large", "Medium", "Slim"]);
    assert_eq!(enc.classes(), &["Large".to_string(), "Medium".to_string(), "Slim".to_string()]);
    assert_eq!(enc.encode("Large"), Some(0));
    assert_eq!(enc.encode("Slim"), Some(2));
    assert_eq!(enc.encode("Tiny"), None);
    assert_eq!(enc.decode(1), Some("Medium"));
    assert_eq!(enc.fallback_code(UnseenPolicy::FirstCode), 0);
    assert_eq!(enc.fallback_code(UnseenPolicy::MostFrequent), 2);
}

#[test]
fn label_encoder_round_trips_classes() {
    let labels = LabelEncoder::fit(["Vata", "Pitta", "Kapha", "Vata"]);
    assert_eq!(labels.classes(), &["Kapha".to_string(), "Pitta".to_string(), "Vata".to_string()]);
    for class in ["Vata", "Pitta", "Kapha"] {
        let code = labels.encode(class).unwrap();
        assert_eq!(labels.decode(code).unwrap(), class);
    }
    assert!(matches!(labels.decode(3), Err(Error::UnknownClass(3))));
    assert!(labels.encode("Tridosha").is_err());
}

#[test]
fn feature_encoders_are_fitted_per_column() {
    let ds = dataset();
    let encoders = FeatureEncoders::fit(&ds);
    let schema = FeatureSchema::new(ds.feature_names().to_vec());
    let x = encoders.transform(&schema, ds.rows()).unwrap();
    assert_eq!(x.dim(), (4, 2));
    // Body Size: Large=0 Medium=1 Slim=2; Hair Color: Black/Brown,dull=0 Red=1 Unknown=2
    assert_eq!(x.row(0).to_vec(), vec![2.0, 0.0]);
    assert_eq!(x.row(2).to_vec(), vec![0.0, 2.0]);

    assert!(matches!(encoders.encode_value("Body Size", "Tiny"), Err(Error::UnseenCategory { .. })));
    assert_eq!(encoders.encode_or_fallback("Body Size", "Tiny", UnseenPolicy::FirstCode).unwrap(), 0);
    assert!(matches!(encoders.encode_or_fallback("Eyes", "Small", UnseenPolicy::FirstCode), Err(Error::ArtifactMismatch(_))));
}

#[test]
fn stratified_split_preserves_class_ratio() {
    // 50 of class 0, 30 of class 1, 20 of class 2
    let labels: Vec<usize> = (0..100).map(|i| if i < 50 { 0 } else if i < 80 { 1 } else { 2 }).collect();
    let split = stratified_split(&labels, 0.2, 42);
    assert_eq!(split.test.len(), 20);
    assert_eq!(split.train.len(), 80);
    let test_counts = [0, 1, 2].map(|c| split.test.iter().filter(|&&i| labels[i] == c).count());
    assert_eq!(test_counts, [10, 6, 4]);

    let mut all: Vec<usize> = split.train.iter().chain(split.test.iter()).copied().collect();
    all.sort_unstable();
    assert_eq!(all, (0..100).collect::<Vec<_>>(), "split is a partition");

    assert_eq!(stratified_split(&labels, 0.2, 42), split, "same seed, same split");
}

#[test]
fn test_size_is_the_ceiling_of_the_ratio() {
    assert_eq!(test_allocation(&[7, 7, 7], 0.2), vec![2, 2, 1]);
    assert_eq!(test_allocation(&[50, 30, 20], 0.2), vec![10, 6, 4]);
    assert_eq!(test_allocation(&[1, 9], 0.25), vec![0, 3]);
    assert_eq!(test_allocation(&[], 0.2), Vec::<usize>::new());

    let labels: Vec<usize> = (0..21).map(|i| i % 3).collect();
    let split = stratified_split(&labels, 0.2, 1);
    assert_eq!(split.test.len(), 5);
    assert_eq!(split.train.len(), 16);
}

#[test]
fn stratified_folds_cover_every_index_once() {
    let labels: Vec<usize> = (0..31).map(|i| i % 3).collect();
    let folds = stratified_folds(&labels, 5, 7);
    assert_eq!(folds.len(), 5);
    let mut seen = vec![0usize; labels.len()];
    for fold in &folds {
        assert_eq!(fold.train.len() + fold.test.len(), labels.len());
        for &i in &fold.test { seen[i] += 1; }
    }
    assert!(seen.iter().all(|&c| c == 1));
}
