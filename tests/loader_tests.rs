use pickforge::workload::Workload;
use std::io::Cursor;
use std::io::Write;
use tempfile::NamedTempFile;

#[test]
fn loader_parses_one_order_per_row() {
    let data = "1,2,3\n4\n2,2,5\n";
    let workload = Workload::from_reader(Cursor::new(data)).unwrap();

    assert_eq!(workload.len(), 3);
    assert_eq!(workload.orders()[0].products, vec![1, 2, 3]);
    assert_eq!(workload.orders()[1].products, vec![4]);
    assert_eq!(workload.orders()[2].products, vec![2, 2, 5]);
}

#[test]
fn malformed_tokens_are_skipped_with_the_rest_kept() {
    let data = "1,abc,3\n-2,4\n";
    let workload = Workload::from_reader(Cursor::new(data)).unwrap();

    assert_eq!(workload.len(), 2);
    assert_eq!(workload.orders()[0].products, vec![1, 3]);
    assert_eq!(workload.orders()[1].products, vec![4]);
}

#[test]
fn zero_is_not_a_valid_product_id() {
    let data = "0,1\n";
    let workload = Workload::from_reader(Cursor::new(data)).unwrap();
    assert_eq!(workload.orders()[0].products, vec![1]);
}

#[test]
fn rows_without_any_valid_product_are_dropped() {
    let data = "1,2\nfoo,bar\n,,\n3\n";
    let workload = Workload::from_reader(Cursor::new(data)).unwrap();

    assert_eq!(workload.len(), 2);
    assert_eq!(workload.orders()[1].products, vec![3]);
}

#[test]
fn an_entirely_invalid_file_is_a_validation_error() {
    let data = "foo,bar\nbaz\n";
    assert!(Workload::from_reader(Cursor::new(data)).is_err());
}

#[test]
fn empty_input_is_a_validation_error() {
    assert!(Workload::from_reader(Cursor::new("")).is_err());
}

#[test]
fn load_from_file_round_trips() {
    let mut file = NamedTempFile::new().unwrap();
    writeln!(file, "7,8").unwrap();
    writeln!(file, "9").unwrap();

    let workload = Workload::load_from_file(file.path().to_str().unwrap()).unwrap();
    assert_eq!(workload.len(), 2);
    assert_eq!(workload.orders()[0].products, vec![7, 8]);
}

#[test]
fn missing_file_reports_the_path() {
    let err = Workload::load_from_file("does/not/exist.csv").unwrap_err();
    assert!(err.to_string().contains("does/not/exist.csv"));
}
