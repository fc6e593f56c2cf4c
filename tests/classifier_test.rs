use cardioscreen::{
    classify, from_fn, predict_batch, validate, Batch, Classifier, ClassifierError, Label,
    PipelineError, Schema, Value, HEART_DISEASE_FIELDS,
};
use ndarray::Array2;
use std::sync::Arc;
use std::thread;

fn patient(age: f64, thal: f64) -> Vec<Value> {
    [age, 1.0, 3.0, 145.0, 233.0, 1.0, 0.0, 150.0, 0.0, 2.3, 0.0, 0.0, thal]
        .into_iter()
        .map(Value::from)
        .collect()
}

fn heart_batch(rows: Vec<Vec<Value>>) -> Batch {
    Batch::new(HEART_DISEASE_FIELDS.to_vec(), rows).unwrap()
}

/// Positive when `thal` (the last schema column) is at least 2.
fn thal_rule() -> impl Classifier {
    from_fn(|x: &Array2<f32>| Ok(x.rows().into_iter().map(|r| i64::from(r[12] >= 2.0)).collect()))
}

#[test]
fn test_single_positive_row() -> Result<(), Box<dyn std::error::Error>> {
    let batch = heart_batch(vec![patient(63.0, 1.0)]);
    let seen = from_fn(|x: &Array2<f32>| {
        assert_eq!(x.shape(), &[1, 13]);
        assert_eq!(x[[0, 0]], 63.0);
        assert!((x[[0, 9]] - 2.3).abs() < 1e-6);
        Ok(vec![1])
    });

    let result = predict_batch(batch, &Schema::heart_disease(), &seen)?;
    assert_eq!(result.labels(), [Label::HeartDisease]);
    assert_eq!(result.labels()[0].to_string(), "Heart Disease");
    Ok(())
}

#[test]
fn test_labels_follow_row_order() -> Result<(), Box<dyn std::error::Error>> {
    let thals = [1.0, 3.0, 2.0, 0.0, 2.0];
    let batch = heart_batch(thals.iter().map(|&t| patient(50.0, t)).collect());
    let validated = validate(batch, &Schema::heart_disease())?;

    let result = classify(validated, &thal_rule())?;
    assert_eq!(result.len(), thals.len());
    assert_eq!(
        result.labels(),
        [
            Label::NoHeartDisease,
            Label::HeartDisease,
            Label::HeartDisease,
            Label::NoHeartDisease,
            Label::HeartDisease,
        ]
    );
    Ok(())
}

#[test]
fn test_classifier_invoked_once_per_batch() -> Result<(), Box<dyn std::error::Error>> {
    use std::sync::atomic::{AtomicUsize, Ordering};

    let calls = AtomicUsize::new(0);
    let counting = from_fn(|x: &Array2<f32>| {
        calls.fetch_add(1, Ordering::SeqCst);
        Ok(vec![0; x.nrows()])
    });

    let batch = heart_batch((0..25).map(|i| patient(30.0 + i as f64, 1.0)).collect());
    let result = predict_batch(batch, &Schema::heart_disease(), &counting)?;
    assert_eq!(result.len(), 25);
    assert_eq!(calls.load(Ordering::SeqCst), 1);
    Ok(())
}

#[test]
fn test_extra_column_is_hidden_from_classifier_but_kept_in_result() -> Result<(), Box<dyn std::error::Error>> {
    let mut columns = vec!["patient_id"];
    columns.extend(HEART_DISEASE_FIELDS);
    let mut row = vec![Value::from("A-17")];
    row.extend(patient(63.0, 1.0));
    let batch = Batch::new(columns, vec![row])?;

    let width_checked = from_fn(|x: &Array2<f32>| {
        assert_eq!(x.ncols(), 13);
        Ok(vec![0])
    });
    let result = predict_batch(batch, &Schema::heart_disease(), &width_checked)?;

    assert_eq!(result.columns()[0], "patient_id");
    assert_eq!(result.columns().last(), Some(&"Prediction"));
    assert_eq!(result.labels(), [Label::NoHeartDisease]);
    Ok(())
}

#[test]
fn test_missing_field_stops_before_classification() {
    let columns = HEART_DISEASE_FIELDS[..12].to_vec();
    let row = patient(63.0, 1.0)[..12].to_vec();
    let batch = Batch::new(columns, vec![row]).unwrap();
    let never = from_fn(|_: &Array2<f32>| panic!("classifier must not run"));

    match predict_batch(batch, &Schema::heart_disease(), &never) {
        Err(PipelineError::MissingFields(e)) => assert_eq!(e.missing(), ["thal"]),
        other => panic!("unexpected result: {:?}", other),
    }
}

#[test]
fn test_numeric_text_is_coerced() -> Result<(), Box<dyn std::error::Error>> {
    let mut row = patient(63.0, 3.0);
    row[0] = Value::from("63");
    row[12] = Value::from(" 3 ");
    let result = predict_batch(heart_batch(vec![row]), &Schema::heart_disease(), &thal_rule())?;
    assert_eq!(result.labels(), [Label::HeartDisease]);
    Ok(())
}

#[test]
fn test_non_numeric_cell_fails_whole_batch() {
    let mut bad = patient(63.0, 3.0);
    bad[1] = Value::from("male");
    let batch = heart_batch(vec![patient(40.0, 1.0), bad]);

    let err = predict_batch(batch, &Schema::heart_disease(), &thal_rule()).unwrap_err();
    assert_eq!(
        err,
        PipelineError::Classifier(ClassifierError::InvalidValue {
            row: 1,
            column: "sex".into(),
            value: "male".into(),
        })
    );
}

#[test]
fn test_failure_does_not_affect_next_batch() -> Result<(), Box<dyn std::error::Error>> {
    let classifier = thal_rule();
    let mut bad = patient(63.0, 3.0);
    bad[4] = Value::Empty;
    assert!(predict_batch(heart_batch(vec![bad]), &Schema::heart_disease(), &classifier).is_err());

    let result = predict_batch(heart_batch(vec![patient(63.0, 3.0)]), &Schema::heart_disease(), &classifier)?;
    assert_eq!(result.labels(), [Label::HeartDisease]);
    Ok(())
}

#[test]
fn test_shared_classifier_across_threads() {
    let classifier: Arc<dyn Classifier> = Arc::new(thal_rule());

    let handles: Vec<_> = (0..4)
        .map(|i| {
            let classifier = Arc::clone(&classifier);
            thread::spawn(move || {
                let thal = if i % 2 == 0 { 3.0 } else { 1.0 };
                let batch = heart_batch(vec![patient(50.0, thal); 10]);
                predict_batch(batch, &Schema::heart_disease(), classifier.as_ref())
                    .map(|r| r.counts().heart_disease)
            })
        })
        .collect();

    let positives: Vec<usize> = handles
        .into_iter()
        .map(|h| h.join().unwrap().unwrap())
        .collect();
    assert_eq!(positives, vec![10, 0, 10, 0]);
}
