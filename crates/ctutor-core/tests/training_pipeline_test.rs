//! Dataset file to best checkpoint to explanation, without a compiler.

use ctutor_core::model::{BagOfWordsExplainer, ExplainerConfig};
use ctutor_core::tutor::explain_or_fallback;
use ctutor_training::{
    compute_dataset_id, read_dataset_file, write_dataset_file, CheckpointLayout, CheckpointMetadata,
    DatasetRecord, ModelService, NullProgressSink, PromptTemplate, SuggestedFix, TrainingHyperParams,
    TrainingLoopController,
};
use tempfile::TempDir;

fn record(id: &str, message: &str, explanation: &str) -> DatasetRecord {
    DatasetRecord {
        id: id.to_string(),
        compiler: "g++".to_string(),
        error_type: "Syntax Error".to_string(),
        error_message: message.to_string(),
        explanation: explanation.to_string(),
        suggested_fix: SuggestedFix {
            kind: "code_modification".to_string(),
            description: String::new(),
            code: String::new(),
        },
    }
}

fn records() -> Vec<DatasetRecord> {
    let mut records = Vec::new();
    for i in 0..6 {
        records.push(record(
            &format!("semi-{i}"),
            &format!("source.cpp:{i}:10: error: expected ';' before 'return'"),
            "A semicolon is missing.",
        ));
        records.push(record(
            &format!("scope-{i}"),
            &format!("source.cpp:{i}:5: error: 'cout' was not declared in this scope"),
            "cout needs <iostream>.",
        ));
    }
    records
}

#[test]
fn test_train_from_dataset_file_and_explain() {
    let temp = TempDir::new().unwrap();
    let dataset_path = temp.path().join("data").join("dataset.json");
    write_dataset_file(&dataset_path, &records()).unwrap();

    let loaded = read_dataset_file(&dataset_path).unwrap();
    assert_eq!(loaded, records());

    let prompt = PromptTemplate::default();
    let examples = prompt.examples_for(&loaded);
    let mut model = BagOfWordsExplainer::new(&examples, ExplainerConfig::default()).unwrap();

    let hyperparams = TrainingHyperParams { epochs: 20, batch_size: 2, ..Default::default() };
    let layout = CheckpointLayout::new(temp.path().join("model"));
    let mut controller = TrainingLoopController::new(hyperparams, layout.clone())
        .unwrap()
        .with_dataset_id(compute_dataset_id(&loaded).unwrap());

    let report = controller.run(&mut model, examples, &NullProgressSink).unwrap();

    assert_eq!(report.epochs.len(), 20);
    assert!(report.checkpoint_writes >= 1 && report.checkpoint_writes <= 20);
    assert_eq!(report.train_examples + report.validation_examples, 12);

    let metadata = CheckpointMetadata::read(&layout).unwrap();
    assert_eq!(metadata.epoch, report.best_epoch);
    assert_eq!(metadata.model_id, "bag-of-words");
    assert_eq!(metadata.artifacts.len(), 2);

    let restored = BagOfWordsExplainer::load(layout.dir()).unwrap();
    let explanation = explain_or_fallback(
        Ok(restored),
        &prompt,
        "main.cpp:4:5: error: 'cout' was not declared in this scope",
    );
    assert_eq!(explanation, "cout needs <iostream>.");
}

#[test]
fn test_missing_checkpoint_falls_back() {
    let temp = TempDir::new().unwrap();
    let model = BagOfWordsExplainer::load(&temp.path().join("absent"));
    let explanation = explain_or_fallback(model, &PromptTemplate::default(), "error");
    assert!(explanation.starts_with("Error calling the model: "));
}
