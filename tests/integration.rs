//! End-to-end tests for the bayes-sift classifier.
//!
//! These exercise the text-level API: training and untraining through the
//! default extractor, and the naive, probabilistic and Fisher scorers reading
//! the same store.

use bayes_sift::error::{BayesError, ModelError};
use bayes_sift::model::inverse_chi_square;
use bayes_sift::{Classifier, DocumentCountPolicy, FrequencyStore, TrainingConfig, Vocabulary};

const SPAM: &[&str] = &[
    "Buy cheap pills now, limited offer",
    "Cheap watches, buy now and save money",
    "Win money now! Claim your free prize",
    "Limited offer: free money for winners",
];

const HAM: &[&str] = &[
    "Hello friend, lunch tomorrow at noon?",
    "Meeting notes attached, see you tomorrow",
    "Thanks for the lunch, friend",
    "Project meeting moved to Thursday afternoon",
];

fn mail_classifier() -> Classifier {
    let mut clf = Classifier::new(["spam", "ham"]);
    for doc in SPAM {
        clf.train("spam", doc).unwrap();
    }
    for doc in HAM {
        clf.train("ham", doc).unwrap();
    }
    clf
}

fn word_sum(store: &FrequencyStore) -> u64 {
    store.summary().iter().map(|s| s.words).sum()
}

#[test]
fn spam_ham_scenario() {
    let mut clf = Classifier::new(["spam", "ham"]);
    clf.train("spam", "buy now").unwrap();
    clf.train("ham", "hello friend").unwrap();

    assert_eq!(clf.classify("buy now").unwrap().as_str(), "spam");
    assert_eq!(clf.classify("hello friend").unwrap().as_str(), "ham");
}

#[test]
fn classifies_unseen_documents() {
    let clf = mail_classifier();
    assert_eq!(clf.classify("free money, buy now").unwrap().as_str(), "spam");
    assert_eq!(clf.classify("lunch meeting tomorrow").unwrap().as_str(), "ham");
}

#[test]
fn all_three_scorers_agree_on_clear_cases() {
    let clf = mail_classifier();
    let doc = "cheap pills, limited offer";

    let naive = clf.classification_scores(doc).unwrap();
    assert!(naive["spam"] > naive["ham"]);

    let probs = clf.probabilities(doc).unwrap();
    assert!(probs["spam"] > probs["ham"]);

    let fisher = clf.fisher_probabilities(doc).unwrap();
    assert!(fisher["spam"] > fisher["ham"]);
}

#[test]
fn naive_scores_equal_independent_log_sums() {
    let clf = mail_classifier();
    let doc = "free lunch tomorrow";
    let features = clf.features(doc).unwrap();
    let scores = clf.classification_scores(doc).unwrap();

    for category in clf.categories() {
        let store = clf.store();
        let total = store.row_total(category.as_str()) as f64;
        let expected: f64 = features
            .keys()
            .map(|f| {
                let count = store.count(f, category.as_str());
                let count = if count == 0 { 0.1 } else { count as f64 };
                (count / total).ln()
            })
            .sum();
        assert!((scores[category.as_str()] - expected).abs() < 1e-12);
    }
}

#[test]
fn featureless_document_scores_zero_everywhere() {
    let clf = mail_classifier();
    let scores = clf.classification_scores("a an the, of!").unwrap();
    assert!(scores.values().all(|&s| s == 0.0));
}

#[test]
fn probabilities_positive_and_shrink_with_length() {
    let clf = mail_classifier();
    let words = ["cheap", "pills", "money", "lunch", "meeting"];
    let mut previous = f64::INFINITY;
    for n in 1..=words.len() {
        let text = words[..n].join(" ");
        let p = clf.probability(&text, "ham").unwrap();
        assert!(p > 0.0 && p.is_finite());
        assert!(p < previous, "length {n}: {p} should be < {previous}");
        previous = p;
    }
}

#[test]
fn fisher_probabilities_within_unit_interval() {
    let clf = mail_classifier();
    for doc in SPAM.iter().chain(HAM).copied().chain(["", "unrelated words entirely"]) {
        for (category, p) in clf.fisher_probabilities(doc).unwrap() {
            assert!((0.0..=1.0).contains(&p), "{doc:?} / {category}: {p}");
        }
    }
}

#[test]
fn inverse_chi_square_zero_statistic() {
    for df in [0, 2, 4, 10, 100] {
        assert_eq!(inverse_chi_square(0.0, df), 1.0);
    }
}

#[test]
fn fisher_numeric_regression() {
    let mut clf = Classifier::new(["spam", "ham"]);
    clf.train("spam", "buy now").unwrap();
    clf.train("ham", "hello friend").unwrap();

    let spam = clf.fisher_probability("buy now", "spam").unwrap();
    let ham = clf.fisher_probability("buy now", "ham").unwrap();
    assert!((spam - 0.950_992_944_001_182).abs() < 1e-9);
    assert!((ham - 0.623_458_055_440_153_6).abs() < 1e-9);
}

#[test]
fn paired_train_untrain_restores_feature_counts() {
    let mut clf = mail_classifier();
    let before = clf.store().clone();

    let extra = [
        ("spam", "free pills, free money"),
        ("ham", "lunch friend lunch"),
        ("spam", "limited watches"),
    ];
    for (category, doc) in extra {
        clf.train(category, doc).unwrap();
        assert_eq!(clf.store().total_words(), word_sum(clf.store()));
    }
    for (category, doc) in extra.iter().rev() {
        clf.untrain(category, doc).unwrap();
        assert_eq!(clf.store().total_words(), word_sum(clf.store()));
    }

    for category in clf.categories() {
        assert_eq!(
            clf.store().row(category.as_str()),
            before.row(category.as_str())
        );
    }
    assert_eq!(clf.store().total_words(), before.total_words());
    // Document counters are not reversed by default.
    assert_eq!(clf.store().total_documents(), before.total_documents() + 3);
}

#[test]
fn interleaved_one_for_one_pairs_round_trip() {
    let mut clf = mail_classifier();
    let before = clf.store().clone();
    for doc in SPAM {
        clf.train("ham", doc).unwrap();
        clf.untrain("ham", doc).unwrap();
    }
    for category in clf.categories() {
        assert_eq!(
            clf.store().row(category.as_str()),
            before.row(category.as_str())
        );
    }
}

#[test]
fn reverse_policy_round_trips_document_counts() {
    let mut clf = mail_classifier().with_training(TrainingConfig {
        document_counts: DocumentCountPolicy::Reverse,
        ..Default::default()
    });
    let before = clf.store().clone();
    clf.train("spam", "free prize").unwrap();
    clf.untrain("spam", "free prize").unwrap();
    assert_eq!(clf.store(), &before);
}

#[test]
fn over_untraining_never_goes_negative() {
    let mut clf = mail_classifier();
    for _ in 0..5 {
        clf.untrain("spam", "cheap cheap cheap money money").unwrap();
    }
    assert_eq!(clf.store().count("cheap", "spam"), 0);
    assert_eq!(clf.store().count("money", "spam"), 0);
    assert_eq!(clf.store().total_words(), word_sum(clf.store()));
}

#[test]
fn untrained_model_prior_and_probability_diverge() {
    let clf = Classifier::new(["spam", "ham"]);
    assert_eq!(clf.category_prior("spam"), 0.0);
    let err = clf.probability("buy now", "spam").unwrap_err();
    assert!(matches!(
        err,
        BayesError::Model(ModelError::UndefinedRatio { .. })
    ));
}

#[test]
fn add_category_twice_discards_training() {
    let mut clf = mail_classifier();
    assert!(!clf.store().row("spam").unwrap().is_empty());
    clf.add_category("spam");
    clf.add_category("spam");
    assert!(clf.store().row("spam").unwrap().is_empty());
    assert_eq!(clf.store().total_words(), word_sum(clf.store()));
}

#[test]
fn late_category_makes_naive_scoring_undefined_until_trained() {
    let mut clf = mail_classifier();
    clf.add_category("newsletter");
    assert!(clf.classify("weekly digest").is_err());

    clf.train("newsletter", "weekly digest of project news").unwrap();
    assert_eq!(clf.classify("weekly digest").unwrap().as_str(), "newsletter");
}

#[test]
fn unknown_category_errors() {
    let mut clf = mail_classifier();
    assert!(matches!(
        clf.train("news", "markets"),
        Err(BayesError::Model(ModelError::UnknownCategory { .. }))
    ));
    assert!(matches!(
        clf.fisher_probability("markets", "news"),
        Err(BayesError::Model(ModelError::UnknownCategory { .. }))
    ));
}

#[test]
fn vocabulary_filter_applies_to_scoring() {
    let mut clf = mail_classifier();
    clf.set_vocabulary(Some(Vocabulary::new(["unrelated"])));
    // Nothing survives the filter, so every naive score is zero.
    let scores = clf.classification_scores("cheap pills").unwrap();
    assert!(scores.values().all(|&s| s == 0.0));
}

#[test]
fn independent_classifiers_do_not_share_state() {
    let mut a = Classifier::new(["spam", "ham"]);
    let b = Classifier::new(["spam", "ham"]);
    a.train("spam", "buy now").unwrap();
    assert_eq!(a.store().total_documents(), 1);
    assert_eq!(b.store().total_documents(), 0);
}
