use crate::workflows::lifestyle::questionnaire::{
    compute_score, score_for_age, AgeBand, Answer, Answers, Question, Questionnaire,
    Recommendation, ScoringError, IMPROVEMENT_MESSAGE, INVALID_AGE_MESSAGE, LOW_NEED_MESSAGE,
};

use Answer::{No, Yes};

#[test]
fn bands_cover_every_eligible_age() {
    let cases = [
        (16, AgeBand::A),
        (21, AgeBand::A),
        (22, AgeBand::B),
        (40, AgeBand::B),
        (41, AgeBand::C),
        (63, AgeBand::C),
        (64, AgeBand::D),
        (65, AgeBand::D),
        (100, AgeBand::D),
        (u32::MAX, AgeBand::D),
    ];
    for (age, band) in cases {
        assert_eq!(AgeBand::classify(age), Ok(band), "age {age}");
    }
    for age in 16..=130 {
        assert!(AgeBand::classify(age).is_ok(), "age {age} unclassified");
    }
}

#[test]
fn ages_below_minimum_are_invalid() {
    for age in [0, 1, 15] {
        assert_eq!(AgeBand::classify(age), Err(ScoringError::InvalidAge(age)));
    }
}

#[test]
fn weight_table_matches_bands() {
    let rows = [
        (AgeBand::A, [1u32, 2, 1]),
        (AgeBand::B, [2, 2, 3]),
        (AgeBand::C, [3, 2, 2]),
        (AgeBand::D, [3, 3, 1]),
    ];
    for (band, expected) in rows {
        let weights = band.weights();
        let actual = Question::ALL.map(|question| weights.for_question(question));
        assert_eq!(actual, expected, "band {band}");
    }
}

#[test]
fn exercise_scores_on_no_while_others_score_on_yes() {
    let scored = compute_score(AgeBand::A, &Answers::new(Yes, Yes, No)).expect("complete");
    assert_eq!(scored.total, 4);
    assert_eq!(scored.recommendation, Recommendation::ImprovementRecommended);
    let points: Vec<u32> = scored.components.iter().map(|c| c.points).collect();
    assert_eq!(points, vec![1, 2, 1]);

    let clean = compute_score(AgeBand::A, &Answers::new(No, No, Yes)).expect("complete");
    assert_eq!(clean.total, 0);
    assert_eq!(clean.recommendation, Recommendation::LowNeed);
}

#[test]
fn scores_and_recommendations_per_band() {
    let cases = [
        (18, Yes, Yes, No, 4),
        (18, Yes, No, Yes, 1),
        (18, No, Yes, Yes, 2),
        (18, Yes, No, No, 2),
        (18, No, Yes, No, 3),
        (18, No, No, Yes, 0),
        (25, Yes, Yes, No, 7),
        (25, Yes, No, Yes, 2),
        (25, No, Yes, Yes, 2),
        (25, Yes, No, No, 5),
        (25, No, Yes, No, 5),
        (25, No, No, Yes, 0),
        (50, Yes, Yes, No, 7),
        (50, Yes, No, Yes, 3),
        (50, No, Yes, Yes, 2),
        (50, Yes, No, No, 5),
        (50, No, Yes, No, 4),
        (50, No, No, Yes, 0),
        (70, Yes, Yes, No, 7),
        (70, Yes, No, Yes, 3),
        (70, No, Yes, Yes, 3),
        (70, Yes, No, No, 4),
        (70, No, Yes, No, 4),
        (70, No, No, Yes, 0),
    ];

    for (age, smoke, drink, exercise, expected) in cases {
        let result = score_for_age(age, &Answers::new(smoke, drink, exercise)).expect("scores");
        assert_eq!(result.total, expected, "age {age}: {smoke:?} {drink:?} {exercise:?}");
        let message = if expected > 3 {
            IMPROVEMENT_MESSAGE
        } else {
            LOW_NEED_MESSAGE
        };
        assert_eq!(result.message(), message);
    }
}

#[test]
fn threshold_is_inclusive_on_the_low_side() {
    assert_eq!(Recommendation::for_score(3), Recommendation::LowNeed);
    assert_eq!(Recommendation::for_score(4), Recommendation::ImprovementRecommended);
}

#[test]
fn band_c_smoker_without_exercise_needs_follow_up() {
    let result = score_for_age(50, &Answers::new(Yes, No, No)).expect("scores");
    assert_eq!(result.band, AgeBand::C);
    assert_eq!(result.total, 5);
    assert_eq!(result.message(), IMPROVEMENT_MESSAGE);
}

#[test]
fn incomplete_answers_cannot_be_scored() {
    let mut answers = Answers::new(Yes, No, No);
    answers.set(Question::Drinking, None);

    assert_eq!(
        compute_score(AgeBand::B, &answers),
        Err(ScoringError::IncompleteAnswers(Question::Drinking))
    );
}

#[test]
fn answers_parse_case_insensitively() {
    assert_eq!(" YES ".parse::<Answer>(), Ok(Yes));
    assert_eq!("no".parse::<Answer>(), Ok(No));
    assert!("maybe".parse::<Answer>().is_err());
}

#[test]
fn blank_answers_deserialize_as_unanswered() {
    let answers: Answers =
        serde_json::from_str(r#"{"q1":"yes","q2":"","q3":"No"}"#).expect("answers decode");
    assert_eq!(answers.smoking, Some(Yes));
    assert_eq!(answers.drinking, None);
    assert_eq!(answers.exercise, Some(No));
    assert_eq!(answers.first_missing(), Some(Question::Drinking));
}

#[test]
fn questionnaire_enables_submit_once_complete() {
    let mut questionnaire = Questionnaire::new(25);
    assert!(!questionnaire.can_submit());
    assert_eq!(questionnaire.message(), None);

    questionnaire
        .set_answer(Question::Smoking, Some(Yes))
        .expect("accepts answer");
    questionnaire
        .set_answer(Question::Drinking, Some(No))
        .expect("accepts answer");
    assert_eq!(
        questionnaire.submit().map(|result| result.total),
        Err(ScoringError::IncompleteAnswers(Question::Exercise))
    );

    questionnaire
        .set_answer(Question::Exercise, Some(No))
        .expect("accepts answer");
    assert!(questionnaire.can_submit());
    let total = questionnaire.submit().expect("scores").total;
    assert_eq!(total, 5);
    assert_eq!(questionnaire.message(), Some(IMPROVEMENT_MESSAGE));
}

#[test]
fn questionnaire_refuses_out_of_contract_age() {
    let mut questionnaire = Questionnaire::new(15);

    assert!(!questionnaire.accepts_answers());
    assert_eq!(questionnaire.message(), Some(INVALID_AGE_MESSAGE));
    assert_eq!(
        questionnaire.set_answer(Question::Smoking, Some(Yes)),
        Err(ScoringError::InvalidAge(15))
    );
    assert!(!questionnaire.can_submit());
    assert_eq!(
        questionnaire.submit().map(|result| result.total),
        Err(ScoringError::InvalidAge(15))
    );
}

#[test]
fn failed_resubmission_clears_previous_result() {
    let mut questionnaire = Questionnaire::new(50);
    for (question, answer) in [
        (Question::Smoking, Yes),
        (Question::Drinking, No),
        (Question::Exercise, No),
    ] {
        questionnaire
            .set_answer(question, Some(answer))
            .expect("accepts answer");
    }
    assert_eq!(questionnaire.submit().expect("scores").total, 5);
    assert_eq!(questionnaire.message(), Some(IMPROVEMENT_MESSAGE));

    questionnaire
        .set_answer(Question::Drinking, None)
        .expect("accepts answer");
    assert_eq!(questionnaire.message(), None);
    assert_eq!(
        questionnaire.submit().map(|result| result.total),
        Err(ScoringError::IncompleteAnswers(Question::Drinking))
    );
    assert!(!questionnaire.can_submit());
    assert_eq!(questionnaire.result(), None);
    assert_eq!(questionnaire.message(), None);
}

#[test]
fn scoring_errors_carry_stable_kinds() {
    assert_eq!(ScoringError::InvalidAge(12).kind(), "invalid_age");
    assert_eq!(
        ScoringError::IncompleteAnswers(Question::Exercise).kind(),
        "incomplete_answers"
    );
}
