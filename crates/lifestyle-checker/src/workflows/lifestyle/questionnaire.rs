//! Second stage: three yes/no questions scored against age-banded weights.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use super::domain::MINIMUM_AGE;

/// Scores at or below this value need no follow-up.
pub const LOW_NEED_THRESHOLD: u32 = 3;

pub const LOW_NEED_MESSAGE: &str = "Thank you for answering our questions, we don't need to see you at this time. Keep up the good work!";
pub const IMPROVEMENT_MESSAGE: &str = "We think there are some simple things you could do to improve your quality of life, please phone to book an appointment";
pub const INVALID_AGE_MESSAGE: &str = "Invalid age supplied";

/// Scorer-side failures.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum ScoringError {
    #[error("invalid age supplied: {0}")]
    InvalidAge(u32),
    #[error("question {} has not been answered", .0.key())]
    IncompleteAnswers(Question),
}

impl ScoringError {
    /// Stable snake_case tag for logs and API payloads.
    pub fn kind(&self) -> &'static str {
        match self {
            ScoringError::InvalidAge(_) => "invalid_age",
            ScoringError::IncompleteAnswers(_) => "incomplete_answers",
        }
    }
}

/// Age bracket selecting a row of the weight table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum AgeBand {
    A,
    B,
    C,
    D,
}

impl AgeBand {
    /// Bands are contiguous: A 16-21, B 22-40, C 41-63, D 64 and over.
    pub fn classify(age: u32) -> Result<Self, ScoringError> {
        match age {
            64.. => Ok(AgeBand::D),
            41..=63 => Ok(AgeBand::C),
            22..=40 => Ok(AgeBand::B),
            16..=21 => Ok(AgeBand::A),
            _ => Err(ScoringError::InvalidAge(age)),
        }
    }

    pub fn weights(&self) -> ScoreWeights {
        match self {
            AgeBand::A => ScoreWeights::new(1, 2, 1),
            AgeBand::B => ScoreWeights::new(2, 2, 3),
            AgeBand::C => ScoreWeights::new(3, 2, 2),
            AgeBand::D => ScoreWeights::new(3, 3, 1),
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            AgeBand::A => "A",
            AgeBand::B => "B",
            AgeBand::C => "C",
            AgeBand::D => "D",
        }
    }
}

impl fmt::Display for AgeBand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Per-question weights for one band.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScoreWeights {
    pub smoking: u32,
    pub drinking: u32,
    pub exercise: u32,
}

impl ScoreWeights {
    const fn new(smoking: u32, drinking: u32, exercise: u32) -> Self {
        Self {
            smoking,
            drinking,
            exercise,
        }
    }

    pub fn for_question(&self, question: Question) -> u32 {
        match question {
            Question::Smoking => self.smoking,
            Question::Drinking => self.drinking,
            Question::Exercise => self.exercise,
        }
    }
}

/// The fixed questions, in the order they are asked.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Question {
    Smoking,
    Drinking,
    Exercise,
}

impl Question {
    pub const ALL: [Question; 3] = [Question::Smoking, Question::Drinking, Question::Exercise];

    pub fn key(&self) -> &'static str {
        match self {
            Question::Smoking => "q1",
            Question::Drinking => "q2",
            Question::Exercise => "q3",
        }
    }

    pub fn prompt(&self) -> &'static str {
        match self {
            Question::Smoking => "Do you smoke?",
            Question::Drinking => "Do you drink alcohol?",
            Question::Exercise => "Do you exercise regularly?",
        }
    }

    /// Answer that earns this question's weight. Exercise is rewarded, so it scores on "no".
    pub fn scoring_answer(&self) -> Answer {
        match self {
            Question::Smoking | Question::Drinking => Answer::Yes,
            Question::Exercise => Answer::No,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Answer {
    Yes,
    No,
}

impl Answer {
    pub fn as_str(&self) -> &'static str {
        match self {
            Answer::Yes => "yes",
            Answer::No => "no",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("expected 'yes' or 'no', found '{0}'")]
pub struct AnswerParseError(pub String);

impl FromStr for Answer {
    type Err = AnswerParseError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_ascii_lowercase().as_str() {
            "yes" | "y" => Ok(Answer::Yes),
            "no" | "n" => Ok(Answer::No),
            _ => Err(AnswerParseError(value.to_string())),
        }
    }
}

/// Responses collected so far; a question is unanswered while its slot is `None`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Answers {
    #[serde(rename = "q1", default, deserialize_with = "deserialize_answer")]
    pub smoking: Option<Answer>,
    #[serde(rename = "q2", default, deserialize_with = "deserialize_answer")]
    pub drinking: Option<Answer>,
    #[serde(rename = "q3", default, deserialize_with = "deserialize_answer")]
    pub exercise: Option<Answer>,
}

/// A blank answer is an unanswered question, matching an unselected dropdown.
fn deserialize_answer<'de, D>(deserializer: D) -> Result<Option<Answer>, D::Error>
where
    D: serde::Deserializer<'de>,
{
    let raw = Option::<String>::deserialize(deserializer)?;
    match raw {
        Some(value) if !value.trim().is_empty() => value
            .parse::<Answer>()
            .map(Some)
            .map_err(serde::de::Error::custom),
        _ => Ok(None),
    }
}

impl Answers {
    pub fn new(smoking: Answer, drinking: Answer, exercise: Answer) -> Self {
        Self {
            smoking: Some(smoking),
            drinking: Some(drinking),
            exercise: Some(exercise),
        }
    }

    pub fn get(&self, question: Question) -> Option<Answer> {
        match question {
            Question::Smoking => self.smoking,
            Question::Drinking => self.drinking,
            Question::Exercise => self.exercise,
        }
    }

    pub fn set(&mut self, question: Question, answer: Option<Answer>) {
        let slot = match question {
            Question::Smoking => &mut self.smoking,
            Question::Drinking => &mut self.drinking,
            Question::Exercise => &mut self.exercise,
        };
        *slot = answer;
    }

    /// First unanswered question, if any.
    pub fn first_missing(&self) -> Option<Question> {
        Question::ALL
            .into_iter()
            .find(|question| self.get(*question).is_none())
    }

    pub fn is_complete(&self) -> bool {
        self.first_missing().is_none()
    }
}

/// Contribution of a single question to the total.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScoreComponent {
    pub question: Question,
    pub answer: Answer,
    pub points: u32,
}

/// Whether the patient should be invited in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Recommendation {
    LowNeed,
    ImprovementRecommended,
}

impl Recommendation {
    pub fn for_score(score: u32) -> Self {
        if score <= LOW_NEED_THRESHOLD {
            Recommendation::LowNeed
        } else {
            Recommendation::ImprovementRecommended
        }
    }

    pub fn message(&self) -> &'static str {
        match self {
            Recommendation::LowNeed => LOW_NEED_MESSAGE,
            Recommendation::ImprovementRecommended => IMPROVEMENT_MESSAGE,
        }
    }
}

/// Scored questionnaire with its breakdown.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScoreResult {
    pub band: AgeBand,
    pub total: u32,
    pub components: Vec<ScoreComponent>,
    pub recommendation: Recommendation,
}

impl ScoreResult {
    pub fn message(&self) -> &'static str {
        self.recommendation.message()
    }
}

/// Sum the band weights for every question answered with its scoring answer.
pub fn compute_score(band: AgeBand, answers: &Answers) -> Result<ScoreResult, ScoringError> {
    let weights = band.weights();
    let mut components = Vec::with_capacity(Question::ALL.len());
    let mut total = 0;

    for question in Question::ALL {
        let answer = answers
            .get(question)
            .ok_or(ScoringError::IncompleteAnswers(question))?;
        let points = if answer == question.scoring_answer() {
            weights.for_question(question)
        } else {
            0
        };
        total += points;
        debug!(
            question = question.key(),
            answer = answer.as_str(),
            points,
            total,
            "scored question"
        );
        components.push(ScoreComponent {
            question,
            answer,
            points,
        });
    }

    Ok(ScoreResult {
        band,
        total,
        components,
        recommendation: Recommendation::for_score(total),
    })
}

/// Classify the age then score the answers.
pub fn score_for_age(age: u32, answers: &Answers) -> Result<ScoreResult, ScoringError> {
    let band = AgeBand::classify(age)?;
    debug!(age, band = band.label(), "assigned age band");
    let result = compute_score(band, answers)?;
    info!(
        band = band.label(),
        score = result.total,
        recommendation = ?result.recommendation,
        "lifestyle questionnaire scored"
    );
    Ok(result)
}

/// View model for the questionnaire stage.
///
/// An age below the service minimum should never arrive here; if it does the questionnaire
/// refuses answers and submission and shows the invalid-age message.
#[derive(Debug, Clone)]
pub struct Questionnaire {
    patient_age: u32,
    answers: Answers,
    result: Option<ScoreResult>,
}

impl Questionnaire {
    pub fn new(patient_age: u32) -> Self {
        Self {
            patient_age,
            answers: Answers::default(),
            result: None,
        }
    }

    pub fn patient_age(&self) -> u32 {
        self.patient_age
    }

    pub fn accepts_answers(&self) -> bool {
        self.patient_age >= MINIMUM_AGE
    }

    pub fn answers(&self) -> &Answers {
        &self.answers
    }

    pub fn set_answer(
        &mut self,
        question: Question,
        answer: Option<Answer>,
    ) -> Result<(), ScoringError> {
        if !self.accepts_answers() {
            return Err(ScoringError::InvalidAge(self.patient_age));
        }
        self.answers.set(question, answer);
        self.result = None;
        Ok(())
    }

    /// Submission is enabled only for a valid age with every question answered.
    pub fn can_submit(&self) -> bool {
        self.accepts_answers() && self.answers.is_complete()
    }

    /// A failed submission clears any earlier result, so no stale message outlives it.
    pub fn submit(&mut self) -> Result<&ScoreResult, ScoringError> {
        self.result = None;
        if !self.accepts_answers() {
            return Err(ScoringError::InvalidAge(self.patient_age));
        }
        let result = score_for_age(self.patient_age, &self.answers)?;
        let stored = self.result.insert(result);
        Ok(&*stored)
    }

    pub fn result(&self) -> Option<&ScoreResult> {
        self.result.as_ref()
    }

    pub fn message(&self) -> Option<&'static str> {
        if !self.accepts_answers() {
            return Some(INVALID_AGE_MESSAGE);
        }
        self.result.as_ref().map(ScoreResult::message)
    }
}
