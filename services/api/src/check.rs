use crate::infra::http_registry;
use chrono::{Local, NaiveDate};
use clap::Args;
use lifestyle_checker::config::AppConfig;
use lifestyle_checker::error::AppError;
use lifestyle_checker::workflows::lifestyle::{
    Answer, IdentityValidator, LifestyleWizard, PatientRegistry, Question, ScoreResult,
    ValidationOutcome, WizardError,
};

#[derive(Args, Debug)]
pub(crate) struct CheckArgs {
    /// Nine digit NHS number (spaces are ignored)
    #[arg(long)]
    pub(crate) nhs_number: String,
    /// Patient surname as held by the registry
    #[arg(long)]
    pub(crate) surname: String,
    /// Date of birth (YYYY-MM-DD)
    #[arg(long, value_parser = crate::infra::parse_date)]
    pub(crate) date_of_birth: Option<NaiveDate>,
    /// Answer to "Do you smoke?" (yes/no)
    #[arg(long, value_parser = crate::infra::parse_answer)]
    pub(crate) smoke: Option<Answer>,
    /// Answer to "Do you drink alcohol?" (yes/no)
    #[arg(long, value_parser = crate::infra::parse_answer)]
    pub(crate) drink: Option<Answer>,
    /// Answer to "Do you exercise regularly?" (yes/no)
    #[arg(long, value_parser = crate::infra::parse_answer)]
    pub(crate) exercise: Option<Answer>,
    /// Evaluation date used for age calculations (defaults to today)
    #[arg(long, value_parser = crate::infra::parse_date)]
    pub(crate) today: Option<NaiveDate>,
}

pub(crate) async fn run_check(args: CheckArgs) -> Result<(), AppError> {
    let config = AppConfig::load()?;
    let registry = http_registry(&config.registry)?;
    let today = args.today.unwrap_or_else(|| Local::now().date_naive());

    let mut wizard = LifestyleWizard::new(IdentityValidator::new(registry));
    match run_wizard(&mut wizard, &args, today).await? {
        Some(result) => render_score(&result),
        None => println!("Questionnaire skipped"),
    }
    Ok(())
}

/// Drive both stages, returning the score when identity validation succeeds.
pub(crate) async fn run_wizard<R>(
    wizard: &mut LifestyleWizard<R>,
    args: &CheckArgs,
    today: NaiveDate,
) -> Result<Option<ScoreResult>, AppError>
where
    R: PatientRegistry + ?Sized,
{
    if let Some(form) = wizard.identity_form_mut() {
        form.set_identifier(args.nhs_number.as_str());
        form.set_family_name(args.surname.as_str());
        form.set_birth_date(args.date_of_birth);
    }

    println!("Identity check (evaluated {today})");
    let outcome = wizard.submit_identity(today).await?;
    println!("- {}", outcome.message());
    let age = match outcome {
        ValidationOutcome::Success { age } => age,
        ValidationOutcome::Rejected(_) => return Ok(None),
    };
    println!("- Registry age: {age}");

    if let Some(questionnaire) = wizard.questionnaire_mut() {
        for (question, answer) in [
            (Question::Smoking, args.smoke),
            (Question::Drinking, args.drink),
            (Question::Exercise, args.exercise),
        ] {
            questionnaire
                .set_answer(question, answer)
                .map_err(WizardError::from)?;
        }
        if let Some(missing) = questionnaire.answers().first_missing() {
            println!("\nLifestyle questionnaire incomplete");
            println!("- Please answer: {}", missing.prompt());
            return Ok(None);
        }
    }

    let result = wizard.submit_questionnaire()?;
    Ok(Some(result))
}

fn render_score(result: &ScoreResult) {
    println!("\nLifestyle questionnaire (band {})", result.band);
    for component in &result.components {
        println!(
            "- {} {} -> {} points",
            component.question.prompt(),
            component.answer.as_str(),
            component.points
        );
    }
    println!("Total score: {}", result.total);
    println!("{}", result.message());
}
