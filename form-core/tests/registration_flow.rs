//! Behaviour tests for the registration flow.
//!
//! These scenarios walk the form the way a visitor would: filling
//! fields, reading per-field feedback, submitting, and seeing the
//! resulting notice for accepted, rejected, and failed submissions.

use std::sync::{Arc, Mutex, MutexGuard};

use chrono::{DateTime, TimeZone, Utc};
use form_core::domain::{
    Field, GatewayError, Notice, Registration, RegistrationDraft, RegistrationService,
    SubmitOutcome, ValidationCode,
};
use form_core::test_support::{FixedClock, InMemoryGateway};
use rstest::{fixture, rstest};
use rstest_bdd_macros::{given, then, when};
use serde_json::json;
use tokio::runtime::Runtime;

struct FlowWorld {
    runtime: Runtime,
    gateway: Arc<InMemoryGateway>,
    service: RegistrationService<InMemoryGateway>,
    last_outcome: Option<SubmitOutcome>,
}

type SharedWorld = Arc<Mutex<FlowWorld>>;

fn fixed_now() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2026, 3, 10, 0, 0, 0)
        .single()
        .expect("fixed test instant")
}

fn julie() -> Registration {
    Registration::new(
        "Martin",
        "Julie",
        "julie.martin@example.com",
        "1990-01-01",
        "69001",
        "Lyon",
    )
}

fn build_world(gateway: InMemoryGateway) -> FlowWorld {
    let runtime = Runtime::new().expect("tokio runtime should initialize");
    let shared = Arc::new(gateway);
    let service = RegistrationService::new(
        Arc::clone(&shared),
        Arc::new(FixedClock::new(fixed_now())),
    );
    FlowWorld {
        runtime,
        gateway: shared,
        service,
        last_outcome: None,
    }
}

#[fixture]
fn world() -> SharedWorld {
    Arc::new(Mutex::new(build_world(InMemoryGateway::default())))
}

fn lock(world: &SharedWorld) -> MutexGuard<'_, FlowWorld> {
    world.lock().expect("world lock")
}

#[given("an empty registration roster")]
fn an_empty_registration_roster(world: SharedWorld) {
    let ctx = lock(&world);
    assert!(ctx.service.registrations().is_empty());
}

#[given("a roster holding an earlier registration")]
fn a_roster_holding_an_earlier_registration(world: SharedWorld) {
    let mut ctx = lock(&world);
    let seeded = Arc::new(InMemoryGateway::with_existing(vec![julie()]));
    ctx.service = RegistrationService::new(
        Arc::clone(&seeded),
        Arc::new(FixedClock::new(fixed_now())),
    );
    ctx.gateway = seeded;
    let handle = ctx.runtime.handle().clone();
    handle.block_on(ctx.service.load_existing());
}

#[when("the visitor fills in valid details")]
fn the_visitor_fills_in_valid_details(world: SharedWorld) {
    let mut ctx = lock(&world);
    ctx.service.edit(Field::Nom, json!("Martin"));
    ctx.service.edit(Field::Prenom, json!("Julie"));
    ctx.service.edit(Field::Email, json!("julie.martin@example.com"));
    ctx.service.edit(Field::DateNaissance, json!("1990-01-01"));
    ctx.service.edit(Field::Cp, json!("69001"));
    ctx.service.edit(Field::Ville, json!("Lyon"));
}

#[when("the visitor enters markup in the first name")]
fn the_visitor_enters_markup_in_the_first_name(world: SharedWorld) {
    let mut ctx = lock(&world);
    ctx.service.edit(Field::Prenom, json!("<b>Julie</b>"));
    ctx.service.touch(Field::Prenom);
}

#[when("the visitor corrects the first name")]
fn the_visitor_corrects_the_first_name(world: SharedWorld) {
    let mut ctx = lock(&world);
    ctx.service.edit(Field::Prenom, json!("Julie"));
}

#[when("the visitor enters a three digit postal code")]
fn the_visitor_enters_a_three_digit_postal_code(world: SharedWorld) {
    let mut ctx = lock(&world);
    ctx.service.edit(Field::Cp, json!("750"));
    ctx.service.touch(Field::Cp);
}

#[when("the visitor enters a birth date seventeen years ago")]
fn the_visitor_enters_a_birth_date_seventeen_years_ago(world: SharedWorld) {
    let mut ctx = lock(&world);
    ctx.service.edit(Field::DateNaissance, json!("2008-03-11"));
    ctx.service.touch(Field::DateNaissance);
}

#[when("the visitor enters a birth date exactly eighteen years ago")]
fn the_visitor_enters_a_birth_date_exactly_eighteen_years_ago(world: SharedWorld) {
    let mut ctx = lock(&world);
    ctx.service.edit(Field::DateNaissance, json!("2008-03-10"));
}

#[when("the visitor reuses the stored email")]
fn the_visitor_reuses_the_stored_email(world: SharedWorld) {
    let mut ctx = lock(&world);
    ctx.service.edit(Field::Email, json!("julie.martin@example.com"));
    ctx.service.touch(Field::Email);
}

#[when("the visitor picks a fresh email")]
fn the_visitor_picks_a_fresh_email(world: SharedWorld) {
    let mut ctx = lock(&world);
    ctx.service.edit(Field::Email, json!("nina.dubois@example.com"));
}

#[when("the back end rejects submissions with its own wording")]
fn the_back_end_rejects_submissions_with_its_own_wording(world: SharedWorld) {
    let ctx = lock(&world);
    ctx.gateway
        .fail_create_with(GatewayError::http_with_message(422, "email deja connu"));
}

#[when("the back end is down")]
fn the_back_end_is_down(world: SharedWorld) {
    let ctx = lock(&world);
    ctx.gateway.fail_create_with(GatewayError::http(503));
}

#[when("the back end is unreachable")]
fn the_back_end_is_unreachable(world: SharedWorld) {
    let ctx = lock(&world);
    ctx.gateway
        .fail_create_with(GatewayError::transport("connection refused"));
}

#[when("the visitor submits the form")]
fn the_visitor_submits_the_form(world: SharedWorld) {
    let mut ctx = lock(&world);
    let handle = ctx.runtime.handle().clone();
    let outcome = handle.block_on(ctx.service.submit());
    ctx.last_outcome = Some(outcome);
}

#[when("the visitor starts a new registration")]
fn the_visitor_starts_a_new_registration(world: SharedWorld) {
    let mut ctx = lock(&world);
    ctx.service.begin_registration();
}

#[then("the submission is accepted")]
fn the_submission_is_accepted(world: SharedWorld) {
    let ctx = lock(&world);
    assert_eq!(ctx.last_outcome, Some(SubmitOutcome::Accepted));
    assert_eq!(ctx.gateway.created().len(), 1);
}

#[then("the stored registration matches the details")]
fn the_stored_registration_matches_the_details(world: SharedWorld) {
    let ctx = lock(&world);
    assert_eq!(ctx.gateway.created(), vec![julie()]);
    assert_eq!(ctx.service.registrations().last(), Some(&julie()));
}

#[then("the success notice shows")]
fn the_success_notice_shows(world: SharedWorld) {
    let ctx = lock(&world);
    assert_eq!(
        ctx.service.notice().map(Notice::message),
        Some("Inscription enregistrée")
    );
}

#[then("the form is blank again")]
fn the_form_is_blank_again(world: SharedWorld) {
    let ctx = lock(&world);
    assert_eq!(ctx.service.form().draft(), &RegistrationDraft::default());
}

#[then("the submission is rejected before reaching the back end")]
fn the_submission_is_rejected_before_reaching_the_back_end(world: SharedWorld) {
    let ctx = lock(&world);
    assert_eq!(ctx.last_outcome, Some(SubmitOutcome::Rejected));
    assert!(ctx.gateway.created().is_empty());
}

#[then("the submission fails")]
fn the_submission_fails(world: SharedWorld) {
    let ctx = lock(&world);
    assert_eq!(ctx.last_outcome, Some(SubmitOutcome::Failed));
    assert!(ctx.gateway.created().is_empty());
}

#[then("the first name shows the markup failure")]
fn the_first_name_shows_the_markup_failure(world: SharedWorld) {
    let ctx = lock(&world);
    let failure = ctx
        .service
        .visible_failure(Field::Prenom)
        .expect("markup failure");
    assert_eq!(failure.code(), ValidationCode::XssDetected);
    assert_eq!(failure.message(), "Contenu HTML detecte");
}

#[then("the first name shows no failure")]
fn the_first_name_shows_no_failure(world: SharedWorld) {
    let ctx = lock(&world);
    assert!(ctx.service.visible_failure(Field::Prenom).is_none());
}

#[then("the postal code shows the format failure")]
fn the_postal_code_shows_the_format_failure(world: SharedWorld) {
    let ctx = lock(&world);
    let failure = ctx
        .service
        .visible_failure(Field::Cp)
        .expect("postal code failure");
    assert_eq!(failure.code(), ValidationCode::InvalidPostalCode);
    assert_eq!(failure.message(), "Code postal francais invalide");
}

#[then("the birth date shows the underage failure")]
fn the_birth_date_shows_the_underage_failure(world: SharedWorld) {
    let ctx = lock(&world);
    let failure = ctx
        .service
        .visible_failure(Field::DateNaissance)
        .expect("underage failure");
    assert_eq!(failure.code(), ValidationCode::Underage);
    assert_eq!(failure.message(), "L'utilisateur doit avoir au moins 18 ans");
}

#[then("the email shows the duplicate failure")]
fn the_email_shows_the_duplicate_failure(world: SharedWorld) {
    let ctx = lock(&world);
    let failure = ctx
        .service
        .visible_failure(Field::Email)
        .expect("duplicate failure");
    assert_eq!(failure.code(), ValidationCode::DuplicateEmail);
    assert_eq!(failure.message(), "Cet email est deja utilise");
}

#[then("the email shows no failure")]
fn the_email_shows_no_failure(world: SharedWorld) {
    let ctx = lock(&world);
    assert!(ctx.service.visible_failure(Field::Email).is_none());
}

#[then("the back end's wording shows")]
fn the_back_ends_wording_shows(world: SharedWorld) {
    let ctx = lock(&world);
    assert_eq!(
        ctx.service.notice().map(Notice::message),
        Some("email deja connu")
    );
}

#[then("the unavailability notice shows")]
fn the_unavailability_notice_shows(world: SharedWorld) {
    let ctx = lock(&world);
    assert_eq!(
        ctx.service.notice().map(Notice::message),
        Some("Serveur indisponible, veuillez réessayer plus tard.")
    );
}

#[then("the generic failure notice shows")]
fn the_generic_failure_notice_shows(world: SharedWorld) {
    let ctx = lock(&world);
    assert_eq!(
        ctx.service.notice().map(Notice::message),
        Some("Erreur lors de l'inscription")
    );
}

#[then("no notice shows")]
fn no_notice_shows(world: SharedWorld) {
    let ctx = lock(&world);
    assert!(ctx.service.notice().is_none());
}

#[then("the draft is kept for another try")]
fn the_draft_is_kept_for_another_try(world: SharedWorld) {
    let ctx = lock(&world);
    assert_eq!(
        ctx.service.form().draft().value(Field::Email),
        &json!("julie.martin@example.com")
    );
}

#[rstest]
fn a_new_visitor_registers(world: SharedWorld) {
    an_empty_registration_roster(world.clone());
    the_visitor_fills_in_valid_details(world.clone());
    the_visitor_submits_the_form(world.clone());
    the_submission_is_accepted(world.clone());
    the_stored_registration_matches_the_details(world.clone());
    the_success_notice_shows(world.clone());
    the_form_is_blank_again(world);
}

#[rstest]
fn markup_in_a_name_is_rejected_until_corrected(world: SharedWorld) {
    the_visitor_fills_in_valid_details(world.clone());
    the_visitor_enters_markup_in_the_first_name(world.clone());
    the_first_name_shows_the_markup_failure(world.clone());
    the_visitor_submits_the_form(world.clone());
    the_submission_is_rejected_before_reaching_the_back_end(world.clone());
    the_visitor_corrects_the_first_name(world.clone());
    the_first_name_shows_no_failure(world.clone());
    the_visitor_submits_the_form(world.clone());
    the_submission_is_accepted(world);
}

#[rstest]
fn a_short_postal_code_blocks_submission(world: SharedWorld) {
    the_visitor_fills_in_valid_details(world.clone());
    the_visitor_enters_a_three_digit_postal_code(world.clone());
    the_postal_code_shows_the_format_failure(world.clone());
    the_visitor_submits_the_form(world.clone());
    the_submission_is_rejected_before_reaching_the_back_end(world);
}

#[rstest]
fn seventeen_is_too_young_and_eighteen_passes(world: SharedWorld) {
    the_visitor_fills_in_valid_details(world.clone());
    the_visitor_enters_a_birth_date_seventeen_years_ago(world.clone());
    the_birth_date_shows_the_underage_failure(world.clone());
    the_visitor_submits_the_form(world.clone());
    the_submission_is_rejected_before_reaching_the_back_end(world.clone());
    the_visitor_enters_a_birth_date_exactly_eighteen_years_ago(world.clone());
    the_visitor_submits_the_form(world.clone());
    the_submission_is_accepted(world);
}

#[rstest]
fn a_stored_email_cannot_register_twice(world: SharedWorld) {
    a_roster_holding_an_earlier_registration(world.clone());
    the_visitor_fills_in_valid_details(world.clone());
    the_visitor_reuses_the_stored_email(world.clone());
    the_email_shows_the_duplicate_failure(world.clone());
    the_visitor_submits_the_form(world.clone());
    the_submission_is_rejected_before_reaching_the_back_end(world.clone());
    the_visitor_picks_a_fresh_email(world.clone());
    the_email_shows_no_failure(world.clone());
    the_visitor_submits_the_form(world.clone());
    the_submission_is_accepted(world);
}

#[rstest]
fn backend_wording_is_surfaced_verbatim(world: SharedWorld) {
    the_back_end_rejects_submissions_with_its_own_wording(world.clone());
    the_visitor_fills_in_valid_details(world.clone());
    the_visitor_submits_the_form(world.clone());
    the_submission_fails(world.clone());
    the_back_ends_wording_shows(world.clone());
    the_draft_is_kept_for_another_try(world);
}

#[rstest]
fn an_outage_raises_the_unavailability_notice(world: SharedWorld) {
    the_back_end_is_down(world.clone());
    the_visitor_fills_in_valid_details(world.clone());
    the_visitor_submits_the_form(world.clone());
    the_submission_fails(world.clone());
    the_unavailability_notice_shows(world.clone());
    the_visitor_starts_a_new_registration(world.clone());
    no_notice_shows(world);
}

#[rstest]
fn an_unreachable_back_end_falls_back_to_the_generic_notice(world: SharedWorld) {
    the_back_end_is_unreachable(world.clone());
    the_visitor_fills_in_valid_details(world.clone());
    the_visitor_submits_the_form(world.clone());
    the_submission_fails(world.clone());
    the_generic_failure_notice_shows(world);
}
