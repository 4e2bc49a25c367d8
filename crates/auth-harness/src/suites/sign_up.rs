//! Sign-up suite
//!
//! Table-driven validation of the registration form: the two-word full-name
//! rule, password-confirmation matching, required-field gating of the submit
//! control, and the registration round-trip (fresh email succeeds, the same
//! email a second time does not).

use regex::Regex;
use std::sync::OnceLock;

use crate::config::Config;
use crate::form::{fill_form, ClickOutcome, ExpectedOutcome, FieldLocator, FormCase};
use crate::page::WaitCondition;
use crate::report::{expect, expect_true, CaseStatus, Phase};
use crate::suite::Suite;

/// Run the whole suite, strictly in order
pub async fn run(suite: &Suite) {
    full_name_requires_two_words(suite).await;
    password_confirmation_must_match(suite).await;
    email_format_and_uniqueness(suite).await;
    submit_gated_on_required_fields(suite).await;
    successful_registration_shows_toast(suite).await;
}

/// Standard email shape; anything failing this never reaches the form
fn email_format_is_valid(email: &str) -> bool {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN
        .get_or_init(|| {
            Regex::new(r"^[A-Za-z0-9_.+-]+@[A-Za-z0-9-]+\.[A-Za-z0-9-.]+$")
                .expect("email pattern is valid")
        })
        .is_match(email)
}

/// A unique address per run, so the round-trip case always starts unregistered
fn fresh_email() -> String {
    format!("qa.signup.{}@prueba.com", chrono::Utc::now().timestamp_millis())
}

fn registration_fields(email: &str) -> Vec<(String, String)> {
    vec![
        ("full_name".to_string(), "Nombre Apellido".to_string()),
        ("email".to_string(), email.to_string()),
        ("password".to_string(), "Password1!".to_string()),
        ("confirm_password".to_string(), "Password1!".to_string()),
    ]
}

fn success_toast(config: &Config) -> WaitCondition {
    WaitCondition::ElementTextIs {
        locator: FieldLocator::Css {
            css: config.validation.success_message_selector.clone(),
        },
        text: config.validation.success_text.clone(),
    }
}

async fn full_name_requires_two_words(suite: &Suite) {
    let table = [
        ("Nombre", false),
        ("Nombre Apellido", true),
        (" ", false),
        ("Nombre A", true),
    ];

    for (input, valid) in table {
        let form_case = FormCase::new(
            &format!("sign-up: full name '{}' is {}", input, if valid { "accepted" } else { "rejected" }),
            &[("full_name", input)],
            ExpectedOutcome::FieldValid {
                field: "full_name".to_string(),
                valid,
            },
        );
        suite
            .run_form_case(&suite.config.app.sign_up_url, &suite.config.pages.sign_up, &form_case)
            .await;
    }
}

async fn password_confirmation_must_match(suite: &Suite) {
    let mismatch_text = suite.config.validation.mismatch_error_text.clone();
    let table = [
        ("password123", "password321", true),
        ("Password1!", "Password1!", false),
        ("abc123", "abc124", true),
    ];

    for (password, confirm, error_shown) in table {
        let form_case = FormCase::new(
            &format!(
                "sign-up: passwords '{}' / '{}' {}",
                password,
                confirm,
                if error_shown { "show the mismatch error" } else { "show no mismatch error" }
            ),
            &[("password", password), ("confirm_password", confirm)],
            ExpectedOutcome::ErrorShown {
                text: mismatch_text.clone(),
                shown: error_shown,
            },
        );
        suite
            .run_form_case(&suite.config.app.sign_up_url, &suite.config.pages.sign_up, &form_case)
            .await;
    }
}

async fn email_format_and_uniqueness(suite: &Suite) -> CaseStatus {
    let case = suite.case("sign-up: unique email registers once, not twice");
    let cfg = &suite.config;
    let result = async {
        let email = fresh_email();
        expect_true(
            email_format_is_valid(&email),
            "generated email has a standard format",
        )?;
        expect_true(
            !email_format_is_valid("correo_invalido@com"),
            "malformed email fails the format check",
        )?;

        // First registration with the fresh address must be acknowledged.
        let tab = suite.session.open(&cfg.app.sign_up_url).await?;
        case.phase(Phase::Navigated);
        fill_form(&tab, &cfg.pages.sign_up, &registration_fields(&email)).await?;
        case.phase(Phase::FormPopulated);

        let outcome = tab.submit(&cfg.pages.sign_up).await?;
        case.phase(Phase::Submitted);
        expect_true(
            !outcome.was_rejected(),
            "registration submit accepted the click",
        )?;
        tab.wait_until_default(&success_toast(cfg)).await?;
        case.step("first registration acknowledged");

        // The same address a second time must NOT be acknowledged. The
        // application's duplicate-email error signal is undefined, so the
        // assertion is the absence of the success toast, nothing more.
        let tab = suite.session.open(&cfg.app.sign_up_url).await?;
        fill_form(&tab, &cfg.pages.sign_up, &registration_fields(&email)).await?;
        let outcome = tab.submit(&cfg.pages.sign_up).await?;
        case.phase(Phase::Asserted);

        match outcome {
            ClickOutcome::Rejected(reason) => {
                case.step(&format!("duplicate registration rejected at the control: {}", reason));
                Ok(())
            }
            ClickOutcome::Clicked => {
                let absent = tab.confirm_absent(&success_toast(cfg)).await?;
                expect_true(absent, "success toast does not reappear for a duplicate email")
            }
        }
    }
    .await;
    case.conclude(result)
}

async fn submit_gated_on_required_fields(suite: &Suite) {
    let table: [(&str, [(&str, &str); 4], bool); 5] = [
        (
            "sign-up: single-word name keeps submit disabled",
            [
                ("full_name", "Nombre"),
                ("email", "correo_valido@prueba.com"),
                ("password", "Password1!"),
                ("confirm_password", "Password1!"),
            ],
            false,
        ),
        (
            "sign-up: missing email keeps submit disabled",
            [
                ("full_name", "Nombre Apellido"),
                ("email", " "),
                ("password", "Password1!"),
                ("confirm_password", "Password1!"),
            ],
            false,
        ),
        (
            "sign-up: mismatched passwords keep submit disabled",
            [
                ("full_name", "Nombre Apellido"),
                ("email", "correo_valido@prueba.com"),
                ("password", "Password1!"),
                ("confirm_password", "Password123"),
            ],
            false,
        ),
        (
            "sign-up: weak password keeps submit disabled",
            [
                ("full_name", "Nombre Apellido"),
                ("email", "correo_valido@prueba.com"),
                ("password", "pass"),
                ("confirm_password", "pass"),
            ],
            false,
        ),
        (
            "sign-up: complete valid form enables submit",
            [
                ("full_name", "Nombre Apellido"),
                ("email", "correo_valido@prueba.com"),
                ("password", "Password1!"),
                ("confirm_password", "Password1!"),
            ],
            true,
        ),
    ];

    for (description, fields, enabled) in table {
        let form_case = FormCase::new(description, &fields, ExpectedOutcome::SubmitEnabled(enabled));
        suite
            .run_form_case(&suite.config.app.sign_up_url, &suite.config.pages.sign_up, &form_case)
            .await;
    }
}

async fn successful_registration_shows_toast(suite: &Suite) -> CaseStatus {
    let case = suite.case("sign-up: valid registration shows the success toast");
    let cfg = &suite.config;
    let result = async {
        let tab = suite.session.open(&cfg.app.sign_up_url).await?;
        case.phase(Phase::Navigated);

        fill_form(&tab, &cfg.pages.sign_up, &registration_fields(&fresh_email())).await?;
        case.phase(Phase::FormPopulated);

        let outcome = tab.submit(&cfg.pages.sign_up).await?;
        case.phase(Phase::Submitted);
        expect_true(
            !outcome.was_rejected(),
            "registration submit accepted the click",
        )?;

        let toast_locator = FieldLocator::Css {
            css: cfg.validation.success_message_selector.clone(),
        };
        tab.wait_until_default(&WaitCondition::ElementVisible(toast_locator.clone()))
            .await?;
        let toast = tab.locate(&toast_locator).await?;
        let state = toast.read_state().await?;
        case.phase(Phase::Asserted);
        expect(
            state.text.as_str(),
            cfg.validation.success_text.as_str(),
            "success toast text",
        )
    }
    .await;
    case.conclude(result)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_email_format_check() {
        assert!(email_format_is_valid("correo_valido@prueba.com"));
        assert!(email_format_is_valid("user.name+tag@example.co"));
        assert!(!email_format_is_valid("correo_invalido@com"));
        assert!(!email_format_is_valid("sin-arroba.com"));
        assert!(!email_format_is_valid("user@"));
    }

    #[test]
    fn test_fresh_emails_are_unique_and_well_formed() {
        let a = fresh_email();
        assert!(email_format_is_valid(&a));
        std::thread::sleep(std::time::Duration::from_millis(2));
        let b = fresh_email();
        assert_ne!(a, b);
    }

    #[test]
    fn test_registration_fields_cover_the_form() {
        let fields = registration_fields("x@y.com");
        let names: Vec<&str> = fields.iter().map(|(n, _)| n.as_str()).collect();
        assert_eq!(
            names,
            vec!["full_name", "email", "password", "confirm_password"]
        );
    }
}
