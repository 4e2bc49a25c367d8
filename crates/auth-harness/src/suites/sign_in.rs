//! Sign-in suite
//!
//! Five cases against the sign-in page: incomplete-form rejection, element
//! presence, successful authentication, user-name display, and logout. Each
//! case opens a fresh tab so no state bleeds between cases.

use crate::error::HarnessResult;
use crate::form::{fill_form, ClickOutcome};
use crate::page::{Tab, WaitCondition};
use crate::report::{expect, expect_true, Case, CaseStatus, Phase};
use crate::suite::Suite;

/// Run the whole suite, strictly in order
pub async fn run(suite: &Suite) {
    incomplete_form_does_not_submit(suite).await;
    form_elements_are_present(suite).await;
    successful_login_redirects_to_panel(suite).await;
    user_name_is_displayed_after_login(suite).await;
    logout_returns_to_sign_in(suite).await;
}

/// Fill the credentials and submit; shared by every authenticated case
async fn sign_in(suite: &Suite, case: &Case<'_>, tab: &Tab) -> HarnessResult<()> {
    let cfg = &suite.config;
    fill_form(
        tab,
        &cfg.pages.sign_in,
        &[
            ("email".to_string(), cfg.credentials.email.clone()),
            ("password".to_string(), cfg.credentials.password.clone()),
        ],
    )
    .await?;
    case.phase(Phase::FormPopulated);

    let outcome = tab.submit(&cfg.pages.sign_in).await?;
    case.phase(Phase::Submitted);
    expect_true(
        !outcome.was_rejected(),
        "sign-in submit accepted the click",
    )
}

async fn incomplete_form_does_not_submit(suite: &Suite) -> CaseStatus {
    let case = suite.case("sign-in: incomplete form does not submit");
    let cfg = &suite.config;
    let result = async {
        let tab = suite.session.open(&cfg.app.sign_in_url).await?;
        case.phase(Phase::Navigated);

        let email = tab.locate(cfg.pages.sign_in.field("email")?).await?;
        email.clear().await?;
        email.type_text("CorreoPrueba@prueba.com").await?;
        case.phase(Phase::FormPopulated);

        let outcome = tab.submit(&cfg.pages.sign_in).await?;
        case.phase(Phase::Submitted);

        match outcome {
            // A submit control that refuses the click is itself the expected
            // negative outcome.
            ClickOutcome::Rejected(reason) => {
                case.step(&format!("submit rejected the click: {}", reason));
                case.phase(Phase::Asserted);
                Ok(())
            }
            ClickOutcome::Clicked => {
                let stayed = tab
                    .confirm_absent(&WaitCondition::UrlContains(
                        cfg.app.panel_url_fragment.clone(),
                    ))
                    .await?;
                case.phase(Phase::Asserted);
                expect_true(stayed, "no redirect happened after incomplete submission")?;
                let url = tab.current_url().await?;
                expect(
                    url.as_str(),
                    cfg.app.sign_in_url.as_str(),
                    "still on the sign-in page",
                )
            }
        }
    }
    .await;
    case.conclude(result)
}

async fn form_elements_are_present(suite: &Suite) -> CaseStatus {
    let case = suite.case("sign-in: form elements are present and displayed");
    let cfg = &suite.config;
    let result = async {
        let tab = suite.session.open(&cfg.app.sign_in_url).await?;
        case.phase(Phase::Navigated);

        for name in ["email", "password"] {
            let handle = tab.locate(cfg.pages.sign_in.field(name)?).await?;
            let state = handle.read_state().await?;
            expect_true(state.is_displayed, &format!("{} field is displayed", name))?;
            case.step(&format!("{} field located and displayed", name));
        }

        let submit = tab.locate(&cfg.pages.sign_in.submit).await?;
        let state = submit.read_state().await?;
        case.phase(Phase::Asserted);
        expect_true(state.is_displayed, "submit control is displayed")
    }
    .await;
    case.conclude(result)
}

async fn successful_login_redirects_to_panel(suite: &Suite) -> CaseStatus {
    let case = suite.case("sign-in: valid credentials redirect to the panel");
    let cfg = &suite.config;
    let result = async {
        let tab = suite.session.open(&cfg.app.sign_in_url).await?;
        case.phase(Phase::Navigated);

        sign_in(suite, &case, &tab).await?;

        tab.wait_until_default(&WaitCondition::ElementLocated(
            cfg.pages.panel.user_name.clone(),
        ))
        .await?;
        let url = tab.current_url().await?;
        case.phase(Phase::Asserted);
        expect_true(
            url.contains(&cfg.app.panel_url_fragment),
            "redirected to the authenticated panel",
        )
    }
    .await;
    case.conclude(result)
}

async fn user_name_is_displayed_after_login(suite: &Suite) -> CaseStatus {
    let case = suite.case("sign-in: user name is shown after login");
    let cfg = &suite.config;
    let result = async {
        let tab = suite.session.open(&cfg.app.sign_in_url).await?;
        case.phase(Phase::Navigated);

        sign_in(suite, &case, &tab).await?;

        tab.wait_until_default(&WaitCondition::ElementVisible(
            cfg.pages.panel.user_name.clone(),
        ))
        .await?;
        let handle = tab.locate(&cfg.pages.panel.user_name).await?;
        let state = handle.read_state().await?;
        case.phase(Phase::Asserted);
        expect_true(!state.text.is_empty(), "user name element is not empty")
    }
    .await;
    case.conclude(result)
}

async fn logout_returns_to_sign_in(suite: &Suite) -> CaseStatus {
    let case = suite.case("sign-in: logout returns to the sign-in page");
    let cfg = &suite.config;
    let result = async {
        let tab = suite.session.open(&cfg.app.sign_in_url).await?;
        case.phase(Phase::Navigated);

        sign_in(suite, &case, &tab).await?;

        tab.wait_until_default(&WaitCondition::ElementVisible(
            cfg.pages.panel.user_name.clone(),
        ))
        .await?;

        let menu = tab.locate(&cfg.pages.panel.profile_menu).await?;
        expect_true(
            !menu.click().await?.was_rejected(),
            "profile menu accepted the click",
        )?;
        case.step("profile menu opened");

        // The dropdown animates open; wait for the link itself instead of a
        // fixed pause.
        tab.wait_until_default(&WaitCondition::ElementVisible(
            cfg.pages.panel.logout_link.clone(),
        ))
        .await?;

        let logout = tab.locate(&cfg.pages.panel.logout_link).await?;
        expect_true(
            !logout.click().await?.was_rejected(),
            "logout link accepted the click",
        )?;

        tab.wait_until_default(&WaitCondition::UrlIs(cfg.app.sign_in_url.clone()))
            .await?;
        let url = tab.current_url().await?;
        case.phase(Phase::Asserted);
        expect(
            url.as_str(),
            cfg.app.sign_in_url.as_str(),
            "returned exactly to the sign-in page",
        )
    }
    .await;
    case.conclude(result)
}
