//! The practice-form scenario: logical fields, their ranked fallback
//! locators, and the values each run fills in.
//!
//! Markup on the practice page varies between deployments (ids, names,
//! placeholders), which is why every field carries more than one candidate.

use formcheck_engine::locator::{Expected, Locator, LogicalField};
use formcheck_engine::runner::Scenario;

pub const DEFAULT_FORM_URL: &str = "https://app.cloudqa.io/home/AutomationPracticeForm";

pub fn practice_form_scenario(url: impl Into<String>) -> Scenario {
    Scenario {
        url: url.into(),
        ready_anchor: LogicalField::new(
            "First Name field",
            vec![Locator::id("fname")],
            Expected::Present,
        ),
        main_fields: vec![
            LogicalField::new(
                "First Name",
                vec![
                    Locator::id("fname"),
                    Locator::name("firstname"),
                    Locator::css("input[placeholder*='first name' i]"),
                ],
                Expected::Text("Jane".into()),
            ),
            LogicalField::new(
                "Last Name",
                vec![
                    Locator::id("lname"),
                    Locator::name("lastname"),
                    Locator::css("input[placeholder*='last name' i]"),
                ],
                Expected::Text("Doe".into()),
            ),
            LogicalField::new(
                "Male radio",
                vec![
                    Locator::xpath("//input[@type='radio' and (@value='Male' or @id='male')]"),
                    Locator::xpath("//label[normalize-space(text())='Male']/input[@type='radio']"),
                ],
                Expected::RadioSelected,
            ),
            LogicalField::new(
                "Email",
                vec![
                    Locator::id("email"),
                    Locator::name("email"),
                    Locator::css("input[type='email']"),
                ],
                Expected::Text("jane.doe@example.com".into()),
            ),
        ],
        frame_probe: Locator::css("input[type='checkbox']"),
        frame_fields: vec![LogicalField::new(
            "Cricket checkbox",
            vec![
                Locator::xpath("//input[@type='checkbox' and (@value='Cricket' or @id='cricket')]"),
                Locator::xpath("//label[contains(text(), 'Cricket')]/input[@type='checkbox']"),
            ],
            Expected::CheckboxSelected,
        )],
        shadow_fields: vec![LogicalField::new(
            "About Yourself",
            vec![
                Locator::css("[data-shadow-host]"),
                Locator::css("[class*='shadow']"),
                Locator::id("shadow-host"),
            ],
            Expected::ShadowText("Engineer, tinkerer and occasional gardener.".into()),
        )],
    }
}
