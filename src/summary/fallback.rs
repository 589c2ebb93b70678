//! Deterministic rule-based summary
//!
//! Used whenever the text-generation service is not configured or fails.

use crate::audit::Signals;
use crate::summary::{Lang, Summary, MAX_GOOD, MAX_ISSUES, STEP_COUNT};

const HTTPS_ENABLED: (&str, &str) = ("HTTPS enabled", "HTTPS käytössä");
const VIEWPORT_SET: (&str, &str) = ("Viewport set for mobile", "Mobiili-viewport löytyy");
const FAVICON_PRESENT: (&str, &str) = ("Favicon present", "Favicon asetettu");

const WEAK_TITLE_OR_DESCRIPTION: (&str, &str) = (
    "Missing/weak title or description",
    "Puuttuva tai heikko otsikko/kuvaus",
);
const MISSING_H1: (&str, &str) = ("Missing H1 heading", "Puuttuva H1-otsikko");

const STEPS: [(&str, &str); STEP_COUNT] = [
    (
        "Add a clear H1 and descriptive meta description.",
        "Lisää selkeä H1 ja kuvaava meta description.",
    ),
    (
        "Ensure mobile viewport and favicon.",
        "Varmista mobiili-viewport ja favicon.",
    ),
    (
        "Keep your homepage message concise.",
        "Pidä etusivun viesti ytimekkäänä.",
    ),
];

fn localized(lang: Lang, phrase: (&str, &str)) -> String {
    lang.pick(phrase.0, phrase.1).to_string()
}

/// Builds the fallback summary for the given signals
pub fn fallback_summary(lang: Lang, signals: &Signals) -> Summary {
    let mut good = Vec::new();
    if signals.has_https {
        good.push(localized(lang, HTTPS_ENABLED));
    }
    if signals.has_viewport_meta {
        good.push(localized(lang, VIEWPORT_SET));
    }
    if signals.favicon {
        good.push(localized(lang, FAVICON_PRESENT));
    }
    good.truncate(MAX_GOOD);

    let mut issues = Vec::new();
    if signals.title.is_none() || signals.meta_description.is_none() {
        issues.push(localized(lang, WEAK_TITLE_OR_DESCRIPTION));
    }
    if signals.h1.is_none() {
        issues.push(localized(lang, MISSING_H1));
    }
    issues.truncate(MAX_ISSUES);

    let steps = STEPS.iter().map(|step| localized(lang, *step)).collect();

    Summary {
        good,
        issues,
        steps,
    }
}
