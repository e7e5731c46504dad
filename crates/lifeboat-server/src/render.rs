//! HTML rendering for the form page.
//!
//! The page has three parts: the form on the left, the result area on the
//! right, and an "About this app" sidebar with a random fact. All
//! user-supplied text goes through [`escape_html`].

use lifeboat_core::{FormInput, IncomeBracket, Sex, SurvivalReport, MAX_AGE, MIN_AGE};

/// Age preselected on an empty form.
pub const DEFAULT_AGE: u32 = 25;

const ABOUT_TEXT: &str = "This app uses a simple Machine Learning model trained on the \
classic Titanic dataset. It considers ticket class (as income bracket), gender and age, \
then predicts your chance of survival.";

const PLACEHOLDER_TEXT: &str =
    "Fill the details on the left and click 'Will I Survive?' to see your prediction.";

/// Values the form is pre-filled with.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FormState {
    pub name: String,
    pub sex: Sex,
    pub age: u32,
    pub income_bracket: IncomeBracket,
}

impl Default for FormState {
    fn default() -> Self {
        Self {
            name: String::new(),
            sex: Sex::Male,
            age: DEFAULT_AGE,
            income_bracket: IncomeBracket::Low,
        }
    }
}

impl From<&FormInput> for FormState {
    fn from(input: &FormInput) -> Self {
        Self {
            name: input.name.clone(),
            sex: input.sex,
            age: input.age.clamp(MIN_AGE, MAX_AGE),
            income_bracket: input.income_bracket,
        }
    }
}

/// What the result area shows.
#[derive(Debug, Clone)]
pub enum ResultPanel<'a> {
    Placeholder,
    Report(&'a SurvivalReport),
    Error(&'a str),
}

/// Escape text for use in HTML element content and attribute values.
pub fn escape_html(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(c),
        }
    }
    out
}

/// Render the full page.
pub fn render_page(form: &FormState, panel: &ResultPanel<'_>, fact: &str) -> String {
    let mut html = String::with_capacity(4096);
    html.push_str(
        "<!DOCTYPE html>\n<html lang=\"en\">\n<head>\n<meta charset=\"utf-8\">\n\
         <title>Titanic Survival Fun App</title>\n</head>\n<body>\n\
         <h1 style=\"text-align: center;\">Titanic Survival Predictor</h1>\n\
         <p style=\"text-align: center;\">Answer a few questions and see if <b>you</b> \
         might have survived the Titanic night...</p>\n<hr>\n",
    );

    html.push_str(&format!(
        "<aside class=\"sidebar\">\n<h2>About this app</h2>\n<p>{ABOUT_TEXT}</p>\n\
         <h3>Random Titanic Fact</h3>\n<p class=\"fact\">{}</p>\n</aside>\n",
        escape_html(fact)
    ));

    html.push_str("<main>\n");
    html.push_str(&render_form(form));
    html.push_str(&render_result(panel));
    html.push_str("</main>\n</body>\n</html>\n");
    html
}

fn render_form(form: &FormState) -> String {
    let mut html = format!(
        "<section class=\"form\">\n<h2>Fill your details</h2>\n\
         <form method=\"post\" action=\"/predict\">\n\
         <label>Your Name <input type=\"text\" name=\"name\" value=\"{}\" \
         placeholder=\"Enter your name (optional)\"></label>\n<fieldset><legend>Gender</legend>\n",
        escape_html(&form.name)
    );
    for sex in [Sex::Male, Sex::Female] {
        let value = sex.label().to_ascii_lowercase();
        let checked = if sex == form.sex { " checked" } else { "" };
        html.push_str(&format!(
            "<label><input type=\"radio\" name=\"sex\" value=\"{value}\"{checked}> {}</label>\n",
            sex.label()
        ));
    }
    html.push_str(&format!(
        "</fieldset>\n<label>Age <input type=\"range\" name=\"age\" min=\"{MIN_AGE}\" \
         max=\"{MAX_AGE}\" value=\"{}\"></label>\n\
         <label>Income Bracket (approx.) <select name=\"income_bracket\">\n",
        form.age
    ));
    for bracket in IncomeBracket::ALL {
        let selected = if bracket == form.income_bracket {
            " selected"
        } else {
            ""
        };
        html.push_str(&format!(
            "<option value=\"{}\"{selected}>{}</option>\n",
            bracket.value(),
            bracket.label()
        ));
    }
    html.push_str(
        "</select></label>\n<button type=\"submit\">Will I Survive?</button>\n\
         </form>\n</section>\n",
    );
    html
}

fn render_result(panel: &ResultPanel<'_>) -> String {
    let body = match panel {
        ResultPanel::Placeholder => format!("<p class=\"info\">{PLACEHOLDER_TEXT}</p>\n"),
        ResultPanel::Error(message) => {
            format!("<p class=\"error\">{}</p>\n", escape_html(message))
        }
        ResultPanel::Report(report) => render_report(report),
    };
    format!("<section class=\"result\">\n<h2>Result</h2>\n{body}</section>\n")
}

fn render_report(report: &SurvivalReport) -> String {
    let class = if report.survived { "success" } else { "error" };
    let mut html = format!(
        "<h3>Survival Chance Meter</h3>\n\
         <progress max=\"1\" value=\"{:.4}\"></progress>\n\
         <p><b>Estimated survival chance:</b> <code>{}</code></p>\n\
         <p class=\"{class}\">{}</p>\n<blockquote>{}</blockquote>\n",
        report.meter,
        report.chance_text,
        escape_html(&report.headline),
        escape_html(&report.narrative)
    );

    html.push_str(
        "<h3>Your Titanic Ticket Summary</h3>\n<table>\n\
         <tr><th>Field</th><th>Value</th></tr>\n",
    );
    for row in &report.ticket {
        html.push_str(&format!(
            "<tr><td>{}</td><td>{}</td></tr>\n",
            escape_html(&row.field),
            escape_html(&row.value)
        ));
    }
    html.push_str("</table>\n");
    html
}

#[cfg(test)]
mod tests {
    use super::*;
    use lifeboat_core::{PredictionResult, VerdictSource};

    #[test]
    fn test_escape_html() {
        assert_eq!(
            escape_html(r#"<script>alert("x")</script> & 'y'"#),
            "&lt;script&gt;alert(&quot;x&quot;)&lt;/script&gt; &amp; &#39;y&#39;"
        );
        assert_eq!(escape_html("Rose"), "Rose");
    }

    #[test]
    fn test_placeholder_page() {
        let html = render_page(&FormState::default(), &ResultPanel::Placeholder, "A fact.");
        assert!(html.contains("Will I Survive?"));
        assert!(html.contains(PLACEHOLDER_TEXT));
        assert!(html.contains("A fact."));
        assert!(html.contains("<option value=\"low\" selected>Low (3rd Class)</option>"));
        assert!(html.contains("value=\"male\" checked"));
    }

    #[test]
    fn test_report_page_escapes_name() {
        let input = FormInput::new("<b>Cal</b>", Sex::Male, 30, IncomeBracket::High);
        let result = PredictionResult {
            survived: false,
            probability: Some(0.25),
            verdict_source: VerdictSource::Model,
        };
        let report = SurvivalReport::build(&input, &result);
        let html = render_page(
            &FormState::from(&input),
            &ResultPanel::Report(&report),
            "fact",
        );
        assert!(!html.contains("<b>Cal</b>"));
        assert!(html.contains("&lt;b&gt;Cal&lt;/b&gt; would likely NOT SURVIVE the Titanic."));
        assert!(html.contains("<code>25.0%</code>"));
        assert!(html.contains("<option value=\"high\" selected>"));
    }

    #[test]
    fn test_error_panel() {
        let html = render_page(
            &FormState::default(),
            &ResultPanel::Error("Prediction error: boom <now>"),
            "fact",
        );
        assert!(html.contains("<p class=\"error\">Prediction error: boom &lt;now&gt;</p>"));
    }

    #[test]
    fn test_report_section_layout() {
        let input = FormInput::new("", Sex::Female, 22, IncomeBracket::Middle);
        let result = PredictionResult {
            survived: true,
            probability: Some(0.81234),
            verdict_source: VerdictSource::Model,
        };
        let report = SurvivalReport::build(&input, &result);
        let html = render_page(
            &FormState::from(&input),
            &ResultPanel::Report(&report),
            "fact",
        );

        let section = &html[html.find("<section class=\"result\">").unwrap()..];
        assert!(section.starts_with(
            "<section class=\"result\">\n<h2>Result</h2>\n<h3>Survival Chance Meter</h3>\n\
             <progress max=\"1\" value=\"0.8123\"></progress>\n"
        ));
        assert!(section.contains("<p class=\"success\">You would likely SURVIVE the Titanic.</p>\n"));
        assert_eq!(section.matches("<tr><td>").count(), report.ticket.len());
        assert!(section.ends_with("</table>\n</section>\n</main>\n</body>\n</html>\n"));
        assert!(html.contains("value=\"female\" checked> Female</label>\n"));
    }
}
