//! HTML page rendering for the review form.
//!
//! Pages are rendered with plain `format!` templates. All dataset text and
//! user-supplied values are escaped before they reach the page.

use html_escape::{encode_double_quoted_attribute, encode_text};

use crate::catalog::{self, UNKNOWN_BADGE_HEX, UNKNOWN_CATEGORY_HEX};
use crate::record::{ImpactLevel, NotamText, UserRow};
use crate::store::Progress;

/// Shared page shell.
fn page(title: &str, body: &str) -> String {
    format!(
        r#"<!DOCTYPE html>
<html lang="en">
<head>
<meta charset="utf-8">
<title>{title}</title>
<style>
  body {{ font-family: sans-serif; margin: 24px auto; max-width: 1100px; color: #000; }}
  .context {{ background-color: #eef5ff; padding: 12px; border-radius: 8px;
              border: 1px solid #cce; font-size: 16px; line-height: 1.5; }}
  .notam {{ background-color: #f9f9f9; padding: 18px 14px 22px 14px; border-radius: 10px;
            border: 1px solid #ddd; font-family: monospace; font-size: 18px;
            line-height: 1.7; white-space: pre-wrap; word-wrap: break-word; }}
  .badge {{ color: #fff; padding: 4px 10px; border-radius: 10px; font-weight: bold; }}
  .category-box {{ border: 1px solid #ccc; border-radius: 10px; overflow: hidden; margin-top: 12px; }}
  .category-head {{ color: #fff; padding: 14px 18px; font-weight: bold; font-size: 22px; }}
  .category-body {{ padding: 20px; font-size: 17px; line-height: 1.8; background-color: #fafafa; }}
  .impacts {{ margin: 12px 0; padding: 12px 8px 20px 8px; border: 1px solid #ddd;
              border-radius: 8px; background-color: #fdfdfd; font-size: 16px; }}
  .progress-outer {{ background: #eee; border-radius: 6px; height: 12px; margin: 8px 0; }}
  .progress-inner {{ background: #3498db; border-radius: 6px; height: 12px; }}
  .columns {{ display: flex; gap: 32px; }}
  .col-record {{ flex: 2; }}
  .col-form {{ flex: 1; }}
  .saved {{ background: #eafaf1; border: 1px solid #2ecc71; padding: 10px; border-radius: 8px; }}
  .error {{ background: #fdecea; border: 1px solid #e74c3c; padding: 10px; border-radius: 8px; }}
  label {{ font-weight: bold; }}
  textarea {{ width: 100%; }}
  .actions button {{ margin-right: 8px; padding: 6px 14px; }}
</style>
</head>
<body>
{body}
</body>
</html>"#
    )
}

/// Render a colored badge.
fn badge(text: &str, hex: &str) -> String {
    format!(
        r#"<span class="badge" style="background-color:{hex};">{}</span>"#,
        encode_text(text)
    )
}

/// Render an impact-level `<select>` with the given selection.
fn impact_select(name: &str, selected: ImpactLevel) -> String {
    let options: String = ImpactLevel::ALL
        .iter()
        .map(|level| {
            let marker = if *level == selected { " selected" } else { "" };
            format!(r#"<option value="{level}"{marker}>{level}</option>"#)
        })
        .collect();
    format!(r#"<select name="{name}">{options}</select>"#)
}

/// The login page, with an optional error banner.
#[must_use]
pub fn login_page(password_required: bool, error: Option<&str>) -> String {
    let error_html = error.map_or_else(String::new, |msg| {
        format!(r#"<p class="error">{}</p>"#, encode_text(msg))
    });
    let password_field = if password_required {
        r#"<p><label for="password">Access password</label><br>
<input type="password" id="password" name="password" required></p>"#
    } else {
        ""
    };
    let body = format!(
        r#"<h1>Synthetic NOTAM Review</h1>
{error_html}
<form method="post" action="/session">
{password_field}
<p><label for="username">Username (lowercase, no spaces)</label><br>
<input type="text" id="username" name="username" required></p>
<p><button type="submit">Start reviewing</button></p>
</form>"#
    );
    page("Synthetic NOTAM Review", &body)
}

/// The review form for one record.
#[must_use]
pub fn review_page(
    user: &str,
    index: usize,
    progress: Progress,
    row: &UserRow,
    saved: bool,
) -> String {
    let text = NotamText::parse(&row.e_line);
    let total = progress.total;
    let position = index + 1;
    let percent = (position * 100 / total.max(1)).min(100);

    let saved_html = if saved {
        r#"<p class="saved">Feedback saved. Click Next to continue.</p>"#
    } else {
        ""
    };

    let category_html = category_section(&row.tag_type);
    let impacts_html = impact_badges(row);
    let form_html = feedback_form(user, index, row);

    let body = format!(
        r#"<h1>Synthetic NOTAM Review</h1>
<div class="progress-outer"><div class="progress-inner" style="width:{percent}%;"></div></div>
<p>Record {position} of {total} for user: {user_esc}</p>
{saved_html}
<div class="columns">
<div class="col-record">
<h3>Context</h3>
<div class="context"><b>Purpose:</b> {purpose}<br><b>Topic:</b> {topic}</div>
<h3>NOTAM Text</h3>
<div class="notam">{notam}</div>
{category_html}
{impacts_html}
</div>
<div class="col-form">
{form_html}
</div>
</div>"#,
        user_esc = encode_text(user),
        purpose = encode_text(&text.purpose),
        topic = encode_text(&text.topic),
        notam = encode_text(&text.body),
    );
    page("Synthetic NOTAM Review", &body)
}

/// Category information box with color and relevance badges.
fn category_section(tag: &str) -> String {
    let Some(info) = catalog::lookup(tag) else {
        return format!(
            r#"<h3>Category Information</h3>
<p>{}</p>"#,
            badge(tag, UNKNOWN_CATEGORY_HEX)
        );
    };

    let color = info.color.hex();
    let relevance_badge = badge(info.relevance.as_str(), catalog::badge_hex(info.relevance));
    format!(
        r#"<h3>Category Information</h3>
<p>{name_badge} {relevance_badge}</p>
<div class="category-box">
<div class="category-head" style="background-color:{color};">{name}</div>
<div class="category-body">
<b>Relevance:</b> {relevance_badge}<br><br>
<b>Description:</b><br>{description}
</div>
</div>"#,
        name_badge = badge(info.name, color),
        name = encode_text(info.name),
        description = encode_text(info.description),
    )
}

/// Impact class badges for the record's own levels.
fn impact_badges(row: &UserRow) -> String {
    let class_badge = |value: &str| match value.parse::<ImpactLevel>() {
        Ok(level) => badge(level.as_str(), catalog::badge_hex(level)),
        Err(_) => badge(value, UNKNOWN_BADGE_HEX),
    };
    format!(
        r#"<div class="impacts">
<b>Impact Classes:</b><br>
<b>Medical emergency:</b> {med}<br>
<b>Technical issue:</b> {tech}<br>
<b>Land ASAP:</b> {land}
</div>"#,
        med = class_badge(&row.class_impact_med),
        tech = class_badge(&row.class_impact_tech),
        land = class_badge(&row.class_impact_land),
    )
}

/// The default selection for an impact dropdown: prior feedback, then the
/// record's own level.
fn impact_default(saved: &str, class_value: &str) -> ImpactLevel {
    UserRow::saved_impact(saved)
        .or_else(|| class_value.parse().ok())
        .unwrap_or(ImpactLevel::Low)
}

/// The feedback evaluation form, prefilled from prior feedback.
fn feedback_form(user: &str, index: usize, row: &UserRow) -> String {
    let style_agrees = row.style_agrees().unwrap_or(true);
    let category_correct = row.category_correct().unwrap_or(true);
    let realism_high = row.realism_high().unwrap_or(true);

    let checked = |flag: bool| if flag { " checked" } else { "" };

    let corrected_options: String = catalog::category_names()
        .iter()
        .map(|name| {
            let marker = if row.fb_corrected_category == *name {
                " selected"
            } else {
                ""
            };
            let esc = encode_double_quoted_attribute(name);
            format!(r#"<option value="{esc}"{marker}>{}</option>"#, encode_text(name))
        })
        .collect();

    let prev_disabled = if index == 0 { " disabled" } else { "" };

    format!(
        r#"<h3>Feedback Evaluation</h3>
<form method="post" action="/review/{user_attr}">
<input type="hidden" name="index" value="{index}">
<p><label>ICAO style correct?</label><br>
<input type="radio" name="fb_style" value="2"{style_yes}> Agree
<input type="radio" name="fb_style" value="1"{style_no}> Disagree</p>
<p><label>Correct category?</label><br>
<input type="radio" name="correct_category" value="yes"{cat_yes}> Yes
<input type="radio" name="correct_category" value="no"{cat_no}> No</p>
<p><label for="fb_corrected_category">If not, select the correct category</label><br>
<select name="fb_corrected_category" id="fb_corrected_category">{corrected_options}</select></p>
<p><label>Operational realism?</label><br>
<input type="radio" name="fb_realism" value="2"{realism_yes}> High
<input type="radio" name="fb_realism" value="1"{realism_no}> Low</p>
<p><label>Perceived impact</label><br>
Medical emergency: {med_select}<br>
Technical issue: {tech_select}<br>
Land ASAP: {land_select}</p>
<p><label for="fb_notes">Notes (optional)</label><br>
<textarea name="fb_notes" id="fb_notes" rows="4" placeholder="Write a comment...">{notes}</textarea></p>
<div class="actions">
<button type="submit" name="action" value="prev"{prev_disabled}>Previous</button>
<button type="submit" name="action" value="save">Save feedback</button>
<button type="submit" name="action" value="next">Next</button>
<button type="submit" name="action" value="exit">Exit for today</button>
</div>
</form>"#,
        user_attr = encode_double_quoted_attribute(user),
        style_yes = checked(style_agrees),
        style_no = checked(!style_agrees),
        cat_yes = checked(category_correct),
        cat_no = checked(!category_correct),
        realism_yes = checked(realism_high),
        realism_no = checked(!realism_high),
        med_select = impact_select(
            "fb_impact_med",
            impact_default(&row.fb_impact_med, &row.class_impact_med)
        ),
        tech_select = impact_select(
            "fb_impact_tech",
            impact_default(&row.fb_impact_tech, &row.class_impact_tech)
        ),
        land_select = impact_select(
            "fb_impact_land",
            impact_default(&row.fb_impact_land, &row.class_impact_land)
        ),
        notes = encode_text(&row.fb_notes),
    )
}

/// Completion page shown when the cursor is past the last record.
#[must_use]
pub fn completion_page(user: &str, progress: Progress) -> String {
    let body = format!(
        r#"<h1>All records reviewed</h1>
<p>{user}, you have completed all {total} NOTAMs. Thank you!</p>
<p><a href="/">Back to login</a></p>"#,
        user = encode_text(user),
        total = progress.total,
    );
    page("All records reviewed", &body)
}

/// Goodbye page shown after "exit for today".
#[must_use]
pub fn goodbye_page(user: &str, index: usize) -> String {
    let body = format!(
        r#"<h1>Session saved</h1>
<p>{user}, your position (record {position}) has been stored. You can continue tomorrow.</p>
<p><a href="/">Back to login</a></p>"#,
        user = encode_text(user),
        position = index + 1,
    );
    page("Session saved", &body)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_row() -> UserRow {
        UserRow {
            e_line: "<Purpose>Briefing</Purpose> <Topic>Runway</Topic> RWY 09/27 CLSD".to_string(),
            tag_type: "RWY CLSD".to_string(),
            relevance_level: "Critical".to_string(),
            class_impact_med: "Low".to_string(),
            class_impact_tech: "Medium".to_string(),
            class_impact_land: "Critical".to_string(),
            ..UserRow::default()
        }
    }

    fn sample_progress() -> Progress {
        Progress {
            reviewed: 0,
            total: 10,
        }
    }

    #[test]
    fn test_login_page_with_password() {
        let html = login_page(true, None);
        assert!(html.contains(r#"name="password""#));
        assert!(html.contains(r#"name="username""#));
        assert!(!html.contains("class=\"error\""));
    }

    #[test]
    fn test_login_page_without_password() {
        let html = login_page(false, None);
        assert!(!html.contains(r#"name="password""#));
        assert!(html.contains(r#"name="username""#));
    }

    #[test]
    fn test_login_page_error_is_escaped() {
        let html = login_page(true, Some("<script>bad</script>"));
        assert!(!html.contains("<script>bad"));
        assert!(html.contains("&lt;script&gt;"));
    }

    #[test]
    fn test_review_page_contains_record() {
        let html = review_page("alice", 2, sample_progress(), &sample_row(), false);
        assert!(html.contains("Briefing"));
        assert!(html.contains("Runway"));
        assert!(html.contains("RWY 09/27 CLSD"));
        assert!(html.contains("Record 3 of 10"));
        assert!(html.contains("alice"));
        assert!(!html.contains("Feedback saved"));
    }

    #[test]
    fn test_review_page_saved_banner() {
        let html = review_page("alice", 0, sample_progress(), &sample_row(), true);
        assert!(html.contains("Feedback saved"));
    }

    #[test]
    fn test_review_page_category_box() {
        let html = review_page("alice", 0, sample_progress(), &sample_row(), false);
        assert!(html.contains("runway closure"));
        // RWY CLSD is red.
        assert!(html.contains("#e74c3c"));
    }

    #[test]
    fn test_review_page_unknown_category() {
        let mut row = sample_row();
        row.tag_type = "MYSTERY".to_string();
        let html = review_page("alice", 0, sample_progress(), &row, false);
        assert!(html.contains("MYSTERY"));
        assert!(html.contains(UNKNOWN_CATEGORY_HEX));
    }

    #[test]
    fn test_review_page_escapes_notam_text() {
        let mut row = sample_row();
        row.e_line = "<Purpose>P</Purpose> <Topic>T</Topic> <b>bold</b>".to_string();
        let html = review_page("alice", 0, sample_progress(), &row, false);
        assert!(!html.contains("<b>bold</b>"));
        assert!(html.contains("&lt;b&gt;bold&lt;/b&gt;"));
    }

    #[test]
    fn test_review_page_prefills_defaults_from_record() {
        let html = review_page("alice", 0, sample_progress(), &sample_row(), false);
        // Medical dropdown defaults to the record's Low level.
        let med_select = html
            .split(r#"name="fb_impact_med""#)
            .nth(1)
            .unwrap()
            .split("</select>")
            .next()
            .unwrap();
        assert!(med_select.contains(r#"<option value="Low" selected>"#));
    }

    #[test]
    fn test_review_page_prefills_prior_feedback() {
        let mut row = sample_row();
        row.fb_style = "1".to_string();
        row.fb_impact_med = "Critical".to_string();
        row.fb_notes = "prior note".to_string();
        row.fb_corrected_category = "TWY CLSD".to_string();

        let html = review_page("alice", 0, sample_progress(), &row, false);
        assert!(html.contains(r#"name="fb_style" value="1" checked"#));
        assert!(html.contains("prior note"));
        assert!(html.contains(r#"<option value="TWY CLSD" selected>"#));
        let med_select = html
            .split(r#"name="fb_impact_med""#)
            .nth(1)
            .unwrap()
            .split("</select>")
            .next()
            .unwrap();
        assert!(med_select.contains(r#"<option value="Critical" selected>"#));
    }

    #[test]
    fn test_review_page_prev_disabled_at_zero() {
        let html = review_page("alice", 0, sample_progress(), &sample_row(), false);
        assert!(html.contains(r#"value="prev" disabled"#));

        let html = review_page("alice", 1, sample_progress(), &sample_row(), false);
        assert!(!html.contains(r#"value="prev" disabled"#));
    }

    #[test]
    fn test_review_page_lists_all_categories() {
        let html = review_page("alice", 0, sample_progress(), &sample_row(), false);
        for name in catalog::category_names() {
            assert!(html.contains(name), "missing category option: {name}");
        }
    }

    #[test]
    fn test_completion_page() {
        let html = completion_page(
            "alice",
            Progress {
                reviewed: 10,
                total: 10,
            },
        );
        assert!(html.contains("alice"));
        assert!(html.contains("10"));
    }

    #[test]
    fn test_goodbye_page() {
        let html = goodbye_page("alice", 4);
        assert!(html.contains("alice"));
        assert!(html.contains("record 5"));
    }
}
