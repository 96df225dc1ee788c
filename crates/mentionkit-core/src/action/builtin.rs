//! Built-in actions fired by the demo chat widgets.

use serde_json::Value;

use mentionkit_types::action::ActionEffect;

use super::handler::ActionHandler;

const COLOR_SCHEMES: &[&str] = &["light", "dark"];
const RADII: &[&str] = &["pill", "round", "soft", "sharp"];
const DENSITIES: &[&str] = &["compact", "normal", "spacious"];
const BASE_FONT_SIZES: std::ops::RangeInclusive<u64> = 14..=18;

/// Applies a theme proposal: validates the theme and hands it back to the UI
/// as an `update_ui_theme` effect.
#[derive(Debug, Clone, Copy, Default)]
pub struct ApplyThemeHandler;

impl ActionHandler for ApplyThemeHandler {
    fn apply(&self, payload: &Value) -> Result<ActionEffect, String> {
        validate_theme(payload)?;
        Ok(ActionEffect::new("update_ui_theme", payload.clone())
            .with_progress("Applying new styles...")
            .with_reply("Theme updated successfully!"))
    }
}

fn validate_theme(payload: &Value) -> Result<(), String> {
    let theme = payload
        .as_object()
        .ok_or_else(|| "theme payload must be an object".to_string())?;

    match theme.get("colorScheme").and_then(Value::as_str) {
        Some(scheme) => one_of("colorScheme", scheme, COLOR_SCHEMES)?,
        None => return Err("theme payload is missing 'colorScheme'".to_string()),
    }

    if let Some(radius) = theme.get("radius") {
        one_of("radius", radius.as_str().unwrap_or_default(), RADII)?;
    }

    if let Some(density) = theme.get("density") {
        one_of("density", density.as_str().unwrap_or_default(), DENSITIES)?;
    }

    if let Some(accent) = payload.pointer("/color/accent/primary") {
        let accent = accent.as_str().unwrap_or_default();
        if !is_hex_color(accent) {
            return Err(format!("accent color '{accent}' is not a hex color"));
        }
    }

    if let Some(size) = payload.pointer("/typography/baseSize") {
        match size.as_u64() {
            Some(size) if BASE_FONT_SIZES.contains(&size) => {}
            _ => {
                return Err(format!(
                    "base font size {size} is outside {}..={}",
                    BASE_FONT_SIZES.start(),
                    BASE_FONT_SIZES.end()
                ));
            }
        }
    }

    Ok(())
}

fn one_of(field: &str, value: &str, allowed: &[&str]) -> Result<(), String> {
    if allowed.contains(&value) {
        Ok(())
    } else {
        Err(format!(
            "invalid {field} '{value}', expected one of: {}",
            allowed.join(", ")
        ))
    }
}

/// `#rgb` or `#rrggbb`.
fn is_hex_color(s: &str) -> bool {
    s.strip_prefix('#').is_some_and(|hex| {
        matches!(hex.len(), 3 | 6) && hex.chars().all(|c| c.is_ascii_hexdigit())
    })
}

/// Acknowledges a submitted feedback form.
#[derive(Debug, Clone, Copy, Default)]
pub struct SubmitFeedbackHandler;

impl ActionHandler for SubmitFeedbackHandler {
    fn apply(&self, payload: &Value) -> Result<ActionEffect, String> {
        if !payload.is_object() {
            return Err("feedback payload must be an object".to_string());
        }
        Ok(ActionEffect::new("feedback_received", payload.clone())
            .with_reply("Feedback received. Thank you!"))
    }
}

/// Requests a CSV export of a regional sales report.
#[derive(Debug, Clone, Copy, Default)]
pub struct DownloadReportHandler;

impl ActionHandler for DownloadReportHandler {
    fn apply(&self, payload: &Value) -> Result<ActionEffect, String> {
        let region = payload
            .get("region")
            .and_then(Value::as_str)
            .map(str::trim)
            .filter(|r| !r.is_empty())
            .ok_or_else(|| "report payload requires a non-empty 'region'".to_string())?;

        Ok(ActionEffect::new(
            "download_report",
            serde_json::json!({ "region": region, "format": "csv" }),
        )
        .with_progress(format!("Preparing {region} report...")))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn theme_minimal_payload_is_valid() {
        let effect = ApplyThemeHandler.apply(&json!({"colorScheme": "light"})).unwrap();
        assert_eq!(effect.name, "update_ui_theme");
        assert_eq!(effect.progress.as_deref(), Some("Applying new styles..."));
        assert_eq!(effect.reply.as_deref(), Some("Theme updated successfully!"));
    }

    #[test]
    fn theme_requires_object_and_scheme() {
        assert!(ApplyThemeHandler.apply(&json!("dark")).is_err());
        let err = ApplyThemeHandler.apply(&json!({"radius": "pill"})).unwrap_err();
        assert!(err.contains("colorScheme"));
    }

    #[test]
    fn theme_rejects_out_of_set_values() {
        for payload in [
            json!({"colorScheme": "sepia"}),
            json!({"colorScheme": "dark", "radius": "square"}),
            json!({"colorScheme": "dark", "density": 3}),
            json!({"colorScheme": "dark", "color": {"accent": {"primary": "blue"}}}),
            json!({"colorScheme": "dark", "typography": {"baseSize": 22}}),
        ] {
            assert!(ApplyThemeHandler.apply(&payload).is_err(), "{payload}");
        }
    }

    #[test]
    fn hex_colors() {
        assert!(is_hex_color("#fff"));
        assert!(is_hex_color("#31A3F8"));
        assert!(!is_hex_color("31A3F8"));
        assert!(!is_hex_color("#31A3F"));
        assert!(!is_hex_color("#ggg"));
    }

    #[test]
    fn feedback_acknowledged() {
        let effect = SubmitFeedbackHandler
            .apply(&json!({"rating": 5, "comment": "great"}))
            .unwrap();
        assert_eq!(effect.name, "feedback_received");
        assert_eq!(effect.reply.as_deref(), Some("Feedback received. Thank you!"));
        assert!(SubmitFeedbackHandler.apply(&json!(null)).is_err());
    }

    #[test]
    fn report_requires_region() {
        let effect = DownloadReportHandler.apply(&json!({"region": "EMEA"})).unwrap();
        assert_eq!(effect.data, json!({"region": "EMEA", "format": "csv"}));
        assert!(DownloadReportHandler.apply(&json!({})).is_err());
        assert!(DownloadReportHandler.apply(&json!({"region": "  "})).is_err());
    }
}
