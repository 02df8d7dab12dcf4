//! HTML email rendering.
//!
//! Two templates: the branded notification table sent to the internal
//! recipient for every form, and the welcome email sent to new newsletter
//! subscribers. Field values arrive already HTML-escaped from the sanitize
//! stage, so rows escape labels only; values get newline-to-`<br>` treatment
//! for multi-line message fields.

use chrono::Utc;
use formgate_core::sanitize::escape_html;

/// Site identity injected into every rendered email.
#[derive(Debug, Clone)]
pub struct Branding {
    pub company_name: String,
    pub logo_url: String,
    pub site_url: String,
}

const SUBMITTED_AT_FORMAT: &str = "%B %-d, %Y at %-I:%M %p";

/// Timestamp string used in notification rows and footers.
pub fn submitted_at() -> String {
    Utc::now().format(SUBMITTED_AT_FORMAT).to_string()
}

/// Render the internal notification email: branded header, a two-column
/// table of submission fields, and a footer with the submission time.
/// Rows with empty values are skipped.
pub fn render_notification(title: &str, rows: &[(String, String)], branding: &Branding) -> String {
    let mut table_rows = String::new();
    for (label, value) in rows {
        if value.is_empty() {
            continue;
        }
        table_rows.push_str(&format!(
            r#"<tr>
                <td style="padding: 12px; border-bottom: 1px solid #eee; font-weight: 600; color: #555; width: 200px;">{}:</td>
                <td style="padding: 12px; border-bottom: 1px solid #eee; color: #333;">{}</td>
            </tr>"#,
            escape_html(label),
            nl2br(value)
        ));
    }

    format!(
        r#"<!DOCTYPE html>
<html>
<head>
    <meta charset="UTF-8">
    <meta name="viewport" content="width=device-width, initial-scale=1.0">
</head>
<body style="margin: 0; padding: 20px; font-family: Arial, sans-serif; background-color: #f5f5f5;">
    <table style="max-width: 600px; margin: 0 auto; background: white; border-radius: 8px; overflow: hidden; box-shadow: 0 2px 10px rgba(0,0,0,0.1);">
        <tr>
            <td style="background: linear-gradient(135deg, #FF6B35 0%, #F7931E 100%); padding: 30px; text-align: center;">
                <img src="{logo}" alt="{company}" style="max-width: 180px; height: auto;">
            </td>
        </tr>
        <tr>
            <td style="padding: 30px;">
                <h2 style="margin: 0 0 20px 0; color: #333; font-size: 24px;">{title}</h2>
                <p style="margin: 0 0 20px 0; color: #666;">You have received a new form submission:</p>
                <table style="width: 100%; border-collapse: collapse;">
                    {rows}
                </table>
            </td>
        </tr>
        <tr>
            <td style="background: #f9f9f9; padding: 20px; text-align: center; color: #999; font-size: 12px;">
                <p style="margin: 0;">&copy; {year} {company}. All rights reserved.</p>
                <p style="margin: 5px 0 0 0;">Submitted on: {submitted_at}</p>
            </td>
        </tr>
    </table>
</body>
</html>"#,
        logo = branding.logo_url,
        company = escape_html(&branding.company_name),
        title = escape_html(title),
        rows = table_rows,
        year = Utc::now().format("%Y"),
        submitted_at = submitted_at(),
    )
}

/// Render the subscriber-facing welcome email for the newsletter form.
pub fn render_newsletter_welcome(branding: &Branding) -> String {
    format!(
        r#"<!DOCTYPE html>
<html>
<head>
    <meta charset="UTF-8">
</head>
<body style="margin: 0; padding: 20px; font-family: Arial, sans-serif; background-color: #f5f5f5;">
    <table style="max-width: 600px; margin: 0 auto; background: white; border-radius: 8px; overflow: hidden; box-shadow: 0 2px 10px rgba(0,0,0,0.1);">
        <tr>
            <td style="background: linear-gradient(135deg, #FF6B35 0%, #F7931E 100%); padding: 30px; text-align: center;">
                <img src="{logo}" alt="{company}" style="max-width: 180px; height: auto;">
            </td>
        </tr>
        <tr>
            <td style="padding: 40px 30px;">
                <h2 style="margin: 0 0 20px 0; color: #333; font-size: 24px;">Welcome to {company}!</h2>
                <p style="margin: 0 0 15px 0; color: #666; line-height: 1.6;">Thank you for subscribing to our newsletter.</p>
                <p style="margin: 0 0 15px 0; color: #666; line-height: 1.6;">You&#039;ll receive updates about our latest products, services, and industry insights.</p>
                <p style="margin: 0 0 20px 0; color: #666; line-height: 1.6;">Stay tuned for exciting updates!</p>
                <div style="text-align: center; margin: 30px 0;">
                    <a href="{site}" style="display: inline-block; padding: 15px 40px; background: linear-gradient(135deg, #FF6B35 0%, #F7931E 100%); color: white; text-decoration: none; border-radius: 50px; font-weight: 600;">Visit Our Website</a>
                </div>
            </td>
        </tr>
        <tr>
            <td style="background: #f9f9f9; padding: 20px; text-align: center; color: #999; font-size: 12px;">
                <p style="margin: 0;">&copy; {year} {company}. All rights reserved.</p>
                <p style="margin: 10px 0 0 0;">
                    <a href="{site}/contact-us.html" style="color: #FF6B35; text-decoration: none;">Contact Us</a> |
                    <a href="{site}/terms-conditions.html" style="color: #FF6B35; text-decoration: none;">Terms &amp; Conditions</a>
                </p>
            </td>
        </tr>
    </table>
</body>
</html>"#,
        logo = branding.logo_url,
        company = escape_html(&branding.company_name),
        site = branding.site_url,
        year = Utc::now().format("%Y"),
    )
}

fn nl2br(value: &str) -> String {
    value.replace("\r\n", "<br>\n").replace('\n', "<br>\n")
}
