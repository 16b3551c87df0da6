// Expiry Notice Template
// Renders the subject line, HTML body and plain-text body of a warning email

use crate::db::models::ExpiringCertificate;
use serde::Deserialize;

/// Number of subject characters copied into the email subject line
pub const SUBJECT_PREVIEW_CHARS: usize = 30;

/// Rendered notification, ready to hand to a mailer
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExpiryNotice {
    pub subject: String,
    pub html_body: String,
    pub text_body: String,
}

/// Static parts of the notice
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct NoticeTemplate {
    /// Contact line shown in the footer
    pub contact: String,
    /// Timezone the CA database stores expiry times in
    pub timezone_label: String,
}

impl Default for NoticeTemplate {
    fn default() -> Self {
        Self {
            contact: "KISTI Grid CA Center".to_string(),
            timezone_label: "KST".to_string(),
        }
    }
}

impl NoticeTemplate {
    /// Render the notice for `cert`, `days_left` days before it expires
    pub fn render(&self, cert: &ExpiringCertificate, days_left: u32) -> ExpiryNotice {
        ExpiryNotice {
            subject: subject_line(&cert.subject, days_left),
            html_body: self.format_html_body(cert, days_left),
            text_body: self.format_text_body(cert, days_left),
        }
    }

    fn format_html_body(&self, cert: &ExpiringCertificate, days_left: u32) -> String {
        format!(
            r#"<html>
<head>
    <style>
        table {{ border-collapse: collapse; width: 100%; max-width: 600px; font-family: Arial, sans-serif; }}
        th, td {{ border: 1px solid #ddd; padding: 12px; text-align: left; }}
        th {{ background-color: #f2f2f2; font-weight: bold; }}
        .warning {{ color: #d9534f; font-weight: bold; }}
        .footer {{ margin-top: 20px; font-size: 12px; color: #777; }}
    </style>
</head>
<body>
    <h2>[Notice] Certificate Expiration Warning</h2>
    <p>This is an automated notification. The Grid Certificate you manage will expire in <b>{days} days</b>.</p>
    <p>Please renew your certificate before the expiration date.</p>
    <br>
    <table>
        <tr><th>Distinguished Name (DN)</th><td>{dn}</td></tr>
        <tr><th>Expiration Date ({tz})</th><td class="warning">{expiry}</td></tr>
        <tr><th>Days Remaining</th><td class="warning">{days} Days</td></tr>
    </table>
    <div class="footer"><p>Do not reply to this email.<br>Contact: {contact}</p></div>
</body>
</html>
"#,
            days = days_left,
            dn = html_escape(&cert.subject),
            tz = html_escape(&self.timezone_label),
            expiry = format_expiration(cert),
            contact = html_escape(&self.contact),
        )
    }

    fn format_text_body(&self, cert: &ExpiringCertificate, days_left: u32) -> String {
        format!(
            "[Notice] Certificate Expiration Warning\n\n\
            This is an automated notification. The Grid Certificate you manage will expire in {days} days.\n\
            Please renew your certificate before the expiration date.\n\n\
            Distinguished Name (DN): {dn}\n\
            Expiration Date ({tz}): {expiry}\n\
            Days Remaining: {days} Days\n\n\
            ---\n\
            Do not reply to this email.\n\
            Contact: {contact}\n",
            days = days_left,
            dn = cert.subject,
            tz = self.timezone_label,
            expiry = format_expiration(cert),
            contact = self.contact,
        )
    }
}

/// `[Urgent] ... - <first 30 chars of DN>...`; the ellipsis is always present
pub fn subject_line(cert_subject: &str, days_left: u32) -> String {
    let preview: String = cert_subject.chars().take(SUBJECT_PREVIEW_CHARS).collect();
    format!(
        "[Urgent] Certificate Expiration Notice ({} days left) - {}...",
        days_left, preview
    )
}

fn format_expiration(cert: &ExpiringCertificate) -> String {
    cert.expiration.format("%Y-%m-%d %H:%M:%S").to_string()
}

fn html_escape(text: &str) -> String {
    text.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
        .replace('\'', "&#39;")
}
