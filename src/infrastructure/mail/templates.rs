//! Email bodies for account and notification mail.
//!
//! Every template returns a ready [`EmailMessage`] with a plain-text and an
//! HTML body. User-supplied values are HTML-escaped in the HTML body.

use super::service::EmailMessage;
use crate::domain::entities::Category;
use crate::domain::link_published::LinkPublished;

pub fn activation_email(to: &str, client_url: &str, token: &str) -> EmailMessage {
    let url = format!("{}/auth/activate/{}", client_url, token);

    let text_body = format!(
        "Verify your email address\n\n\
         Please use the following link to complete your registration:\n\n\
         {url}\n\n\
         The link expires in 10 minutes."
    );

    let html_body = format!(
        r#"<html>
<body>
    <h1>Verify your email address</h1>
    <p>Please use the following link to complete your registration:</p>
    <p><a href="{url}">{url}</a></p>
    <p>The link expires in 10 minutes.</p>
</body>
</html>"#,
        url = html_escape::encode_double_quoted_attribute(&url)
    );

    EmailMessage {
        to: to.to_string(),
        subject: "Complete your registration".to_string(),
        text_body,
        html_body,
    }
}

pub fn password_reset_email(to: &str, client_url: &str, token: &str) -> EmailMessage {
    let url = format!("{}/auth/password/reset/{}", client_url, token);

    let text_body = format!(
        "Reset password link\n\n\
         Please use the following link to reset your password:\n\n\
         {url}\n\n\
         The link expires in 10 minutes. If you did not request a reset, ignore this email."
    );

    let html_body = format!(
        r#"<html>
<body>
    <h1>Reset password link</h1>
    <p>Please use the following link to reset your password:</p>
    <p><a href="{url}">{url}</a></p>
    <p>The link expires in 10 minutes. If you did not request a reset, ignore this email.</p>
</body>
</html>"#,
        url = html_escape::encode_double_quoted_attribute(&url)
    );

    EmailMessage {
        to: to.to_string(),
        subject: "Password reset link".to_string(),
        text_body,
        html_body,
    }
}

/// Notification sent to subscribers when a link lands in a category they follow.
pub fn link_published_email(
    to: &str,
    client_url: &str,
    link: &LinkPublished,
    categories: &[Category],
) -> EmailMessage {
    let names: Vec<&str> = categories.iter().map(|c| c.name.as_str()).collect();

    let text_body = format!(
        "New link published\n\n\
         {title}\n{url}\n\n\
         Categories: {categories}\n\n\
         Browse more at {client_url}\n\n\
         You receive this email because you follow one of these categories. \
         Update your preferences at {client_url}/user/profile/update",
        title = link.title,
        url = link.url,
        categories = names.join(", "),
    );

    let category_items: String = categories
        .iter()
        .map(|c| {
            format!(
                r#"<li><a href="{client}/links/{slug}">{name}</a></li>"#,
                client = html_escape::encode_double_quoted_attribute(client_url),
                slug = html_escape::encode_double_quoted_attribute(&c.slug),
                name = html_escape::encode_text(&c.name),
            )
        })
        .collect();

    let html_body = format!(
        r#"<html>
<body>
    <h1>New link published</h1>
    <p><a href="{url}">{title}</a></p>
    <h3>Categories</h3>
    <ul>{category_items}</ul>
    <p>You receive this email because you follow one of these categories.
    Update your preferences on your <a href="{client}/user/profile/update">profile</a>.</p>
</body>
</html>"#,
        url = html_escape::encode_double_quoted_attribute(&link.url),
        title = html_escape::encode_text(&link.title),
        client = html_escape::encode_double_quoted_attribute(client_url),
    );

    EmailMessage {
        to: to.to_string(),
        subject: format!("New link published: {}", link.title),
        text_body,
        html_body,
    }
}
