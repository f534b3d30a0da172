//! Document builder: transcript → self-contained HTML
//!
//! Pure and deterministic. The produced document embeds all styling inline,
//! loads one webfont, and exposes a single `#container` root that the
//! pipeline screenshots. All caller-supplied text is escaped for the context
//! it lands in, and avatar URLs are validated before they reach a style
//! attribute.

use std::fmt::Write;

use url::Url;

use crate::{Message, Theme, DEFAULT_WIDTH};

/// CSS selector of the screenshot target element
pub const CONTAINER_SELECTOR: &str = "#container";

/// Title shown in the window chrome
const TITLE: &str = "聊天记录";

/// Escape a string for an HTML text context.
fn escape_text(s: &str) -> String {
    s.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
}

/// Escape a string for a double-quoted HTML attribute value.
fn escape_attr(s: &str) -> String {
    escape_text(s).replace('"', "&quot;").replace('\'', "&#39;")
}

/// Validate an avatar URL for embedding in a style attribute.
///
/// Only http, https, and data URLs are accepted; anything else (including
/// strings that fail to parse as a URL at all) is treated as if the message
/// had no avatar. Returns the normalized serialization, which contains no
/// raw quotes or whitespace.
fn safe_avatar_url(raw: &str) -> Option<String> {
    let url = Url::parse(raw).ok()?;
    match url.scheme() {
        "http" | "https" | "data" => Some(url.to_string()),
        _ => None,
    }
}

/// Fallback glyph for messages without a usable avatar: the uppercased first
/// character of the nickname, or nothing when the nickname is empty.
fn avatar_glyph(nickname: &str) -> String {
    nickname
        .chars()
        .next()
        .map(|c| c.to_uppercase().to_string())
        .unwrap_or_default()
}

fn message_row(message: &Message) -> String {
    let avatar = message
        .avatar
        .as_deref()
        .and_then(safe_avatar_url);

    let (avatar_style, glyph) = match avatar {
        Some(url) => (
            format!(" style=\"background-image: url(&quot;{}&quot;);\"", escape_attr(&url)),
            String::new(),
        ),
        None => (String::new(), escape_text(&avatar_glyph(&message.nickname))),
    };

    format!(
        r#"    <div class="message">
      <div class="avatar"{avatar_style}>{glyph}</div>
      <div>
        <div class="name">{nickname}</div>
        <div class="content">{content}</div>
      </div>
    </div>
"#,
        avatar_style = avatar_style,
        glyph = glyph,
        nickname = escape_text(&message.nickname),
        content = escape_text(&message.content),
    )
}

/// Build the complete HTML document for a transcript.
///
/// `width` is the final intended image width in device pixels; the layout
/// computes at half that value and the whole page is scaled 2x so the
/// screenshot comes out at the requested width. A zero width falls back to
/// [`DEFAULT_WIDTH`].
pub fn build(messages: &[Message], theme: Theme, width: u32) -> String {
    let width = if width == 0 { DEFAULT_WIDTH } else { width };
    let real_width = width / 2;
    let palette = theme.palette();

    let mut rows = String::new();
    for message in messages {
        // write! to a String cannot fail
        let _ = write!(rows, "{}", message_row(message));
    }

    format!(
        r#"<!DOCTYPE html>
<html>

<head>
  <meta charset="UTF-8">
  <meta name="viewport" content="width=device-width, initial-scale=1.0">
  <title>{title}</title>
  <link rel="stylesheet" href="https://fonts.googleapis.com/css?family=Noto+Sans+SC">
  <style>
    * {{
      padding: 0;
      margin: 0;
      box-sizing: border-box;
      font-family: 'Noto Sans SC';
      color: {text};
    }}

    body {{
      transform: scale(2) translate(100%, 100%);
    }}

    .container {{
      background: {background};
      padding: 7px;
      width: {real_width}px;
      position: relative;
    }}

    .header {{
      width: 100%;
      height: 32px;
      display: flex;
      align-items: center;
    }}

    .btns {{
      position: absolute;
      display: grid;
      grid-auto-flow: column;
      grid-column-gap: 10px;
      left: 20px;
    }}

    .btns > div {{
      width: 15px;
      height: 15px;
      border-radius: 50%;
    }}

    .title {{
      width: 100%;
      height: 100%;
      text-align: center;
      line-height: 32px;
    }}

    .message {{
      display: grid;
      grid-template-columns: 64px auto;
      margin: 12px;
    }}

    .avatar {{
      border-radius: 50%;
      width: 48px;
      height: 48px;
      background-color: #cc0066;
      background-size: cover;
      background-repeat: no-repeat;
      text-align: center;
      line-height: 45px;
      font-size: 28px;
      color: white;
      margin: 8px;
    }}

    .name {{
      margin: 10px;
      font-weight: bold;
      font-size: 14px;
    }}

    .content {{
      float: left;
      margin-left: 10px;
      padding: 10px;
      background: {bubble};
      border-radius: 10px;
    }}
  </style>
</head>

<body>
  <div class="container" id="container">
    <div class="header">
      <div class="btns">
        <div style="background: #ff5f56;"></div>
        <div style="background: #ffbd2e;"></div>
        <div style="background: #27c93f;"></div>
      </div>
      <div class="title">{title}</div>
    </div>
{rows}  </div>
</body>

</html>
"#,
        title = TITLE,
        text = palette.text,
        background = palette.background,
        bubble = palette.bubble,
        real_width = real_width,
        rows = rows,
    )
}
