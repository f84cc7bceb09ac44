/// Wraps `text` in a `<speak>` envelope that asks for a slow speaking rate.
pub fn wrap_slow(text: &str) -> String {
    format!(
        "<speak><prosody rate=\"slow\">{}</prosody></speak>",
        escape(text)
    )
}

pub fn escape(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for ch in text.chars() {
        match ch {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&apos;"),
            _ => out.push(ch),
        }
    }
    out
}
