use crate::types::ParseMode;

/// Longest text a single sendMessage accepts.
pub const MAX_MESSAGE_LEN: usize = 4096;

/// Link `content` to the user with `user_id`, in the given markup.
pub fn mention_by_id(content: &str, user_id: i64, parse_mode: ParseMode) -> String {
    match parse_mode {
        ParseMode::Html => format!(r#"<a href="tg://user?id={}">{}</a>"#, user_id, content),
        ParseMode::Markdown | ParseMode::MarkdownV2 => {
            format!("[{}](tg://user?id={})", content, user_id)
        }
    }
}

/// Split `text` into chunks of at most `max_len` bytes.
///
/// Breaks after the last newline in the window, else after the last space,
/// else at the limit.
pub fn split_message(text: &str, max_len: usize) -> Vec<String> {
    if text.len() <= max_len {
        return vec![text.to_string()];
    }

    let mut chunks = Vec::new();
    let mut rest = text;

    while !rest.is_empty() {
        if rest.len() <= max_len {
            chunks.push(rest.to_string());
            break;
        }

        let mut end = max_len;
        while end > 0 && !rest.is_char_boundary(end) {
            end -= 1;
        }
        if end == 0 {
            // A single character wider than the limit still has to go somewhere.
            end = rest.chars().next().map_or(rest.len(), char::len_utf8);
        }

        let window = &rest[..end];
        let cut = window
            .rfind('\n')
            .or_else(|| window.rfind(' '))
            .map(|pos| pos + 1)
            .unwrap_or(end);

        chunks.push(rest[..cut].to_string());
        rest = &rest[cut..];
    }

    chunks
}
