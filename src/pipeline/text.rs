//! Text helpers shared by the pipeline stages
//!
//! All lengths are counted in chars, not bytes.

/// Greedily pack whitespace-separated words into lines of at most `width`
/// chars.
///
/// Words are joined by a single space, so runs of whitespace collapse.
/// Hyphens are part of a word and never a break point. A word longer than
/// `width` is split hard at `width`; no other word is ever split.
pub fn wrap_words(text: &str, width: usize) -> Vec<String> {
    let mut lines = Vec::new();
    if width == 0 {
        return lines;
    }

    let mut current = String::new();
    let mut current_len = 0;

    for word in text.split_whitespace() {
        let mut word = word;
        let mut word_len = word.chars().count();

        if current_len > 0 && current_len + 1 + word_len <= width {
            current.push(' ');
            current.push_str(word);
            current_len += 1 + word_len;
            continue;
        }

        if current_len > 0 {
            lines.push(std::mem::take(&mut current));
            current_len = 0;
        }

        while word_len > width {
            let (head, tail) = split_at_char(word, width);
            lines.push(head.to_string());
            word = tail;
            word_len -= width;
        }

        if word_len > 0 {
            current.push_str(word);
            current_len = word_len;
        }
    }

    if current_len > 0 {
        lines.push(current);
    }
    lines
}

/// The first `max` chars of `text`
pub fn truncate_chars(text: &str, max: usize) -> &str {
    split_at_char(text, max).0
}

/// Upper-case the first letter of every alphabetic run, lower-case the rest.
///
/// `"hello-world"` becomes `"Hello-World"`, `"bert2vec"` becomes `"Bert2Vec"`.
pub fn title_case(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    let mut prev_alpha = false;
    for c in text.chars() {
        if c.is_alphabetic() {
            if prev_alpha {
                out.extend(c.to_lowercase());
            } else {
                out.extend(c.to_uppercase());
            }
            prev_alpha = true;
        } else {
            out.push(c);
            prev_alpha = false;
        }
    }
    out
}

fn split_at_char(text: &str, n: usize) -> (&str, &str) {
    match text.char_indices().nth(n) {
        Some((idx, _)) => text.split_at(idx),
        None => (text, ""),
    }
}
