//! Plain-text rendering for the paginated menu: a boxed frame, a
//! left/right header line and ten-item pages driven by single-character
//! choices.

use std::io::{self, Write};

const PAGE_SIZE: usize = 10;
const INDEX_CHARS: &str = "1234567890";

/// What the user did with a page of choices.
pub enum Choice {
    Selected(usize),
    Back,
    Quit,
}

pub fn term_cols() -> usize {
    crossterm::terminal::size()
        .map(|(cols, _)| cols as usize)
        .unwrap_or(80)
}

/// Spread `left` and `right` across one line, truncating the left side
/// when the terminal is too narrow.
pub fn left_right(left: &str, right: &str, cols: usize) -> String {
    let width = cols.saturating_sub(4);
    let right_len = right.chars().count();
    let mut left = left.to_string();
    let mut left_len = left.chars().count();

    if left_len + right_len + 4 > width {
        let keep = width.saturating_sub(right_len + 12);
        left = left.chars().take(keep).collect::<String>() + "... ";
        left_len = left.chars().count();
    }

    let pad = width.saturating_sub(left_len + right_len);
    format!("{left}{}{right}", " ".repeat(pad))
}

/// Draw a header and body inside a box spanning the terminal.
pub fn frame(header: &str, body: &str, cols: usize) -> String {
    let width = cols.saturating_sub(4).max(16);
    let bar = format!("+{}+\n", "-".repeat(width - 2));

    let mut out = String::new();
    out.push_str(&bar);
    out.push_str(&boxed_line(header, width));
    out.push_str(&bar);
    for line in body.split('\n') {
        out.push_str(&boxed_line(line, width));
    }
    out.push_str(&bar);
    out
}

fn boxed_line(line: &str, width: usize) -> String {
    let inner = width - 4;
    let count = line.chars().count();
    let line = if count > inner {
        line.chars().take(inner.saturating_sub(3)).collect::<String>() + "..."
    } else {
        line.to_string()
    };
    let pad = inner - line.chars().count();
    format!("| {line}{} |\n", " ".repeat(pad))
}

pub fn prompt(label: &str) -> io::Result<String> {
    print!("{label}");
    io::stdout().flush()?;
    let mut line = String::new();
    io::stdin().read_line(&mut line)?;
    Ok(line.trim().to_string())
}

/// Re-prompt until the input is a single character from `allowed`.
pub fn read_choice(allowed: &str) -> io::Result<char> {
    loop {
        let input = prompt("Выбор: ")?;
        let mut chars = input.chars();
        if let (Some(choice), None) = (chars.next(), chars.next()) {
            if allowed.contains(choice) {
                return Ok(choice);
            }
        }
    }
}

/// Walk `items` ten per page; `render` produces a full display line from
/// the item and its index character.
pub fn paginate<T>(
    header: &str,
    items: &[T],
    render: impl Fn(&T, char, usize) -> String,
) -> io::Result<Choice> {
    let mut page = 0;
    loop {
        let cols = term_cols();
        let start = page * PAGE_SIZE;
        let page_items = &items[start.min(items.len())..(start + PAGE_SIZE).min(items.len())];

        let mut lines: Vec<String> = page_items
            .iter()
            .zip(INDEX_CHARS.chars())
            .map(|(item, index)| render(item, index, cols))
            .collect();
        if page_items.is_empty() {
            lines.push("(пусто)".to_string());
        }
        lines.push(String::new());

        let mut allowed: String = INDEX_CHARS.chars().take(page_items.len()).collect();
        if start + PAGE_SIZE < items.len() {
            lines.push("n. Следующая страница".to_string());
            allowed.push('n');
        }
        if page > 0 {
            lines.push("p. Предыдущая страница".to_string());
            allowed.push('p');
        }
        lines.push("b. Назад".to_string());
        allowed.push('b');
        allowed.push('q');

        print!("{}", frame(header, &lines.join("\n"), cols));
        io::stdout().flush()?;

        match read_choice(&allowed)? {
            'n' => page += 1,
            'p' => page -= 1,
            'b' => return Ok(Choice::Back),
            'q' => return Ok(Choice::Quit),
            digit => {
                let offset = INDEX_CHARS
                    .chars()
                    .position(|c| c == digit)
                    .unwrap_or_default();
                return Ok(Choice::Selected(start + offset));
            }
        }
    }
}
